//! Post-compression through an external GIF optimizer.

/// `gifsicle` invocation.
pub mod gifsicle;
