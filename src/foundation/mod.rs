//! Shared types, configuration and the error taxonomy.

/// Configuration structures and per-effect defaults.
pub mod config;
/// Small geometry and frame metadata types.
pub mod core;
/// Crate-wide error type.
pub mod error;
