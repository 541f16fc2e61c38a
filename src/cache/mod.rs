//! Content-addressed cache of generated animations.

/// Keys and the filesystem store.
pub mod store;
