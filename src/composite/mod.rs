//! Resizing, blurring and alpha-masked pasting of insert bitmaps.

/// The read-only source bitmap.
pub mod insert;
/// Frame compositor.
pub mod paste;
