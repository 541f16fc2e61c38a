//! Template decoding, per-frame recoloring and GIF output.

/// GIF writer for palette-indexed frames.
pub mod gif_out;
/// Adaptive palette quantization.
pub mod quantize;
/// The recolor pipeline.
pub mod recolor;
/// Template animation decoding.
pub mod template;
