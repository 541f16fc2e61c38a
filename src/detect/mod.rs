//! Color-keyed marker detection.

/// Marker color predicates and bounding-box search.
pub mod marker;
