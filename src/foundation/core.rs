use crate::foundation::error::{BoilerError, BoilerResult};

/// Axis-aligned pixel rectangle inside a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32, // > 0
    pub height: u32, // > 0
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> BoilerResult<Self> {
        if width == 0 || height == 0 {
            return Err(BoilerError::validation("Region width/height must be > 0"));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Exclusive right edge.
    pub fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn fits_within(self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

/// How a frame is cleared before the next one is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Disposal {
    /// Leave the frame in place.
    #[default]
    Keep,
    /// Clear the frame's rectangle to transparent.
    Background,
    /// Restore the canvas to what it was before the frame was drawn.
    Previous,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
