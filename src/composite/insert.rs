use std::{path::Path, sync::Arc};

use anyhow::Context as _;
use image::RgbaImage;

use crate::foundation::error::{BoilerError, BoilerResult};

/// A user-supplied picture held once at its original resolution.
///
/// Cloning is cheap and never copies pixels; per-frame resizes produce new,
/// independent bitmaps.
#[derive(Clone, Debug)]
pub struct InsertBitmap {
    image: Arc<RgbaImage>,
}

impl InsertBitmap {
    pub fn from_image(image: RgbaImage) -> BoilerResult<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(BoilerError::decode("insert bitmap has zero size"));
        }
        Ok(Self {
            image: Arc::new(image),
        })
    }

    /// Decode any raster format the `image` crate understands.
    pub fn decode(bytes: &[u8]) -> BoilerResult<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| BoilerError::decode(format!("insert bitmap: {e}")))?;
        Self::from_image(img.to_rgba8())
    }

    pub fn open(path: &Path) -> BoilerResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read insert bitmap '{}'", path.display()))
            .map_err(|e| BoilerError::decode(format!("{e:#}")))?;
        Self::decode(&bytes)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/insert.rs"]
mod tests;
