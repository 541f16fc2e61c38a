use std::{fs::File, io::BufReader, io::Read, path::Path};

use anyhow::Context as _;
use image::{Rgba, RgbaImage};

use crate::foundation::{
    core::{Disposal, Region},
    error::{BoilerError, BoilerResult},
};

/// Frame duration used when the source GIF declares a zero delay.
pub const DEFAULT_DELAY_MS: u32 = 100;

/// One fully composed frame of a template animation.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateFrame {
    /// Canvas-sized RGBA pixels as they would appear on screen.
    pub image: RgbaImage,
    /// Display duration in milliseconds (> 0).
    pub delay_ms: u32,
    pub disposal: Disposal,
}

/// A decoded template: the animation marker colors are painted into.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateAnimation {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<TemplateFrame>, // non-empty
}

impl TemplateAnimation {
    /// Build from already-composed frames. All frames must share one size.
    pub fn from_frames(frames: Vec<TemplateFrame>) -> BoilerResult<Self> {
        let Some(first) = frames.first() else {
            return Err(BoilerError::validation("template has no frames"));
        };
        let (width, height) = first.image.dimensions();
        for (i, f) in frames.iter().enumerate() {
            if f.image.dimensions() != (width, height) {
                return Err(BoilerError::validation(format!(
                    "template frame {i} is {}x{}, expected {width}x{height}",
                    f.image.width(),
                    f.image.height()
                )));
            }
            if f.delay_ms == 0 {
                return Err(BoilerError::validation(format!(
                    "template frame {i} has a zero duration"
                )));
            }
        }
        Ok(Self {
            width,
            height,
            frames,
        })
    }

    pub fn open(path: &Path) -> BoilerResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open template '{}'", path.display()))
            .map_err(|e| BoilerError::decode(format!("{e:#}")))?;
        Self::decode(BufReader::new(f))
    }

    /// Decode a GIF, replaying disposal so each frame is the full visible canvas.
    pub fn decode<R: Read>(reader: R) -> BoilerResult<Self> {
        let mut opts = gif::DecodeOptions::new();
        opts.set_color_output(gif::ColorOutput::RGBA);
        let mut decoder = opts
            .read_info(reader)
            .map_err(|e| BoilerError::decode(format!("template gif header: {e}")))?;

        let width = u32::from(decoder.width());
        let height = u32::from(decoder.height());
        let mut canvas = RgbaImage::new(width, height);
        let mut pending: Option<PendingDisposal> = None;
        let mut frames = Vec::new();

        while let Some(frame) = decoder
            .read_next_frame()
            .map_err(|e| BoilerError::decode(format!("template gif frame {}: {e}", frames.len())))?
        {
            if let Some(p) = pending.take() {
                p.apply(&mut canvas);
            }

            let disposal = match frame.dispose {
                gif::DisposalMethod::Background => Disposal::Background,
                gif::DisposalMethod::Previous => Disposal::Previous,
                _ => Disposal::Keep,
            };
            let rect = Region::new(
                u32::from(frame.left),
                u32::from(frame.top),
                u32::from(frame.width).max(1),
                u32::from(frame.height).max(1),
            )?;
            let saved = (disposal == Disposal::Previous).then(|| canvas.clone());

            draw_rgba(&mut canvas, &frame.buffer, rect);

            let delay_ms = match u32::from(frame.delay) * 10 {
                0 => DEFAULT_DELAY_MS,
                ms => ms,
            };
            frames.push(TemplateFrame {
                image: canvas.clone(),
                delay_ms,
                disposal,
            });
            pending = Some(PendingDisposal {
                disposal,
                rect,
                saved,
            });
        }

        tracing::debug!(width, height, frames = frames.len(), "decoded template");
        Self::from_frames(frames)
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.delay_ms)).sum()
    }
}

struct PendingDisposal {
    disposal: Disposal,
    rect: Region,
    saved: Option<RgbaImage>,
}

impl PendingDisposal {
    fn apply(self, canvas: &mut RgbaImage) {
        match self.disposal {
            Disposal::Keep => {}
            Disposal::Background => {
                let (w, h) = canvas.dimensions();
                for y in self.rect.y..self.rect.bottom().min(h) {
                    for x in self.rect.x..self.rect.right().min(w) {
                        canvas.put_pixel(x, y, Rgba([0, 0, 0, 0]));
                    }
                }
            }
            Disposal::Previous => {
                if let Some(saved) = self.saved {
                    *canvas = saved;
                }
            }
        }
    }
}

/// Copy a frame-local RGBA buffer onto the canvas; fully transparent pixels are skipped.
fn draw_rgba(canvas: &mut RgbaImage, buffer: &[u8], rect: Region) {
    let (cw, ch) = canvas.dimensions();
    for (i, px) in buffer.chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let x = rect.x + (i as u32 % rect.width);
        let y = rect.y + (i as u32 / rect.width);
        if x >= cw || y >= ch {
            continue;
        }
        canvas.put_pixel(x, y, Rgba([px[0], px[1], px[2], px[3]]));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/template.rs"]
mod tests;
