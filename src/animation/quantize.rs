use std::collections::HashMap;

use image::RgbaImage;

use crate::foundation::error::{BoilerError, BoilerResult};

/// NeuQuant sampling factor: 1 is slowest and best, 30 fastest.
const NEUQUANT_SAMPLE_FACTOR: i32 = 10;

/// A palette-indexed frame ready for GIF encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedFrame {
    pub width: u32,
    pub height: u32,
    /// Flat RGB triples.
    pub palette: Vec<u8>,
    /// One palette index per pixel, row-major.
    pub indices: Vec<u8>,
}

impl IndexedFrame {
    pub fn palette_len(&self) -> usize {
        self.palette.len() / 3
    }

    pub fn color_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = usize::from(self.indices[(y * self.width + x) as usize]) * 3;
        let c = self.palette.get(idx..idx + 3)?;
        Some([c[0], c[1], c[2]])
    }
}

/// Flatten to RGB (alpha dropped) and map onto an adaptive palette of at most
/// `palette_size` colors.
///
/// Frames that already use few enough colors keep them exactly; everything
/// else goes through NeuQuant.
pub fn quantize(frame: &RgbaImage, palette_size: u16) -> BoilerResult<IndexedFrame> {
    if !(2..=256).contains(&palette_size) {
        return Err(BoilerError::validation(format!(
            "palette_size must be in 2..=256, got {palette_size}"
        )));
    }
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(BoilerError::validation("cannot quantize an empty frame"));
    }

    if let Some(exact) = exact_palette(frame, usize::from(palette_size)) {
        return Ok(exact);
    }

    let mut opaque = Vec::with_capacity(frame.as_raw().len());
    for px in frame.pixels() {
        opaque.extend_from_slice(&[px[0], px[1], px[2], 255]);
    }
    let nq = color_quant::NeuQuant::new(NEUQUANT_SAMPLE_FACTOR, usize::from(palette_size), &opaque);
    let indices: Vec<u8> = opaque
        .chunks_exact(4)
        .map(|px| nq.index_of(px) as u8)
        .collect();

    Ok(compact(IndexedFrame {
        width,
        height,
        palette: nq.color_map_rgb(),
        indices,
    }))
}

/// Drop palette entries no pixel refers to, keeping first-use order.
fn compact(frame: IndexedFrame) -> IndexedFrame {
    let mut remap = [None::<u8>; 256];
    let mut palette = Vec::with_capacity(frame.palette.len());
    let mut next = 0u16;
    let indices = frame
        .indices
        .iter()
        .map(|&i| {
            *remap[usize::from(i)].get_or_insert_with(|| {
                let at = usize::from(i) * 3;
                palette.extend_from_slice(&frame.palette[at..at + 3]);
                let n = next as u8;
                next += 1;
                n
            })
        })
        .collect();

    IndexedFrame {
        width: frame.width,
        height: frame.height,
        palette,
        indices,
    }
}

fn exact_palette(frame: &RgbaImage, max_colors: usize) -> Option<IndexedFrame> {
    let mut lookup = HashMap::<[u8; 3], u8>::new();
    let mut palette = Vec::new();
    let mut indices = Vec::with_capacity((frame.width() * frame.height()) as usize);

    for px in frame.pixels() {
        let rgb = [px[0], px[1], px[2]];
        let idx = match lookup.get(&rgb) {
            Some(&i) => i,
            None => {
                if lookup.len() == max_colors {
                    return None;
                }
                let i = lookup.len() as u8;
                lookup.insert(rgb, i);
                palette.extend_from_slice(&rgb);
                i
            }
        };
        indices.push(idx);
    }

    Some(IndexedFrame {
        width: frame.width(),
        height: frame.height(),
        palette,
        indices,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/animation/quantize.rs"]
mod tests;
