use std::{
    borrow::Cow,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;

use crate::{
    animation::quantize::IndexedFrame,
    foundation::error::{BoilerError, BoilerResult},
};

/// One output frame: palette-indexed pixels plus the source frame's duration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFrame {
    pub indexed: IndexedFrame,
    pub delay_ms: u32,
}

/// The finished animation. Always written looping forever, each frame
/// cleared before the next is drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputAnimation {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<OutputFrame>,
}

/// GIF delays are centiseconds; round to nearest and never emit 0.
pub fn delay_centis(delay_ms: u32) -> u16 {
    let cs = (delay_ms + 5) / 10;
    cs.clamp(1, u32::from(u16::MAX)) as u16
}

pub fn encode_gif<W: Write>(out: W, anim: &OutputAnimation) -> BoilerResult<W> {
    if anim.frames.is_empty() {
        return Err(BoilerError::encode("animation has no frames"));
    }
    let width = u16::try_from(anim.width)
        .map_err(|_| BoilerError::encode(format!("width {} exceeds GIF limits", anim.width)))?;
    let height = u16::try_from(anim.height)
        .map_err(|_| BoilerError::encode(format!("height {} exceeds GIF limits", anim.height)))?;

    let mut encoder = gif::Encoder::new(out, width, height, &[])
        .map_err(|e| BoilerError::encode(format!("gif header: {e}")))?;
    encoder
        .set_repeat(gif::Repeat::Infinite)
        .map_err(|e| BoilerError::encode(format!("gif repeat: {e}")))?;

    for (i, f) in anim.frames.iter().enumerate() {
        if (f.indexed.width, f.indexed.height) != (anim.width, anim.height) {
            return Err(BoilerError::encode(format!(
                "frame {i} is {}x{}, expected {}x{}",
                f.indexed.width, f.indexed.height, anim.width, anim.height
            )));
        }
        let mut frame = gif::Frame::default();
        frame.width = width;
        frame.height = height;
        frame.delay = delay_centis(f.delay_ms);
        frame.dispose = gif::DisposalMethod::Background;
        frame.palette = Some(f.indexed.palette.clone());
        frame.buffer = Cow::Borrowed(&f.indexed.indices);
        encoder
            .write_frame(&frame)
            .map_err(|e| BoilerError::encode(format!("gif frame {i}: {e}")))?;
    }

    encoder
        .into_inner()
        .map_err(|e| BoilerError::encode(format!("gif trailer: {e}")))
}

/// Write `anim` to `path`, returning the file size in bytes.
pub fn save_gif(path: &Path, anim: &OutputAnimation) -> BoilerResult<u64> {
    let f = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    let mut w = encode_gif(BufWriter::new(f), anim)?;
    w.flush()
        .with_context(|| format!("flush '{}'", path.display()))?;
    let bytes = std::fs::metadata(path)
        .with_context(|| format!("stat '{}'", path.display()))?
        .len();
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/gif_out.rs"]
mod tests;
