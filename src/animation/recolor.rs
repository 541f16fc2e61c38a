use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use image::RgbaImage;
use rayon::prelude::*;

use crate::{
    animation::{
        gif_out::{OutputAnimation, OutputFrame, save_gif},
        quantize::quantize,
        template::{TemplateAnimation, TemplateFrame},
    },
    composite::{insert::InsertBitmap, paste::composite_in_place},
    detect::marker::{MarkerColor, detect_region},
    encode::gifsicle::{PostCompressConfig, PostCompressOutcome, postcompress},
    foundation::{
        config::EffectConfig,
        error::{BoilerError, BoilerResult},
    },
};

/// Pairs a marker color with the bitmap pasted wherever it appears.
#[derive(Clone, Debug)]
pub struct MarkerBinding {
    pub marker: MarkerColor,
    pub insert: InsertBitmap,
}

impl MarkerBinding {
    pub fn new(marker: MarkerColor, insert: InsertBitmap) -> Self {
        Self { marker, insert }
    }
}

/// How per-frame work is scheduled.
///
/// Parallel runs use `pool` when set, a pool of `threads` workers built for the
/// call when only `threads` is set, and rayon's global pool otherwise.
#[derive(Clone, Debug, Default)]
pub struct RecolorThreading {
    pub parallel: bool,
    pub threads: Option<usize>,
    pub pool: Option<Arc<rayon::ThreadPool>>,
}

impl RecolorThreading {
    /// Parallel scheduling with any dedicated pool built once, for callers
    /// that recolor many animations.
    pub fn shared(threads: Option<usize>) -> BoilerResult<Self> {
        let pool = match threads {
            Some(_) => Some(Arc::new(build_thread_pool(threads)?)),
            None => None,
        };
        Ok(Self {
            parallel: true,
            threads,
            pool,
        })
    }
}

/// Summary of a [`recolor_file`] run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecolorReport {
    pub frames: usize,
    /// Sum of the template's frame delays.
    pub duration_ms: u64,
    /// Size of the output file after any post-compression.
    pub bytes: u64,
    pub postcompress: PostCompressOutcome,
}

/// Detect and fill every binding's marker in one frame, in binding order.
pub fn recolor_frame(
    frame: &RgbaImage,
    bindings: &[MarkerBinding],
    blur_radius: f32,
) -> RgbaImage {
    // Detect on the untouched frame so an earlier paste can't hide a later marker.
    let regions: Vec<_> = bindings
        .iter()
        .map(|b| detect_region(frame, &b.marker))
        .collect();

    let mut out = frame.clone();
    for (binding, region) in bindings.iter().zip(regions) {
        composite_in_place(&mut out, &binding.insert, region, blur_radius);
    }
    out
}

/// Composite every template frame and quantize it, preserving order and timing.
#[tracing::instrument(skip_all, fields(frames = template.frames.len(), bindings = bindings.len()))]
pub fn recolor(
    template: &TemplateAnimation,
    bindings: &[MarkerBinding],
    config: &EffectConfig,
    threading: &RecolorThreading,
) -> BoilerResult<OutputAnimation> {
    config.validate()?;
    if template.frames.is_empty() {
        return Err(BoilerError::validation("template has no frames"));
    }
    if bindings.is_empty() {
        return Err(BoilerError::validation("at least one marker binding is required"));
    }

    let process = |(i, f): (usize, &TemplateFrame)| -> BoilerResult<OutputFrame> {
        let composited = recolor_frame(&f.image, bindings, config.blur_radius);
        let indexed = quantize(&composited, config.palette_size)?;
        tracing::trace!(frame = i, colors = indexed.palette_len(), "recolored frame");
        Ok(OutputFrame {
            indexed,
            delay_ms: f.delay_ms,
        })
    };

    let frames = if threading.parallel {
        let run = || {
            template
                .frames
                .par_iter()
                .enumerate()
                .map(process)
                .collect::<BoilerResult<Vec<_>>>()
        };
        match (&threading.pool, threading.threads) {
            (Some(pool), _) => pool.install(run)?,
            (None, Some(_)) => build_thread_pool(threading.threads)?.install(run)?,
            (None, None) => run()?,
        }
    } else {
        template
            .frames
            .iter()
            .enumerate()
            .map(process)
            .collect::<BoilerResult<Vec<_>>>()?
    };

    Ok(OutputAnimation {
        width: template.width,
        height: template.height,
        frames,
    })
}

/// Load the template and inserts from disk, recolor, write `out`, then run the
/// external optimizer (lossy only when `config.lossy` is set).
///
/// Every input is loaded before any frame is processed, so a bad insert fails fast.
#[tracing::instrument(skip(inserts, config, threading))]
pub fn recolor_file(
    template_path: &Path,
    inserts: &[(MarkerColor, PathBuf)],
    config: &EffectConfig,
    optimize_level: u8,
    threading: &RecolorThreading,
    out: &Path,
) -> BoilerResult<RecolorReport> {
    let template = TemplateAnimation::open(template_path)?;
    let bindings = inserts
        .iter()
        .map(|(marker, path)| Ok(MarkerBinding::new(*marker, InsertBitmap::open(path)?)))
        .collect::<BoilerResult<Vec<_>>>()?;

    let anim = recolor(&template, &bindings, config, threading)?;
    let mut bytes = save_gif(out, &anim)?;
    tracing::info!(frames = anim.frames.len(), bytes, "wrote output gif");

    let postcompress = postcompress(
        out,
        &PostCompressConfig {
            optimize_level,
            lossy: config.lossy,
            colors: config.palette_size,
        },
    );
    if let PostCompressOutcome::Compressed { after, .. } = postcompress {
        bytes = after;
    }

    Ok(RecolorReport {
        frames: anim.frames.len(),
        duration_ms: template.total_duration_ms(),
        bytes,
        postcompress,
    })
}

fn build_thread_pool(threads: Option<usize>) -> BoilerResult<rayon::ThreadPool> {
    if let Some(0) = threads {
        return Err(BoilerError::validation(
            "recolor threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BoilerError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/recolor.rs"]
mod tests;
