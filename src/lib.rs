//! Boiler turns marker-keyed GIF templates into personalized reaction GIFs.
//!
//! A template animation carries solid marker-color regions (green, magenta). Each frame is
//! scanned for those regions, a subject's avatar is resized, blurred and masked into them,
//! and the result is re-encoded as a looping GIF that keeps the template's frame timing.
//!
//! - Decode a [`TemplateAnimation`]
//! - Bind markers to [`InsertBitmap`]s and run [`recolor`] / [`recolor_file`]
//! - Drive whole chat commands through [`Bot`] with an [`AvatarSource`] and a [`ResponseSink`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
/// Content-addressed cache of generated output.
pub mod cache;
pub(crate) mod composite;
pub(crate) mod detect;
/// External post-compression.
pub mod encode;
/// Chat command handlers.
pub mod handler;

pub use crate::foundation::config::{
    BotConfig, DEFAULT_MAX_ATTACHMENT_BYTES, EffectConfig, MAX_BLUR_RADIUS, ReactionConfig,
};
pub use crate::foundation::core::{Disposal, Region};
pub use crate::foundation::error::{BoilerError, BoilerResult};

pub use crate::animation::gif_out::{
    OutputAnimation, OutputFrame, delay_centis, encode_gif, save_gif,
};
pub use crate::animation::quantize::{IndexedFrame, quantize};
pub use crate::animation::recolor::{
    MarkerBinding, RecolorReport, RecolorThreading, recolor, recolor_file, recolor_frame,
};
pub use crate::animation::template::{DEFAULT_DELAY_MS, TemplateAnimation, TemplateFrame};
pub use crate::cache::store::{CacheKey, FsCache};
pub use crate::composite::insert::InsertBitmap;
pub use crate::composite::paste::{composite, fit_insert, paste_masked};
pub use crate::detect::marker::{ChannelRule, MarkerColor, count_matches, detect_region};
pub use crate::encode::gifsicle::{
    GIFSICLE, PostCompressConfig, PostCompressOutcome, postcompress, postcompress_with,
};
pub use crate::handler::bot::{Bot, CommandOutcome};
pub use crate::handler::cleanup::cleanup;
pub use crate::handler::platform::{AvatarSource, Interaction, Reply, ResponseSink, Subject};
pub use crate::handler::reactions::{ReactionTrigger, ReplyLedger};
