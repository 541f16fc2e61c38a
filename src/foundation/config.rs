use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{BoilerError, BoilerResult};

/// Discord's attachment limit is 25 MB; leave some margin.
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 24 * 1024 * 1024;

/// Largest accepted insert blur sigma, in pixels.
pub const MAX_BLUR_RADIUS: f32 = 16.0;

/// Per-effect tuning for the recolor pipeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Adaptive palette size per output frame (2..=256).
    pub palette_size: u16,
    /// `gifsicle --lossy` level. `None` keeps the optimizer pass lossless.
    pub lossy: Option<u32>,
    /// Gaussian blur applied to each resized insert, in pixels. `0` disables it.
    pub blur_radius: f32,
}

impl EffectConfig {
    /// Single-subject effect: small palette, no blur, lossless optimize only.
    pub fn boil() -> Self {
        Self {
            palette_size: 64,
            lossy: None,
            blur_radius: 0.0,
        }
    }

    /// Dual-subject effect: full palette with blur and lossy compression to keep size down.
    pub fn framemog() -> Self {
        Self {
            palette_size: 256,
            lossy: Some(30),
            blur_radius: 0.5,
        }
    }

    pub fn validate(&self) -> BoilerResult<()> {
        if !(2..=256).contains(&self.palette_size) {
            return Err(BoilerError::validation(format!(
                "palette_size must be in 2..=256, got {}",
                self.palette_size
            )));
        }
        if !(0.0..=MAX_BLUR_RADIUS).contains(&self.blur_radius) {
            return Err(BoilerError::validation(format!(
                "blur_radius must be in 0..={MAX_BLUR_RADIUS}, got {}",
                self.blur_radius
            )));
        }
        Ok(())
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self::boil()
    }
}

/// Reaction-threshold reply settings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReactionConfig {
    pub emoji: String,
    pub threshold: u32,
    /// Maximum number of message ids remembered as already replied to.
    pub ledger_capacity: usize,
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self {
            emoji: "😭".to_string(),
            threshold: 5,
            ledger_capacity: 1024,
        }
    }
}

/// Everything the command handlers need, loaded once at startup.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub boil_template: PathBuf,
    pub framemog_template: PathBuf,
    pub pet_template: PathBuf,
    /// Root of the content-addressed cache; each effect gets its own subdirectory.
    pub cache_dir: PathBuf,
    /// Scratch directory for per-request inputs and outputs.
    pub temp_dir: PathBuf,
    pub max_attachment_bytes: u64,
    /// `gifsicle --optimize` level used by the post-compressor.
    pub optimize_level: u8,
    /// Worker threads for per-frame processing. `None` uses the rayon default.
    pub threads: Option<usize>,
    pub boil: EffectConfig,
    pub framemog: EffectConfig,
    pub reactions: ReactionConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            boil_template: PathBuf::from("app/templates/boiler_template.gif"),
            framemog_template: PathBuf::from("app/templates/framemog_template.gif"),
            pet_template: PathBuf::from("app/templates/pet_template.gif"),
            cache_dir: PathBuf::from("cache"),
            temp_dir: PathBuf::from("temp"),
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            optimize_level: 3,
            threads: None,
            boil: EffectConfig::boil(),
            framemog: EffectConfig::framemog(),
            reactions: ReactionConfig::default(),
        }
    }
}

impl BotConfig {
    pub fn load(path: &Path) -> BoilerResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> BoilerResult<()> {
        self.boil.validate()?;
        self.framemog.validate()?;
        if self.max_attachment_bytes == 0 {
            return Err(BoilerError::validation("max_attachment_bytes must be > 0"));
        }
        if self.optimize_level == 0 || self.optimize_level > 3 {
            return Err(BoilerError::validation("optimize_level must be in 1..=3"));
        }
        if let Some(0) = self.threads {
            return Err(BoilerError::validation("threads must be >= 1 when set"));
        }
        if self.reactions.threshold == 0 {
            return Err(BoilerError::validation("reaction threshold must be >= 1"));
        }
        Ok(())
    }

    pub fn boil_cache_dir(&self) -> PathBuf {
        self.cache_dir.join("boil")
    }

    pub fn framemog_cache_dir(&self) -> PathBuf {
        self.cache_dir.join("framemog")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
