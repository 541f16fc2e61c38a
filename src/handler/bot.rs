use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::Context as _;
use tracing::{error, info, warn};

use crate::{
    animation::recolor::{RecolorReport, RecolorThreading, recolor_file},
    cache::store::{CacheKey, FsCache},
    detect::marker::MarkerColor,
    foundation::{
        config::{BotConfig, EffectConfig},
        error::{BoilerError, BoilerResult},
    },
    handler::{
        cleanup::cleanup,
        platform::{AvatarSource, Interaction, Reply, ResponseSink, Subject},
        reactions::ReactionTrigger,
    },
};

const MIB: f64 = 1024.0 * 1024.0;

/// How a command ended. The user has already been replied to in every case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Served a previously generated file.
    CacheHit(PathBuf),
    /// Generated a new file. `cached` is `None` if storing it failed.
    Generated { bytes: u64, cached: Option<PathBuf> },
    TooLarge { bytes: u64, limit: u64 },
    /// Missing template or avatar download failure.
    InputError(String),
    /// Unexpected pipeline failure.
    Failed(String),
    /// Asked the user for a missing argument.
    Prompted,
    /// Sent a static reply.
    Sent,
}

struct Job {
    effect: &'static str,
    template: PathBuf,
    effect_cfg: EffectConfig,
    cache: FsCache,
    key: CacheKey,
    /// Subject whose older entries are evicted after a successful store.
    primary: String,
    inputs: Vec<(MarkerColor, Subject, PathBuf)>,
    output: PathBuf,
    caption: String,
}

/// Command handlers plus the state they share across interactions.
pub struct Bot {
    cfg: Arc<BotConfig>,
    reactions: Mutex<ReactionTrigger>,
    /// Frame scheduling shared by every request.
    threading: RecolorThreading,
}

impl Bot {
    /// Validate `cfg` and create the scratch and cache directories.
    pub fn new(cfg: BotConfig) -> BoilerResult<Self> {
        cfg.validate()?;
        for dir in [
            cfg.temp_dir.clone(),
            cfg.boil_cache_dir(),
            cfg.framemog_cache_dir(),
        ] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("create directory '{}'", dir.display()))?;
        }
        let reactions = Mutex::new(ReactionTrigger::new(&cfg.reactions));
        let threading = RecolorThreading::shared(cfg.threads)?;
        Ok(Self {
            cfg: Arc::new(cfg),
            reactions,
            threading,
        })
    }

    pub fn config(&self) -> &BotConfig {
        &self.cfg
    }

    /// Boil `target`'s avatar (the requester's own when omitted).
    #[tracing::instrument(skip_all, fields(requester = %ctx.requester.name))]
    pub async fn boil<A, S>(
        &self,
        ctx: &Interaction,
        target: Option<&Subject>,
        avatars: &A,
        sink: &mut S,
    ) -> BoilerResult<CommandOutcome>
    where
        A: AvatarSource,
        S: ResponseSink,
    {
        let target = target.unwrap_or(&ctx.requester).clone();
        info!(target = %target.name, "boil request");
        sink.defer().await?;

        let req = ctx.requester.id;
        let hash = avatars.avatar_key(&target);
        let job = Job {
            effect: "boil",
            template: self.cfg.boil_template.clone(),
            effect_cfg: self.cfg.boil.clone(),
            cache: FsCache::new(self.cfg.boil_cache_dir()),
            key: CacheKey::single(&target.id.to_string(), &hash),
            primary: target.id.to_string(),
            inputs: vec![(
                MarkerColor::GREEN,
                target.clone(),
                self.cfg.temp_dir.join(format!("input_{req}_{}.png", target.id)),
            )],
            output: self
                .cfg
                .temp_dir
                .join(format!("output_boil_{req}_{}.gif", target.id)),
            caption: format!("\"hey {}\" and they're boiled 😭😭😭😭", target.mention()),
        };
        self.run_job(job, avatars, sink).await
    }

    /// Put the requester (magenta marker) next to `target` (green marker).
    #[tracing::instrument(skip_all, fields(requester = %ctx.requester.name))]
    pub async fn framemog<A, S>(
        &self,
        ctx: &Interaction,
        target: Option<&Subject>,
        avatars: &A,
        sink: &mut S,
    ) -> BoilerResult<CommandOutcome>
    where
        A: AvatarSource,
        S: ResponseSink,
    {
        sink.defer().await?;
        let Some(target) = target.cloned() else {
            sink.send(Reply::text("please enter a user to framemog 😤🔥"))
                .await?;
            return Ok(CommandOutcome::Prompted);
        };
        info!(target = %target.name, "framemog request");

        let requester = ctx.requester.clone();
        let req = requester.id;
        let target_hash = avatars.avatar_key(&target);
        let requester_hash = avatars.avatar_key(&requester);
        let guild = ctx.guild_name.as_deref().unwrap_or("this server");
        let job = Job {
            effect: "framemog",
            template: self.cfg.framemog_template.clone(),
            effect_cfg: self.cfg.framemog.clone(),
            cache: FsCache::new(self.cfg.framemog_cache_dir()),
            key: CacheKey::pair(
                &target.id.to_string(),
                &requester.id.to_string(),
                &target_hash,
                &requester_hash,
            ),
            primary: target.id.to_string(),
            inputs: vec![
                (
                    MarkerColor::GREEN,
                    target.clone(),
                    self.cfg.temp_dir.join(format!("input_{req}_{}.png", target.id)),
                ),
                (
                    MarkerColor::MAGENTA,
                    requester.clone(),
                    self.cfg.temp_dir.join(format!("input_{req}_{req}.png")),
                ),
            ],
            output: self
                .cfg
                .temp_dir
                .join(format!("output_framemog_{req}_{}.gif", target.id)),
            caption: format!(
                "{} ran into a frat leader at {guild} and got brutally frame mogged by them 👀😂",
                target.mention()
            ),
        };
        self.run_job(job, avatars, sink).await
    }

    /// Reply with the static pet animation.
    pub async fn pet<S: ResponseSink>(&self, sink: &mut S) -> BoilerResult<CommandOutcome> {
        sink.defer().await?;
        let path = &self.cfg.pet_template;
        if !path.is_file() {
            let msg = format!(
                "❌ Error petting boiler bot: animation not found at `{}`",
                path.display()
            );
            error!(path = %path.display(), "pet animation missing");
            sink.send(Reply::text(msg.clone())).await?;
            return Ok(CommandOutcome::Failed(msg));
        }
        sink.send(Reply::with_file(
            "\"thanks for petting me 🥰\" -boiler bot",
            path,
        ))
        .await?;
        Ok(CommandOutcome::Sent)
    }

    /// Returns true when the bot should reply to `message_id` for this reaction.
    pub fn observe_reaction(&self, message_id: u64, emoji: &str, count: u32) -> bool {
        let mut trigger = self.reactions.lock().unwrap_or_else(|e| e.into_inner());
        let fire = trigger.observe(message_id, emoji, count);
        if fire {
            info!(
                message_id,
                count,
                replied = trigger.ledger().len(),
                "reaction threshold reached"
            );
        }
        fire
    }

    async fn run_job<A, S>(&self, job: Job, avatars: &A, sink: &mut S) -> BoilerResult<CommandOutcome>
    where
        A: AvatarSource,
        S: ResponseSink,
    {
        if let Some(hit) = job.cache.lookup(&job.key) {
            info!(effect = job.effect, key = %job.key, "using cached gif");
            sink.send(Reply::with_file(job.caption.clone(), &hit)).await?;
            return Ok(CommandOutcome::CacheHit(hit));
        }
        info!(effect = job.effect, key = %job.key, "no cache found, generating");

        let mut temps: Vec<PathBuf> = job.inputs.iter().map(|(_, _, p)| p.clone()).collect();
        temps.push(job.output.clone());

        let outcome = self.generate(&job, avatars, sink).await;
        cleanup(&temps);
        outcome
    }

    async fn generate<A, S>(&self, job: &Job, avatars: &A, sink: &mut S) -> BoilerResult<CommandOutcome>
    where
        A: AvatarSource,
        S: ResponseSink,
    {
        if !job.template.is_file() {
            let msg = format!("❌ Template GIF not found at `{}`", job.template.display());
            warn!(template = %job.template.display(), "template missing");
            sink.send(Reply::text(msg.clone())).await?;
            return Ok(CommandOutcome::InputError(msg));
        }

        for (_, subject, path) in &job.inputs {
            match avatars.fetch_avatar(subject, path).await {
                Ok(bytes) => info!(subject = %subject.name, bytes, "avatar downloaded"),
                Err(e) => {
                    error!(subject = %subject.name, error = %e, "failed to download avatar");
                    let msg = format!("❌ Failed to download avatar: {e}");
                    sink.send(Reply::text(msg.clone())).await?;
                    return Ok(CommandOutcome::InputError(msg));
                }
            }
        }

        let report = match self.run_pipeline(job).await {
            Ok(r) => r,
            Err(e) => {
                error!(effect = job.effect, error = ?e, "error processing image");
                let msg = format!("❌ Error processing image: {e}");
                sink.send(Reply::text(msg.clone())).await?;
                return Ok(CommandOutcome::Failed(msg));
            }
        };

        let limit = self.cfg.max_attachment_bytes;
        info!(
            bytes = report.bytes,
            frames = report.frames,
            duration_ms = report.duration_ms,
            postcompress = ?report.postcompress,
            "output gif ready"
        );
        if report.bytes > limit {
            let err = BoilerError::TooLarge {
                bytes: report.bytes,
                limit,
            };
            warn!(error = %err, "refusing to upload");
            sink.send(Reply::text(format!(
                "❌ The output GIF is too large ({:.1} MB)! The upload limit is {:.1} MB. \
                 Please use a smaller/shorter template GIF.",
                report.bytes as f64 / MIB,
                limit as f64 / MIB
            )))
            .await?;
            return Ok(CommandOutcome::TooLarge {
                bytes: report.bytes,
                limit,
            });
        }

        let cached = match job.cache.store(&job.key, &job.output) {
            Ok(p) => {
                job.cache.evict_stale(&job.primary, &job.key);
                Some(p)
            }
            Err(e) => {
                warn!(key = %job.key, error = %e, "failed to store output in cache");
                None
            }
        };

        sink.send(Reply::with_file(job.caption.clone(), &job.output))
            .await?;
        Ok(CommandOutcome::Generated {
            bytes: report.bytes,
            cached,
        })
    }

    /// Run the CPU-bound pipeline on the blocking pool.
    async fn run_pipeline(&self, job: &Job) -> BoilerResult<RecolorReport> {
        let template = job.template.clone();
        let inserts: Vec<(MarkerColor, PathBuf)> = job
            .inputs
            .iter()
            .map(|(m, _, p)| (*m, p.clone()))
            .collect();
        let effect_cfg = job.effect_cfg.clone();
        let optimize_level = self.cfg.optimize_level;
        let threading = self.threading.clone();
        let out = job.output.clone();

        tokio::task::spawn_blocking(move || {
            recolor_file(
                &template,
                &inserts,
                &effect_cfg,
                optimize_level,
                &threading,
                &out,
            )
        })
        .await
        .map_err(|e| BoilerError::Other(anyhow::anyhow!("pipeline task failed: {e}")))?
    }
}
