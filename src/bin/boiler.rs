use std::path::{Path, PathBuf};

use anyhow::Context as _;
use boiler::{
    AvatarSource, BoilerError, BoilerResult, Bot, BotConfig, CommandOutcome, EffectConfig,
    Interaction, MarkerColor, RecolorThreading, Reply, ResponseSink, Subject,
};
use clap::{Parser, Subcommand, ValueEnum};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "boiler", version)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Paste one image into the green marker of a template GIF.
    Boil(BoilArgs),
    /// Paste two images into the green and magenta markers of a template GIF.
    Framemog(FramemogArgs),
    /// Run a full chat command against local avatars, writing replies to a directory.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct EffectArgs {
    /// Template GIF.
    #[arg(long)]
    template: PathBuf,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Palette size per frame (2..=256).
    #[arg(long)]
    colors: Option<u16>,

    /// Gaussian sigma applied to the resized insert.
    #[arg(long)]
    blur: Option<f32>,

    /// gifsicle --lossy level. The optimizer pass stays lossless when unset.
    #[arg(long)]
    lossy: Option<u32>,

    /// gifsicle --optimize level.
    #[arg(long, default_value_t = 3)]
    optimize: u8,

    /// Worker threads. 1 runs sequentially.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct BoilArgs {
    #[command(flatten)]
    effect: EffectArgs,

    /// Image pasted into the green marker.
    #[arg(long)]
    avatar: PathBuf,
}

#[derive(Parser, Debug)]
struct FramemogArgs {
    #[command(flatten)]
    effect: EffectArgs,

    /// Image pasted into the green marker.
    #[arg(long)]
    target: PathBuf,

    /// Image pasted into the magenta marker.
    #[arg(long)]
    source: PathBuf,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Bot config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding `<user id>.png` avatars.
    #[arg(long)]
    avatars: PathBuf,

    /// Directory replies and their attachments are written to.
    #[arg(long)]
    out: PathBuf,

    /// Requesting user id.
    #[arg(long)]
    requester_id: u64,

    /// Target user id.
    #[arg(long)]
    target_id: Option<u64>,

    /// Guild name used in the framemog caption.
    #[arg(long)]
    guild: Option<String>,

    #[arg(value_enum)]
    command: BotCommand,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BotCommand {
    Boil,
    Framemog,
    Pet,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Boil(args) => cmd_boil(args),
        Command::Framemog(args) => cmd_framemog(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn effect_config(base: EffectConfig, args: &EffectArgs) -> EffectConfig {
    EffectConfig {
        palette_size: args.colors.unwrap_or(base.palette_size),
        lossy: args.lossy.or(base.lossy),
        blur_radius: args.blur.unwrap_or(base.blur_radius),
    }
}

fn threading(threads: Option<usize>) -> RecolorThreading {
    RecolorThreading {
        parallel: threads != Some(1),
        threads,
        ..RecolorThreading::default()
    }
}

fn run_effect(
    args: &EffectArgs,
    cfg: &EffectConfig,
    inserts: &[(MarkerColor, PathBuf)],
) -> anyhow::Result<()> {
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let report = boiler::recolor_file(
        &args.template,
        inserts,
        cfg,
        args.optimize,
        &threading(args.threads),
        &args.out,
    )?;
    eprintln!(
        "wrote {} ({} frames, {} ms, {} bytes, post-compress: {:?})",
        args.out.display(),
        report.frames,
        report.duration_ms,
        report.bytes,
        report.postcompress
    );
    Ok(())
}

fn cmd_boil(args: BoilArgs) -> anyhow::Result<()> {
    let cfg = effect_config(EffectConfig::boil(), &args.effect);
    run_effect(&args.effect, &cfg, &[(MarkerColor::GREEN, args.avatar)])
}

fn cmd_framemog(args: FramemogArgs) -> anyhow::Result<()> {
    let cfg = effect_config(EffectConfig::framemog(), &args.effect);
    run_effect(
        &args.effect,
        &cfg,
        &[
            (MarkerColor::GREEN, args.target),
            (MarkerColor::MAGENTA, args.source),
        ],
    )
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let cfg = match &args.config {
        Some(path) => BotConfig::load(path)?,
        None => BotConfig::default(),
    };
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let bot = Bot::new(cfg)?;
    let avatars = LocalAvatars {
        dir: args.avatars.clone(),
    };
    let mut sink = DirSink {
        dir: args.out.clone(),
        sent: 0,
    };
    let ctx = Interaction {
        requester: Subject::new(args.requester_id, format!("user{}", args.requester_id)),
        guild_name: args.guild.clone(),
    };
    let target = args
        .target_id
        .map(|id| Subject::new(id, format!("user{id}")));

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    let outcome = rt.block_on(async {
        match args.command {
            BotCommand::Boil => bot.boil(&ctx, target.as_ref(), &avatars, &mut sink).await,
            BotCommand::Framemog => {
                bot.framemog(&ctx, target.as_ref(), &avatars, &mut sink)
                    .await
            }
            BotCommand::Pet => bot.pet(&mut sink).await,
        }
    })?;

    eprintln!("{outcome:?}");
    match outcome {
        CommandOutcome::CacheHit(_)
        | CommandOutcome::Generated { .. }
        | CommandOutcome::Prompted
        | CommandOutcome::Sent => Ok(()),
        CommandOutcome::TooLarge { .. }
        | CommandOutcome::InputError(_)
        | CommandOutcome::Failed(_) => anyhow::bail!("command did not produce an attachment"),
    }
}

/// Avatars read from `<dir>/<id>.png`, keyed by content hash.
struct LocalAvatars {
    dir: PathBuf,
}

impl LocalAvatars {
    fn path_for(&self, subject: &Subject) -> PathBuf {
        self.dir.join(format!("{}.png", subject.id))
    }
}

impl AvatarSource for LocalAvatars {
    fn avatar_key(&self, subject: &Subject) -> String {
        match std::fs::read(self.path_for(subject)) {
            Ok(bytes) => sha256_hex(&bytes)[..16].to_string(),
            Err(_) => "missing".to_string(),
        }
    }

    async fn fetch_avatar(&self, subject: &Subject, dest: &Path) -> BoilerResult<u64> {
        let src = self.path_for(subject);
        tokio::fs::copy(&src, dest).await.map_err(|e| {
            BoilerError::platform(format!("copy avatar '{}': {e}", src.display()))
        })
    }
}

/// Writes each reply to `<dir>/reply_<n>.txt`, copying any attachment alongside it.
struct DirSink {
    dir: PathBuf,
    sent: usize,
}

impl ResponseSink for DirSink {
    async fn defer(&mut self) -> BoilerResult<()> {
        tracing::debug!("deferred");
        Ok(())
    }

    async fn send(&mut self, reply: Reply) -> BoilerResult<()> {
        let n = self.sent;
        self.sent += 1;
        println!("{}", reply.content);

        if let Some(src) = &reply.attachment {
            let name = src
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("attachment_{n}.gif"));
            let dest = self.dir.join(name);
            tokio::fs::copy(src, &dest).await.map_err(|e| {
                BoilerError::platform(format!("write attachment '{}': {e}", dest.display()))
            })?;
            println!("{}", dest.display());
        }
        tokio::fs::write(self.dir.join(format!("reply_{n}.txt")), reply.content.as_bytes())
            .await
            .map_err(|e| BoilerError::platform(format!("write reply: {e}")))?;
        Ok(())
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
