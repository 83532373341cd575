use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "svga", version)]
struct Cli {
    /// Cache root directory.
    #[arg(long, global = true)]
    cache_root: Option<PathBuf>,

    /// Seconds to wait for a resource to load.
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a summary of a bundle.
    Inspect(SourceArgs),
    /// Write per-frame render-tree snapshots as JSON.
    Dump(DumpArgs),
    /// Play a bundle headlessly in real time, logging progress.
    Play(PlayArgs),
    /// Remove a bundle's disk cache directory.
    CacheClear(SourceArgs),
}

#[derive(Parser, Debug)]
struct SourceArgs {
    /// URL, bundle file path, or bundle name.
    source: String,

    /// Search root for bundle names.
    #[arg(long)]
    root: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Loops to play; 0 plays forever.
    #[arg(long, default_value_t = 1)]
    loops: u32,

    /// First frame of the range.
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Frames in the range; the whole movie when omitted.
    #[arg(long)]
    len: Option<usize>,

    /// Play backwards.
    #[arg(long)]
    reverse: bool,

    /// Frame held after the last loop.
    #[arg(long, value_enum, default_value_t = FillChoice::Forward)]
    fill: FillChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FillChoice {
    None,
    Forward,
    Backward,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut opts = svga::LoaderOpts::default();
    if let Some(root) = &cli.cache_root {
        opts.cache_root = root.clone();
    }
    let timeout = Duration::from_secs(cli.timeout);

    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(opts, timeout, args),
        Command::Dump(args) => cmd_dump(opts, timeout, args),
        Command::Play(args) => cmd_play(opts, timeout, args),
        Command::CacheClear(args) => cmd_cache_clear(opts, args),
    }
}

fn parse_source(args: &SourceArgs) -> anyhow::Result<svga::Source> {
    let raw = args.source.as_str();
    if raw.contains("://") {
        return Ok(svga::Source::url(raw));
    }
    let path = Path::new(raw);
    if path.is_file() {
        let abs = std::fs::canonicalize(path)
            .with_context(|| format!("resolve bundle path '{}'", path.display()))?;
        return Ok(svga::Source::url(format!("file://{}", abs.display())));
    }
    Ok(match &args.root {
        Some(root) => svga::Source::named_in(raw, root),
        None => svga::Source::named(raw),
    })
}

fn load(
    opts: svga::LoaderOpts,
    timeout: Duration,
    args: &SourceArgs,
) -> anyhow::Result<Arc<svga::Movie>> {
    let source = parse_source(args)?;
    let loader = svga::Loader::new(opts)?;
    let movie = loader
        .load_blocking(&source, timeout)
        .with_context(|| format!("load '{source}'"))?;
    Ok(movie)
}

fn cmd_inspect(opts: svga::LoaderOpts, timeout: Duration, args: SourceArgs) -> anyhow::Result<()> {
    let movie = load(opts, timeout, &args)?;
    println!("version: {}", movie.version);
    println!("canvas:  {}x{}", movie.canvas.width, movie.canvas.height);
    println!("fps:     {}", movie.fps);
    println!("frames:  {}", movie.frames);
    println!("sprites: {}", movie.sprites.len());
    for (idx, sprite) in movie.sprites.iter().enumerate() {
        let drawn = sprite.frames.iter().filter(|f| f.alpha > 0.0).count();
        println!(
            "  #{idx:<3} key={:<24} matte={:<16} frames={} visible={drawn}",
            sprite.image_key.as_deref().unwrap_or("-"),
            sprite.matte_key.as_deref().unwrap_or("-"),
            sprite.frames.len(),
        );
    }
    let mut images: Vec<_> = movie.images.iter().collect();
    images.sort_by(|a, b| a.0.cmp(b.0));
    println!("images:  {}", images.len());
    for (key, img) in images {
        println!("  {key} {}x{}", img.width, img.height);
    }
    println!("audio cues: {}", movie.audio_cues.len());
    for cue in &movie.audio_cues {
        println!(
            "  {} frames {}..{} offset {}ms",
            cue.key, cue.start_frame, cue.end_frame, cue.start_time_ms
        );
    }
    Ok(())
}

fn cmd_dump(opts: svga::LoaderOpts, timeout: Duration, args: DumpArgs) -> anyhow::Result<()> {
    let movie = load(opts, timeout, &args.source)?;
    let mut overrides = svga::DynamicOverrides::default();
    let frames = svga::snapshot_frames(movie, &mut overrides);
    let json = serde_json::to_string_pretty(&frames).context("serialize snapshots")?;

    match args.out {
        Some(out) => {
            if let Some(parent) = out.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&out, json).with_context(|| format!("write '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

struct Progress;

impl svga::PlayerDelegate for Progress {
    fn on_percentage(&mut self, percentage: f64) {
        tracing::debug!(percent = percentage * 100.0, "progress");
    }

    fn on_finished(&mut self) {
        tracing::info!("finished");
    }
}

fn cmd_play(opts: svga::LoaderOpts, timeout: Duration, args: PlayArgs) -> anyhow::Result<()> {
    let movie = load(opts, timeout, &args.source)?;
    let fill_mode = match args.fill {
        FillChoice::None => svga::FillMode::None,
        FillChoice::Forward => svga::FillMode::Forward,
        FillChoice::Backward => svga::FillMode::Backward,
    };
    let player_opts = svga::PlayerOpts {
        loops: args.loops,
        clears_after_stop: false,
        fill_mode,
        ..svga::PlayerOpts::default()
    };

    let mut player = svga::Player::new(
        player_opts,
        Box::new(svga::FramePacer::default()),
        Box::new(svga::TracingAudio),
    );
    player.set_delegate(Some(Box::new(Progress)));

    let len = args.len.unwrap_or(movie.frames);
    player.set_movie(movie);
    player.start_range(svga::FrameRange::with_len(args.start, len), args.reverse)?;

    let started = Instant::now();
    while player.state() == svga::PlayerState::Playing {
        player.advance(Instant::now());
        if let Some(wait) = player.until_next_tick(Instant::now()) {
            std::thread::sleep(wait);
        }
    }

    eprintln!(
        "played {} loop(s), holding frame {} after {:.2}s",
        player.loop_count(),
        player.current_frame(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn cmd_cache_clear(opts: svga::LoaderOpts, args: SourceArgs) -> anyhow::Result<()> {
    let source = parse_source(&args)?;
    let loader = svga::Loader::new(opts)?;
    let dir = loader.cache_dir(&source)?;
    loader.clear_disk(&source)?;
    eprintln!("removed {}", dir.display());
    Ok(())
}
