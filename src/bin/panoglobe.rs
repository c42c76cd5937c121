use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "panoglobe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single composited frame as a PNG.
    Frame(FrameArgs),
    /// Run the frame scheduler and write a PNG sequence.
    Run(RunArgs),
    /// Print the default demo configuration as JSON.
    Config,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    Cpu,
    Flat,
}

#[derive(clap::Args, Debug)]
struct CommonArgs {
    /// Demo configuration JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory textures are resolved against. Defaults to the config file's directory.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Override the viewport width.
    #[arg(long)]
    width: Option<u32>,

    /// Override the viewport height.
    #[arg(long)]
    height: Option<u32>,

    #[arg(long, value_enum, default_value_t = Backend::Cpu)]
    backend: Backend,

    /// Render on the calling thread only.
    #[arg(long, default_value_t = false)]
    serial: bool,

    /// How long to wait for textures before the first frame, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    texture_wait_ms: u64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Transition progress in [0, 1].
    #[arg(long, default_value_t = 0.0)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Number of frames to render.
    #[arg(long, default_value_t = 180)]
    frames: u64,

    /// Location index to focus.
    #[arg(long)]
    select: Option<usize>,

    /// Frame at which `--select` is applied.
    #[arg(long, default_value_t = 0)]
    select_at: u64,

    /// Pace frames against the wall clock instead of rendering as fast as possible.
    #[arg(long, default_value_t = false)]
    realtime: bool,

    /// Output directory for the PNG sequence.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "panoglobe=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Run(args) => cmd_run(args),
        Command::Config => cmd_config(),
    }
}

fn load_config(common: &CommonArgs) -> anyhow::Result<(panoglobe::DemoConfig, PathBuf)> {
    let mut cfg = match &common.config {
        Some(path) => panoglobe::DemoConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => panoglobe::DemoConfig::default(),
    };
    if let Some(w) = common.width {
        cfg.viewport.width = w;
    }
    if let Some(h) = common.height {
        cfg.viewport.height = h;
    }
    let assets_root = match (&common.assets, &common.config) {
        (Some(dir), _) => dir.clone(),
        (None, Some(path)) => path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
        (None, None) => PathBuf::from("."),
    };
    Ok((cfg, assets_root))
}

fn build_pipeline(
    common: &CommonArgs,
    cfg: &panoglobe::DemoConfig,
    assets_root: &Path,
) -> anyhow::Result<panoglobe::Pipeline> {
    let kind = match common.backend {
        Backend::Cpu => panoglobe::BackendKind::Cpu,
        Backend::Flat => panoglobe::BackendKind::Flat,
    };
    let settings = panoglobe::RenderSettings {
        parallel: !common.serial,
    };
    let renderer = panoglobe::create_backend(kind, &settings)?;
    let mut pipeline = panoglobe::build_demo(cfg, assets_root, renderer)
        .context("build demo pipeline")?;
    if common.serial {
        pipeline.set_compositor(panoglobe::Compositor::new().with_parallel(false));
    }
    if !pipeline
        .textures_mut()
        .wait_idle(Duration::from_millis(common.texture_wait_ms))
    {
        tracing::warn!("textures still loading; first frames show placeholders");
    }
    Ok(pipeline)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (mut cfg, assets_root) = load_config(&args.common)?;
    cfg.progress = args.progress;
    let mut pipeline = build_pipeline(&args.common, &cfg, &assets_root)?;

    let frame = pipeline.render_frame(0.0)?;
    panoglobe::write_png(&args.out, frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let (cfg, assets_root) = load_config(&args.common)?;
    let mut pipeline = build_pipeline(&args.common, &cfg, &assets_root)?;

    let sched = panoglobe::FrameScheduler::new(panoglobe::SchedulerOpts {
        fps: cfg.fps,
        pacing: if args.realtime {
            panoglobe::Pacing::RealTime
        } else {
            panoglobe::Pacing::Unpaced
        },
        max_frames: args.frames,
    });
    let mut sink = panoglobe::PngSequenceSink::new(&args.out_dir);
    let select = args.select;
    let stats = sched.run_with(&mut pipeline, &mut sink, |idx, p| {
        if let Some(i) = select
            && idx.0 == args.select_at
        {
            p.push_input(panoglobe::InputEvent::SelectLocation(i));
        }
    })?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    let json = panoglobe::DemoConfig::default().to_json_pretty()?;
    println!("{json}");
    Ok(())
}
