//! fingerplay-replay: run a game against recorded or synthetic hand frames.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use fingerplay::consumers::{ChoiceRound, CountingRound, HoverRound};
use fingerplay::hand::channel::{GestureConsumer, GesturePipeline};
use fingerplay::playback::LogPlayback;
use fingerplay::replay::{self, ReplayFrame};
use fingerplay::trace::session::ShapeSession;
use fingerplay::EngineConfig;

#[derive(Parser, Debug)]
#[command(name = "fingerplay-replay", about = "Replay hand landmark frames through a game")]
struct Cli {
    /// Recorded frames, one plist per line
    #[arg(long, conflicts_with = "synthetic")]
    frames: Option<PathBuf>,

    /// Generate frames that trace these shapes (comma separated)
    #[arg(long)]
    synthetic: Option<String>,

    /// Frame interval for synthetic frames, in milliseconds
    #[arg(long, default_value_t = 33.0)]
    dt: f64,

    /// Configuration plist
    #[arg(long)]
    config: Option<PathBuf>,

    /// Game to run: shapes, counting, choice, or hover
    #[arg(long, default_value = "shapes")]
    game: String,

    /// Write the replayed frames to this file
    #[arg(long)]
    record: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fingerplay=info".into()),
        )
        .init();

    info!("fingerplay-replay v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EngineConfig::from_sexp(&raw)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Some(list) = &cli.synthetic {
        let names: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if !names.is_empty() {
            config.shapes = names;
        }
    }

    if cli.dump_config {
        println!("{}", config.config_sexp());
        return Ok(());
    }

    let frames = load_frames(&cli, &config)?;
    info!("{} frame(s) to replay", frames.len());

    if let Some(path) = &cli.record {
        let mut out = String::new();
        for frame in &frames {
            out.push_str(&replay::format_frame(frame));
            out.push('\n');
        }
        fs::write(path, out).with_context(|| format!("writing frames to {}", path.display()))?;
        info!("Frames written to {}", path.display());
    }

    let consumer = build_game(&cli.game, &config)?;
    let mut pipeline = GesturePipeline::new();
    pipeline.switch_to(consumer);

    let mut labels: BTreeMap<String, u64> = BTreeMap::new();
    for frame in &frames {
        pipeline.tick(frame.dt_ms);
        let event = pipeline.on_frame(&frame.frame);
        *labels.entry(event.label.to_string()).or_default() += 1;
    }

    let status = pipeline.status_sexp();
    pipeline.detach();

    println!("frames: {}", pipeline.frames());
    for (label, count) in &labels {
        println!("  {:<12} {}", label, count);
    }
    println!("{}", status);
    Ok(())
}

fn load_frames(cli: &Cli, config: &EngineConfig) -> anyhow::Result<Vec<ReplayFrame>> {
    if cli.synthetic.is_some() {
        if !(cli.dt > 0.0 && cli.dt.is_finite()) {
            bail!("--dt must be a positive number of milliseconds");
        }
        return replay::synthesize_trace(config, cli.dt, 2).context("generating synthetic frames");
    }
    let Some(path) = &cli.frames else {
        bail!("nothing to replay: pass --frames <file> or --synthetic <shapes>");
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading frames {}", path.display()))?;
    replay::parse_frames(&text).with_context(|| format!("parsing frames {}", path.display()))
}

fn build_game(name: &str, config: &EngineConfig) -> anyhow::Result<Box<dyn GestureConsumer>> {
    let game: Box<dyn GestureConsumer> = match name {
        "shapes" => Box::new(
            ShapeSession::new(config, LogPlayback::new()).context("setting up shape tracing")?,
        ),
        "counting" => Box::new(CountingRound::new(
            &config.dwell,
            vec![1, 2, 3, 4, 5],
            LogPlayback::new(),
        )),
        "choice" => Box::new(ChoiceRound::new(&config.dwell, Vec::new(), LogPlayback::new())),
        "hover" => Box::new(HoverRound::new(
            &config.dwell,
            config.cursor.clone(),
            Vec::new(),
            LogPlayback::new(),
        )),
        other => bail!("unknown game '{}': use shapes, counting, choice, or hover", other),
    };
    Ok(game)
}
