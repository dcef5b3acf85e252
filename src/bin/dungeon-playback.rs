use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use dungeon_playback::{
    BspGenerator, BspParams, FrameSink, Generator, NoSink, PlaybackConfig, PlaybackSession,
    PngSequenceSink, Script, ScriptGenerator,
};

#[derive(Parser, Debug)]
#[command(name = "dungeon-playback", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a generated dungeon (or a script) onto the surface.
    Play(PlayArgs),
    /// Generate a dungeon and write its instruction list as a JSON script.
    Dump(DumpArgs),
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay this JSON script instead of generating rooms.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Room generator seed (overrides the config).
    #[arg(long, conflicts_with = "script")]
    seed: Option<u64>,

    /// Write every frame as a numbered PNG into this directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Write the final surface as a PNG.
    #[arg(long = "final")]
    final_png: Option<PathBuf>,

    /// Render as fast as possible instead of pacing frames.
    #[arg(long)]
    no_pacing: bool,

    /// Reject scripts containing a sentinel-equal instruction before their end.
    #[arg(long)]
    strict: bool,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Room generator seed (overrides the config).
    #[arg(long)]
    seed: Option<u64>,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Play(args) => cmd_play(args),
        Command::Dump(args) => cmd_dump(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<PlaybackConfig> {
    let mut cfg = match path {
        Some(p) => PlaybackConfig::load(p)?,
        None => PlaybackConfig::default(),
    };
    if seed.is_some() {
        cfg.bsp.seed = seed;
    }
    Ok(cfg)
}

fn make_generator(args: &PlayArgs, cfg: &PlaybackConfig) -> anyhow::Result<Box<dyn Generator>> {
    match &args.script {
        Some(path) => {
            if cfg.bsp != BspParams::default() {
                tracing::warn!(
                    script = %path.display(),
                    "config bsp parameters are ignored when replaying a script"
                );
            }
            let script = Script::load(path)?;
            if args.strict {
                script
                    .check_unambiguous()
                    .with_context(|| format!("check script '{}'", path.display()))?;
            }
            Ok(Box::new(ScriptGenerator::new(script)))
        }
        None => Ok(Box::new(BspGenerator::new(cfg.bsp.clone())?)),
    }
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref(), args.seed)?;
    let generator = make_generator(&args, &cfg)?;
    let sink: Box<dyn FrameSink> = match &args.out_dir {
        Some(dir) => Box::new(PngSequenceSink::new(dir)),
        None => Box::new(NoSink),
    };
    let mut session = PlaybackSession::with_sink(generator, cfg.session_opts(), sink)?;

    let stats = if args.no_pacing {
        session.run_unpaced()?
    } else {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("build runtime")?;
        let handle = session.stop_handle();
        runtime.block_on(async {
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    handle.stop();
                }
            });
            session.run().await
        })?
    };

    if let Some(path) = &args.final_png {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        session.surface().save_png(path)?;
        eprintln!("wrote {}", path.display());
    }

    println!(
        "ticks={} rendered={} stopped_by={:?}",
        stats.ticks,
        stats.rendered,
        stats.stopped_by
    );
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref(), args.seed)?;
    let mut generator = BspGenerator::new(cfg.bsp)?;

    let mut instructions = vec![generator.create()?];
    loop {
        let next = generator.next()?;
        instructions.push(next);
        if next.is_sentinel() {
            break;
        }
    }
    let json = Script::new(instructions).to_json_string()?;

    match &args.out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
