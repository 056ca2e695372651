use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use robot_arena::config::{self, SimConfig};
use robot_arena::controller::create_controller;
use robot_arena::layout::Layout;
use robot_arena::runner::run_controller;
use robot_arena::Simulation;

/// Run one robot through an arena headlessly and print a JSON run report.
#[derive(Parser, Debug)]
#[command(name = "robot-arena", version)]
struct Cli {
    /// Random obstacles to place (rounded down to pairs). Ignored by fixed layouts.
    #[arg(long, default_value_t = config::DEFAULT_OBSTACLE_COUNT)]
    obstacles: usize,

    /// random | a | b (or preset id 0, 1, 2)
    #[arg(long, default_value = "random")]
    layout: String,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 20_000)]
    max_ticks: u64,

    /// wander | seeker
    #[arg(long, default_value = "seeker")]
    controller: String,

    /// JSON file overriding any part of the default config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the report here instead of stdout.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    let layout =
        Layout::parse_cli(&cli.layout).ok_or_else(|| anyhow!("unknown layout '{}'", cli.layout))?;
    if cli.max_ticks == 0 {
        return Err(anyhow!("max_ticks must be > 0"));
    }

    let mut sim = Simulation::init_world(&config, cli.obstacles, layout, cli.seed);
    let target = config.arena.target.to_rect().center();
    let mut controller = create_controller(&cli.controller, &sim, target, cli.seed)
        .ok_or_else(|| anyhow!("unknown controller '{}'", cli.controller))?;

    let report = run_controller(&mut sim, controller.as_mut(), cli.max_ticks);
    let json = serde_json::to_string_pretty(&report).context("serializing run report")?;

    match &cli.report {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing report {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
