//! `tumble`: run the falling boxes and balls demo headless and report what
//! happened.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tumble_demo::prelude::*;
use tumble_engine::logging::{init_logging, LoggingConfig};

#[derive(Parser, Debug)]
#[command(name = "tumble", version, about = "Falling boxes and balls demo")]
struct Cli {
    /// Simulated seconds to run
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,
    /// Seed for the box-vs-ball draws (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Start with auto spawn off
    #[arg(long)]
    no_auto_spawn: bool,
    /// Boxes to spawn before the first tick
    #[arg(long, default_value_t = 0)]
    burst_boxes: usize,
    /// Balls to spawn before the first tick
    #[arg(long, default_value_t = 0)]
    burst_balls: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => DemoConfig::read(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DemoConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.no_auto_spawn {
        config.spawn.auto_spawn = false;
    }

    init_logging(LoggingConfig {
        filter: config.log_filter.clone(),
        ..Default::default()
    });
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "config loaded");
    }
    let config = config.validated()?;

    anyhow::ensure!(
        cli.seconds.is_finite() && cli.seconds >= 0.0,
        "--seconds must be a non-negative number, got {}",
        cli.seconds
    );

    let mut session = build(&config);
    burst(&mut session, SpawnKind::Box, cli.burst_boxes);
    burst(&mut session, SpawnKind::Ball, cli.burst_balls);

    let ticks = session.run_for(cli.seconds);

    for line in session.stats().lines() {
        tracing::info!("{line}");
    }
    let hash = session.state_hash().context("hashing final state")?;
    tracing::info!(
        ticks,
        loop_spawns = session.state().loop_spawns,
        hash = %hash,
        "session finished"
    );
    println!("{hash}");

    Ok(())
}
