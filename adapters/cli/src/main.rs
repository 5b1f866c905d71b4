#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the ascii-city experience.

mod config;
mod session;
mod terminal;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use anyhow::{Context, Result};
use ascii_city_rendering::{MapPresentation, Presentation, RenderingBackend};
use ascii_city_world::WorldConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{session::Session, terminal::TerminalBackend};

/// Terminal city builder where the goal is an empty city.
#[derive(Debug, Parser)]
#[command(name = "ascii-city", version, about)]
struct CliArgs {
    /// Seed for the world's random stream.
    #[arg(long)]
    seed: Option<u64>,
    /// Real-time milliseconds between simulation steps.
    #[arg(long, value_name = "MS", default_value_t = 1_000)]
    tick_ms: u64,
    /// Milliseconds each frame waits for a key press.
    #[arg(long, value_name = "MS", default_value_t = 30)]
    poll_ms: u64,
    /// Number of houses scattered over the map at start.
    #[arg(long)]
    houses: Option<usize>,
    /// Starting cash.
    #[arg(long)]
    cash: Option<f64>,
    /// TOML file with world parameters; flags take precedence over it.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Write logs to this file. Logging is off otherwise.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl CliArgs {
    /// Resolves the world parameters, the map size excepted.
    fn world_config(&self) -> Result<WorldConfig> {
        let mut config = match &self.config {
            Some(path) => config::load_file(path)?,
            None => WorldConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.rng_seed = seed;
        }
        if let Some(houses) = self.houses {
            config.seeded_houses = houses;
        }
        if let Some(cash) = self.cash {
            config.starting_cash = cash;
        }
        Ok(config)
    }
}

/// Entry point for the ascii-city command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_file.as_deref())?;

    let mut config = args.world_config()?;
    let (columns, rows) = crossterm::terminal::size().context("failed to query terminal size")?;
    let map = MapPresentation::fit_terminal(columns, rows).context("terminal is too small")?;
    config.columns = map.columns;
    config.rows = map.rows;

    let mut session = Session::new(&config, Duration::from_millis(args.tick_ms))?;
    let presentation = Presentation::new(session.banner(), session.scene());

    TerminalBackend::new(Duration::from_millis(args.poll_ms)).run(
        presentation,
        move |dt, input, scene| {
            let control = session.advance(dt, input);
            *scene = session.scene();
            control
        },
    )
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
