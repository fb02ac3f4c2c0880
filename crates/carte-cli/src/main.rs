//! Carte demo CLI
//!
//! Runs one scripted session against an in-memory ledger and prints the
//! resulting report as JSON on stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! carte
//! carte --config carte.json
//! carte --config carte.json --world league.json
//! RUST_LOG=carte_exchange=debug carte
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unreadable config or world file, engine failure)
//! - 2: Invalid command-line arguments

mod session;
mod world;

use std::path::PathBuf;
use std::process;

use carte_types::constants::{ENGINE_NAME, VERSION};
use carte_types::{CarteConfig, CarteError, LoggingConfig, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::session::run_session;
use crate::world::World;

/// Run a scripted pack-and-trade session and print the report
#[derive(Parser, Debug)]
#[command(name = "carte", version, about, long_about = None)]
struct Args {
    /// JSON config file (defaults apply when omitted)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON world file with cards, packs and players (built-in league when omitted)
    #[arg(long, value_name = "FILE")]
    world: Option<PathBuf>,
}

fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| CarteError::Configuration(e.to_string()))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| CarteError::Configuration(e.to_string()))
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => CarteConfig::load(path)?,
        None => CarteConfig::default(),
    };
    init_logging(&config.logging)?;
    tracing::info!(engine = ENGINE_NAME, version = VERSION, "Starting session");

    let world = match &args.world {
        Some(path) => World::load(path)?,
        None => World::builtin(),
    };
    let report = run_session(world, &config, &mut rand::thread_rng())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        tracing::error!(error = %e, "Session failed");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
