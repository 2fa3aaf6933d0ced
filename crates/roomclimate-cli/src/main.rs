//! roomclimate: score indoor-climate readings and summarize them per device.

mod cli;
mod commands;
mod config;
mod format;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use roomclimate_store::Store;

use crate::cli::{Cli, Commands};
use crate::commands::{cmd_config, cmd_device, cmd_predict, cmd_record, cmd_room, cmd_stats};
use crate::config::{Config, resolve_database, resolve_format};
use crate::format::FormatOptions;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let format = resolve_format(cli.json, cli.format, &config);
    let opts = FormatOptions::new(format, config.compact_json);

    let db_path = resolve_database(cli.db, &config);
    tracing::debug!("Using database {}", db_path.display());
    let store = Store::open(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    match cli.command {
        Commands::Room { action } => cmd_room(&store, action, &opts, cli.quiet),
        Commands::Device { action } => cmd_device(&store, action, &opts, cli.quiet),
        Commands::Config { action } => {
            cmd_config(&store, action, config.productivity_norm, &opts, cli.quiet)
        }
        Commands::Predict { mac, sample } => cmd_predict(&store, &mac, sample.sample(), &opts),
        Commands::Record { mac, sample } => {
            cmd_record(&store, &mac, sample.sample(), &opts, cli.quiet)
        }
        Commands::Stats { from, to, room } => cmd_stats(&store, &from, &to, room, &opts),
    }
}
