//! Parenteral CLI - verify product images and export their metadata.
//!
//! Scans a directory of images, checks that each one opens, and writes one
//! metadata row per image to CSV (and optionally XLSX/JSON), together with a
//! verification report and an append-only processing log.
//!
//! # Usage
//!
//! ```bash
//! # Flat scan of ./Parenterals into ./metadata
//! parenteral generate
//!
//! # Recursive scan with categories, CSV + spreadsheet
//! parenteral generate ./images --recursive --format csv,xlsx
//!
//! # View configuration
//! parenteral config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Parenteral - verify product images and export their metadata.
#[derive(Parser, Debug)]
#[command(name = "parenteral")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "PARENTERAL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify images and write metadata, report, and log
    Generate(cli::generate::GenerateArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default logging settings. Check your config file with `parenteral config path`."
            );
            parenteral_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Parenteral v{}", parenteral_core::VERSION);

    match cli.command {
        Commands::Generate(args) => cli::generate::execute(args, cli.config.as_deref()),
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref()),
    }
}
