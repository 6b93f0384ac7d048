//! Cadence CLI - cadence command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

/// Cadence - rate-limited event dispatch and scroll-effects demo
#[derive(Parser)]
#[command(name = "cadence")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted scroll simulation
    Run {
        /// Config file (default: ./cadence.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the scripted duration in milliseconds
        #[arg(long)]
        duration_ms: Option<u64>,

        /// Override the jitter seed
        #[arg(long)]
        seed: Option<u64>,

        /// Emit the run summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config {
        /// Config file (default: ./cadence.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            duration_ms,
            seed,
            json,
        } => cmd::run::run(config.as_deref(), duration_ms, seed, json),
        Commands::Config { config } => cmd::config::run(config.as_deref()),
    }
}
