//! # truss-cli
//!
//! Command-line front end for the Truss dependency manager.
//!
//! This is the caller side of the metadata resolution pipeline: it loads the
//! repository configuration, owns the repository iteration order, and prints
//! the canonical metadata for a requested module coordinate.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

mod commands;

/// Build-time dependency manager
#[derive(Parser)]
#[command(name = "truss", version, about = "Build-time dependency manager")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a module's metadata against the configured repositories
    Resolve {
        /// Module coordinate as group:name:version
        coordinate: String,
        /// Configuration file
        #[arg(long, default_value = "truss.toml")]
        config: Utf8PathBuf,
        /// Force a version for this resolution attempt
        #[arg(long)]
        force_version: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    runtime.block_on(async {
        match cli.command {
            Commands::Resolve {
                coordinate,
                config,
                force_version,
            } => commands::resolve::execute(&coordinate, &config, force_version).await,
        }
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "truss={level},truss_core={level},truss_config={level},truss_registry={level},truss_metadata={level}"
        ))
        .with_target(false)
        .init();
}
