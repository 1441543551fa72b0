//! Notefold CLI
//!
//! Runs the startup bootstrap of the knowledge base and queries its local
//! search index.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notefold_cli::AppConfig;
use notefold_cli::commands::{cmd_bootstrap, cmd_search};
use tracing_subscriber::EnvFilter;

/// Notefold - personal knowledge base
#[derive(Parser, Debug)]
#[command(name = "notefold")]
#[command(author, version, about = "Notefold knowledge base", long_about = None)]
struct Args {
    /// Configuration file path (default: <internal-dir>/config.toml)
    #[arg(short, long, env = "NOTEFOLD_CONFIG")]
    config: Option<PathBuf>,

    /// Internal state directory
    #[arg(long, env = "NOTEFOLD_INTERNAL_DIR")]
    internal_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bring the search index to a ready state (default)
    Bootstrap,
    /// Query the local search index
    Search {
        /// Query text
        query: String,

        /// Maximum number of results
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(args.config.as_deref(), args.internal_dir.as_deref())
        .context("failed to load configuration")?;

    match args.command.unwrap_or(Command::Bootstrap) {
        Command::Bootstrap => {
            let active = cmd_bootstrap(&config)
                .await
                .context("search index bootstrap failed")?;
            tracing::info!(backend = active.name(), "Startup complete");
        }
        Command::Search { query, limit } => {
            let hits = cmd_search(&config, &query, limit)?;
            if hits.is_empty() {
                println!("No matches for '{query}'");
            }
            for hit in hits {
                println!("{:>8.3}  {}", hit.score, hit.id);
            }
        }
    }

    Ok(())
}
