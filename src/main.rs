//! Rosterline main entry point
//!
//! Behavior is fully driven by the configuration file; the only switches are
//! logging verbosity. A rate-limit-induced stage stop is an expected,
//! resumable outcome and exits 0; only setup failures exit non-zero.

use anyhow::Context;
use clap::Parser;
use rosterline::config::load_config;
use rosterline::pipeline::{careers, players, StageOutcome};
use rosterline::{ContentCache, SqliteStorage, WikiClient};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Rosterline: a checkpointed roster-history scraper
#[derive(Parser, Debug)]
#[command(name = "rosterline")]
#[command(about = "Scrape wiki roster history into SQLite", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    let mut storage = SqliteStorage::new(Path::new(&config.db_path))
        .with_context(|| format!("failed to open database at {}", config.db_path))?;
    let cache = ContentCache::new(&config.cache_dir);
    let mut client = WikiClient::new(&config).context("failed to build HTTP client")?;

    match players::run(&mut storage, &mut client, &cache, &config).await? {
        StageOutcome::Completed => {}
        StageOutcome::RateLimited => {
            tracing::warn!(
                "players stage stopped on a provider rate limit; \
                 re-run later to resume from the saved checkpoint"
            );
        }
    }

    careers::run(&mut storage)?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("rosterline=info,warn"),
            1 => EnvFilter::new("rosterline=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
