//! Ward-Rounds rollover daemon.
//!
//! Keeps the ward schedule rolled over to the local day. All tracing output
//! goes to stderr.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use ward_rounds_core::{Database, LocalClock};
use ward_rounds_daemon::{DaemonConfig, RolloverTicker};

#[derive(Parser, Debug)]
#[command(name = "ward-rounds", about = "Obstetric ward schedule rollover daemon")]
struct Cli {
    /// Config file (defaults to ~/.config/ward-rounds/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// SQLite database, overriding the config file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Run a single rollover pass and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(DaemonConfig::default_config_path);
    let mut config = DaemonConfig::load_or_default(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let db = Database::open(&config.database_path)
        .with_context(|| format!("opening {}", config.database_path.display()))?;
    tracing::info!(database = %config.database_path.display(), "ward-rounds starting");

    let cancel = CancellationToken::new();
    let ticker = RolloverTicker::new(Arc::new(Mutex::new(db)), Arc::new(LocalClock), cancel.clone())
        .with_tick_interval(config.tick_interval());

    if cli.once {
        let report = ticker.run_once().context("rollover pass failed")?;
        tracing::info!(rolled = report.rolled, unchanged = report.unchanged, "rollover pass complete");
        return Ok(());
    }

    let handle = tokio::spawn(ticker.run());

    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl-C")?;
    tracing::info!("shutdown requested");
    cancel.cancel();

    let passes = handle.await.context("rollover ticker panicked")?;
    tracing::info!(passes, "ward-rounds shut down cleanly");
    Ok(())
}
