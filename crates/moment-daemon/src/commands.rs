//! Command implementations for the moment daemon.
//!
//! Handles:
//! - index: Load config, run one indexing pass, print statistics
//! - start: Run indexing as a supervised background task, wait for shutdown
//! - status: Report how many documents the index holds

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use moment_indexing::{Indexer, RunStatistics};
use moment_search::{IndexInspector, StoreConfig};
use moment_types::Settings;

use crate::supervisor::{spawn_indexing, TaskStatus};

/// Load configuration and apply CLI overrides (highest precedence).
pub fn load_settings(
    config_path: Option<&str>,
    root_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(root) = root_override {
        settings.root_dir = root.to_string();
    }
    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }

    settings.validate().context("Invalid configuration")?;
    Ok(settings)
}

/// Install the global tracing subscriber.
///
/// RUST_LOG takes precedence over the configured level.
fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Run one indexing pass in the foreground.
pub async fn run_index(
    config_path: Option<&str>,
    root_override: Option<&str>,
    log_level_override: Option<&str>,
    json: bool,
) -> Result<()> {
    let settings = load_settings(config_path, root_override, log_level_override)?;
    init_logging(&settings)?;

    let indexer = Indexer::from_settings(&settings).context("Invalid working directory")?;
    let stats = spawn_indexing(indexer)
        .wait()
        .await
        .context("Indexing run failed")?;

    print_stats(&stats, json)
}

fn print_stats(stats: &RunStatistics, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(stats).context("Failed to encode statistics")?;
        println!("{}", out);
    } else {
        println!("{}", RunStatistics::header_row());
        println!("{}", stats.data_row());
    }
    Ok(())
}

/// Start the moment daemon.
///
/// 1. Load configuration (defaults -> file -> env -> CLI)
/// 2. Validate the working directory
/// 3. Run indexing as a supervised background task
/// 4. Wait for SIGINT/SIGTERM
pub async fn start_daemon(
    config_path: Option<&str>,
    root_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<()> {
    let settings = load_settings(config_path, root_override, log_level_override)?;
    init_logging(&settings)?;

    info!("Moment daemon starting...");
    info!("Configuration:");
    info!("  Working directory: {}", settings.expanded_root_dir().display());
    info!("  Index path: {}", settings.index_path().display());
    info!("  Log level: {}", settings.log_level);

    let indexer = Indexer::from_settings(&settings).context("Invalid working directory")?;
    let task = spawn_indexing(indexer);
    let mut status = task.subscribe();

    // The outcome is logged by the supervisor; keep the handle alive so the
    // result is not lost if the run ends before shutdown.
    let watcher = tokio::spawn(async move { task.wait().await });

    let shutdown_signal = async {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received Ctrl+C, shutting down...");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down...");
            }
        }
    };

    shutdown_signal.await;

    let current = status.borrow_and_update().clone();
    if current == TaskStatus::Running {
        // Blocking work cannot be interrupted; the runtime waits for it on
        // exit, so the run still commits and closes its store.
        warn!("Indexing still in progress, waiting for it to finish");
    }

    match watcher.await {
        Ok(Ok(stats)) => info!(indexed = stats.indexed, "Moment daemon stopped"),
        Ok(Err(e)) => warn!("Moment daemon stopped after failed indexing: {}", e),
        Err(e) => warn!("Indexing watcher aborted: {}", e),
    }

    Ok(())
}

/// Show index status.
pub fn show_status(config_path: Option<&str>, root_override: Option<&str>) -> Result<()> {
    let settings = load_settings(config_path, root_override, None)?;
    let index_path = settings.index_path();

    let config = StoreConfig::new(&index_path).with_memory_mb(settings.writer_memory_mb);
    match IndexInspector::open(config) {
        Ok(inspector) => {
            println!("Index at {:?} holds {} documents", index_path, inspector.num_docs());
            Ok(())
        }
        Err(moment_search::StoreError::IndexNotFound(_)) => {
            println!("No index at {:?}", index_path);
            Ok(())
        }
        Err(e) => Err(e).context("Failed to open index"),
    }
}
