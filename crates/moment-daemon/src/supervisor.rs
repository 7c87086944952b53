//! Supervised background indexing.
//!
//! The indexing run is blocking filesystem and index work, so it runs on
//! the blocking pool. A monitor task awaits it, including a panic, and
//! publishes the outcome on a watch channel. The host can poll the status,
//! subscribe to changes, or await the final result.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use moment_indexing::{Indexer, IndexerError, RunStatistics};

/// Errors surfaced by a supervised indexing task.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// The run ended with a store or configuration failure
    #[error("Indexing failed: {0}")]
    Indexing(#[from] IndexerError),

    /// The run panicked or was aborted
    #[error("Indexing task aborted: {0}")]
    Aborted(String),
}

/// Observable state of a supervised run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    Completed(RunStatistics),
    Failed(String),
}

impl TaskStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, TaskStatus::Running)
    }
}

/// Handle to a supervised indexing run.
pub struct IndexingTask {
    status: watch::Receiver<TaskStatus>,
    handle: JoinHandle<Result<RunStatistics, SupervisorError>>,
}

impl IndexingTask {
    /// Current status without waiting.
    pub fn status(&self) -> TaskStatus {
        self.status.borrow().clone()
    }

    /// Receiver that is notified when the run finishes.
    pub fn subscribe(&self) -> watch::Receiver<TaskStatus> {
        self.status.clone()
    }

    /// Wait for the run to finish.
    pub async fn wait(self) -> Result<RunStatistics, SupervisorError> {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(SupervisorError::Aborted(e.to_string())),
        }
    }
}

/// Run `indexer` once in the background.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_indexing(indexer: Indexer) -> IndexingTask {
    let (tx, rx) = watch::channel(TaskStatus::Running);
    let root = indexer.working_directory().to_path_buf();

    let blocking = tokio::task::spawn_blocking(move || {
        let mut indexer = indexer;
        indexer.run()
    });

    let handle = tokio::spawn(async move {
        let outcome = match blocking.await {
            Ok(result) => result.map_err(SupervisorError::from),
            Err(e) => Err(SupervisorError::Aborted(e.to_string())),
        };

        let status = match &outcome {
            Ok(stats) => {
                info!(root = ?root, indexed = stats.indexed, "Background indexing finished");
                TaskStatus::Completed(*stats)
            }
            Err(e) => {
                error!(root = ?root, error = %e, "Background indexing failed");
                TaskStatus::Failed(e.to_string())
            }
        };
        // No receivers left is fine; the outcome is still returned
        let _ = tx.send(status);
        outcome
    });

    IndexingTask { status: rx, handle }
}
