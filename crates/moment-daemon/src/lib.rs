//! Momentizer daemon library exports.
//!
//! This crate provides the host binary for the indexing pipeline.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (index, start, status)
//! - `supervisor`: Background indexing task with an observable outcome

pub mod cli;
pub mod commands;
pub mod supervisor;

pub use cli::{Cli, Commands};
pub use commands::{load_settings, run_index, show_status, start_daemon};
pub use supervisor::{spawn_indexing, IndexingTask, SupervisorError, TaskStatus};
