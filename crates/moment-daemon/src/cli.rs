//! CLI argument parsing for the moment daemon.
//!
//! CLI flags override all other config sources.

use clap::{Parser, Subcommand};

/// Momentizer Daemon
///
/// Walks a directory tree and records image metadata in a persistent index.
#[derive(Parser, Debug)]
#[command(name = "moment-daemon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/momentizer/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Daemon commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index once in the foreground and print the statistics
    Index {
        /// Override the directory to index
        #[arg(short, long)]
        root: Option<String>,

        /// Print statistics as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Index in a supervised background task, then wait for shutdown
    Start {
        /// Override the directory to index
        #[arg(short, long)]
        root: Option<String>,
    },

    /// Show how many documents the index holds
    Status {
        /// Override the directory whose index is inspected
        #[arg(short, long)]
        root: Option<String>,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
