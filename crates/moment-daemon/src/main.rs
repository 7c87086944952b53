//! Momentizer Daemon
//!
//! Indexes the image files below a working directory.
//!
//! # Usage
//!
//! ```bash
//! moment-daemon index [--root DIR] [--json]
//! moment-daemon start [--root DIR]
//! moment-daemon status [--root DIR]
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/momentizer/config.toml)
//! 3. Environment variables (MOMENT_*)
//! 4. CLI flags

use anyhow::Result;

use moment_daemon::{run_index, show_status, start_daemon, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Index { root, json } => {
            run_index(
                cli.config.as_deref(),
                root.as_deref(),
                cli.log_level.as_deref(),
                json,
            )
            .await?;
        }
        Commands::Start { root } => {
            start_daemon(
                cli.config.as_deref(),
                root.as_deref(),
                cli.log_level.as_deref(),
            )
            .await?;
        }
        Commands::Status { root } => {
            show_status(cli.config.as_deref(), root.as_deref())?;
        }
    }

    Ok(())
}
