//! Configuration loading for Momentizer.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/momentizer/config.toml.

use config::{Config, Environment, File};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::MomentError;

/// Smallest writer budget the index accepts (one writer thread needs 15 MB).
pub const MIN_WRITER_MEMORY_MB: usize = 15;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory tree to scan for images
    #[serde(default = "default_root_dir")]
    pub root_dir: String,

    /// Name of the index directory, created inside `root_dir`
    #[serde(default = "default_index_dir_name")]
    pub index_dir_name: String,

    /// Memory budget for the index writer in MB
    #[serde(default = "default_writer_memory_mb")]
    pub writer_memory_mb: usize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root_dir() -> String {
    ".".to_string()
}

fn default_index_dir_name() -> String {
    "index".to_string()
}

fn default_writer_memory_mb() -> usize {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            index_dir_name: default_index_dir_name(),
            writer_memory_mb: default_writer_memory_mb(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/momentizer/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (MOMENT_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, MomentError> {
        let config_dir = ProjectDirs::from("", "", "momentizer")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("root_dir", default_root_dir())
            .map_err(|e| MomentError::Config(e.to_string()))?
            .set_default("index_dir_name", default_index_dir_name())
            .map_err(|e| MomentError::Config(e.to_string()))?
            .set_default("writer_memory_mb", default_writer_memory_mb() as i64)
            .map_err(|e| MomentError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| MomentError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // MOMENT_ROOT_DIR, MOMENT_WRITER_MEMORY_MB, ...
        builder = builder.add_source(
            Environment::with_prefix("MOMENT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| MomentError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| MomentError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the indexer cannot work with.
    pub fn validate(&self) -> Result<(), MomentError> {
        if self.root_dir.trim().is_empty() {
            return Err(MomentError::Config("root_dir must not be empty".into()));
        }
        if self.index_dir_name.trim().is_empty()
            || self.index_dir_name.contains(std::path::MAIN_SEPARATOR)
        {
            return Err(MomentError::Config(format!(
                "index_dir_name must be a plain directory name, got {:?}",
                self.index_dir_name
            )));
        }
        if self.writer_memory_mb < MIN_WRITER_MEMORY_MB {
            return Err(MomentError::Config(format!(
                "writer_memory_mb must be at least {}, got {}",
                MIN_WRITER_MEMORY_MB, self.writer_memory_mb
            )));
        }
        Ok(())
    }

    /// Expand ~ in root_dir to the user's home directory
    pub fn expanded_root_dir(&self) -> PathBuf {
        if let Some(rest) = self.root_dir.strip_prefix("~/") {
            if let Some(dirs) = BaseDirs::new() {
                return dirs.home_dir().join(rest);
            }
        }
        PathBuf::from(&self.root_dir)
    }

    /// Location of the index store, inside the scanned root.
    pub fn index_path(&self) -> PathBuf {
        self.expanded_root_dir().join(&self.index_dir_name)
    }
}
