//! Configuration for kvlog
//!
//! The log location is an explicit value handed to every component.
//! Resolving the process-wide default happens once, at the edge.

use std::path::{Path, PathBuf};

use crate::error::{KvLogError, Result};

/// Directory under the user's home that holds the default log
pub const DEFAULT_LOG_DIR: &str = ".kls";

/// File name of the default log
pub const DEFAULT_LOG_FILE: &str = "log.bin";

/// Main configuration for a log instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Location
    // -------------------------------------------------------------------------
    /// Absolute path of the log file. Parent directories are created on
    /// first access.
    pub log_path: PathBuf,

    // -------------------------------------------------------------------------
    // Durability
    // -------------------------------------------------------------------------
    /// Whether appends are followed by an explicit flush to disk
    pub sync_mode: SyncMode,
}

/// How hard an append pushes its bytes toward the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Rely on the OS append; no explicit flush (default)
    #[default]
    None,

    /// fdatasync after every append (safest, slowest)
    EveryAppend,
}

impl Config {
    /// Config for a log at `path` with default settings
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: path.into(),
            sync_mode: SyncMode::default(),
        }
    }

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Config pointing at `$HOME/.kls/log.bin`
    pub fn resolve_default() -> Result<Self> {
        Ok(Self::new(default_log_path()?))
    }

    /// The configured log path
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

/// Resolve the home-relative default log location
pub fn default_log_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        KvLogError::PathResolution("could not determine the user home directory".to_string())
    })?;

    Ok(home.join(DEFAULT_LOG_DIR).join(DEFAULT_LOG_FILE))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    log_path: Option<PathBuf>,
    sync_mode: SyncMode,
}

impl ConfigBuilder {
    /// Set the log file path
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Set the sync mode
    pub fn sync_mode(mut self, mode: SyncMode) -> Self {
        self.sync_mode = mode;
        self
    }

    /// Build the config, falling back to the home-relative default path
    /// when none was given
    pub fn build(self) -> Result<Config> {
        let log_path = match self.log_path {
            Some(path) => path,
            None => default_log_path()?,
        };

        Ok(Config {
            log_path,
            sync_mode: self.sync_mode,
        })
    }
}
