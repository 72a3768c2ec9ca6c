//! WAL Writer
//!
//! Handles appending entries to the WAL file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{Config, SyncMode};
use crate::error::{KvLogError, Result};

use super::{codec, ensure_parent_dir, LogEntry};

/// Appends entries to the WAL file
///
/// Holds no file handle between calls: every append opens the log in
/// append mode, writes one full line and closes it again. Appends from
/// several writers are not coordinated.
#[derive(Debug, Clone)]
pub struct LogWriter {
    path: PathBuf,
    sync_mode: SyncMode,
}

impl LogWriter {
    /// Create a writer for the log described by `config`
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.log_path.clone(),
            sync_mode: config.sync_mode,
        }
    }

    /// Append one record to the log
    ///
    /// The encoded record and its newline go out in a single write. A failed
    /// write may leave a truncated tail; no cleanup is attempted.
    pub fn append(&self, operation: &str, key: &str, value: &str) -> Result<()> {
        self.append_entry(&LogEntry::new(operation, key, value))
    }

    /// Append an already built entry
    pub fn append_entry(&self, entry: &LogEntry) -> Result<()> {
        if entry.key.is_empty() {
            return Err(KvLogError::InvalidEntry("key must not be empty".to_string()));
        }

        let mut line = codec::encode(entry);
        line.push(codec::RECORD_SEPARATOR);

        ensure_parent_dir(&self.path)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.write_all(&line)?;
        if self.sync_mode == SyncMode::EveryAppend {
            file.sync_data()?;
        }

        tracing::debug!(
            op = %entry.operation,
            key = %entry.key,
            bytes = line.len(),
            "appended log record"
        );

        Ok(())
    }

    /// Path of the log this writer appends to
    pub fn path(&self) -> &Path {
        &self.path
    }
}
