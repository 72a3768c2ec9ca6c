//! Write-Ahead Log (WAL) Module
//!
//! Provides durability through an append-only, line-oriented log.
//!
//! ## Responsibilities
//! - Append one encoded record per line
//! - Strict replay of the whole log, in append order
//! - On-demand compaction to the last record per key, swapped in atomically
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────┐
//! │ SET\tuser:1\talice\n                  │  ← record 1
//! │ SET\tuser:2\tbob\n                    │  ← record 2
//! │ DELETE\tuser:1\t\n                    │  ← record 3
//! └──────────────────────────────────────┘
//! ```
//! See [`codec`] for field escaping.
//!
//! ## Caller obligations
//! There is no locking. Appends and compactions on the same path must be
//! serialized by the caller; a compaction does not see appends made while
//! it is scanning.

pub mod codec;
mod compactor;
mod entry;
mod reader;
mod writer;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;

pub use compactor::{CompactionReport, Compactor};
pub use entry::{LogEntry, OP_DELETE, OP_SET};
pub use reader::{LogIterator, LogReader};
pub use writer::LogWriter;

/// The log as seen by its collaborators: append, replay, compact
#[derive(Debug, Clone)]
pub struct Wal {
    writer: LogWriter,
    reader: LogReader,
    compactor: Compactor,
}

impl Wal {
    /// Bind all log operations to the path in `config`
    pub fn new(config: Config) -> Self {
        Self {
            writer: LogWriter::new(&config),
            reader: LogReader::new(&config),
            compactor: Compactor::new(&config),
        }
    }

    /// Append one record
    pub fn append(&self, operation: &str, key: &str, value: &str) -> Result<()> {
        self.writer.append(operation, key, value)
    }

    /// Replay the full log (strict)
    pub fn read_all(&self) -> Result<Vec<LogEntry>> {
        self.reader.read_all()
    }

    /// Compact the log, returning the fraction of space saved
    pub fn compact(&self) -> Result<f64> {
        self.compactor.compact()
    }

    /// Compact the log, returning the full report
    pub fn compact_with_report(&self) -> Result<CompactionReport> {
        self.compactor.compact_with_report()
    }

    /// Path of the underlying log file
    pub fn path(&self) -> &Path {
        self.writer.path()
    }
}

// =============================================================================
// File Helpers
// =============================================================================

/// Create the parent directory of `path` if needed
pub(crate) fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

/// Create an empty log at `path` if none exists
///
/// Returns true when the file was just created.
pub(crate) fn ensure_log_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    ensure_parent_dir(path)?;
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.into()),
    }
}
