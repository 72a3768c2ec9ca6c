//! Store Module
//!
//! In-memory key-value index rebuilt from the WAL.
//!
//! ## Responsibilities
//! - Replay the log on open (SET inserts, DELETE removes)
//! - Write through the WAL before touching memory
//! - Serialize writes and compaction on the log path

use std::collections::HashMap;
use std::path::Path;

use parking_lot::{Mutex, RwLock};

use crate::config::Config;
use crate::error::Result;
use crate::wal::{CompactionReport, LogEntry, Wal, OP_DELETE, OP_SET};

/// Key-value store backed by the WAL
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader
///
/// - **Writes** (set/delete/compact): serialized by `write_lock`, which
///   also keeps appends from racing a compaction swap
/// - **Reads** (get): only take the `data` read lock
#[derive(Debug)]
pub struct KvStore {
    /// Durable log
    wal: Wal,

    /// Current state, last writer wins
    data: RwLock<HashMap<String, String>>,

    /// Serializes write operations on the log path
    write_lock: Mutex<()>,
}

impl KvStore {
    /// Open the store, replaying the log
    ///
    /// Replay is strict: a malformed record fails the open. Run a
    /// compaction to drop corrupt lines.
    pub fn open(config: Config) -> Result<Self> {
        let wal = Wal::new(config);
        let entries = wal.read_all()?;

        let mut data = HashMap::new();
        let replayed = entries.len();
        for entry in entries {
            apply(&mut data, entry);
        }

        tracing::info!(
            path = %wal.path().display(),
            records = replayed,
            keys = data.len(),
            "store opened"
        );

        Ok(Self {
            wal,
            data: RwLock::new(data),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    /// Set a key to a value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let _write_guard = self.write_lock.lock();

        self.wal.append(OP_SET, key, value)?;
        self.data.write().insert(key.to_string(), value.to_string());

        Ok(())
    }

    /// Delete a key, returning whether it was present
    ///
    /// The delete is logged even when the key is absent.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let _write_guard = self.write_lock.lock();

        self.wal.append(OP_DELETE, key, "")?;
        Ok(self.data.write().remove(key).is_some())
    }

    /// Compact the underlying log
    pub fn compact(&self) -> Result<CompactionReport> {
        let _write_guard = self.write_lock.lock();
        self.wal.compact_with_report()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True if no keys are live
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// All live keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Path of the underlying log
    pub fn path(&self) -> &Path {
        self.wal.path()
    }
}

fn apply(data: &mut HashMap<String, String>, entry: LogEntry) {
    match entry.operation.as_str() {
        OP_SET => {
            data.insert(entry.key, entry.value);
        }
        OP_DELETE => {
            data.remove(&entry.key);
        }
        other => {
            tracing::warn!(op = other, key = %entry.key, "ignoring unknown operation during replay");
        }
    }
}
