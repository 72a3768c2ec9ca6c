//! WAL Reader
//!
//! Strict replay: every line must decode, or the whole read fails.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{KvLogError, Result};

use super::{codec, ensure_log_file, LogEntry};

/// Reads entries from the WAL file
#[derive(Debug, Clone)]
pub struct LogReader {
    path: PathBuf,
}

impl LogReader {
    /// Create a reader for the log described by `config`
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.log_path.clone(),
        }
    }

    /// Read every entry in append order
    ///
    /// A missing log is created empty and yields no entries. The first line
    /// that fails to decode aborts the read.
    pub fn read_all(&self) -> Result<Vec<LogEntry>> {
        let entries = self.iter()?.collect::<Result<Vec<_>>>()?;
        tracing::debug!(path = %self.path.display(), entries = entries.len(), "replayed log");
        Ok(entries)
    }

    /// Stream entries in append order
    pub fn iter(&self) -> Result<LogIterator> {
        if ensure_log_file(&self.path)? {
            return Ok(LogIterator::empty());
        }

        let file = File::open(&self.path)?;
        Ok(LogIterator::new(BufReader::new(file)))
    }

    /// Path of the log this reader scans
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Iterator over WAL entries
///
/// Yields at most one error, then stops. A final line missing its
/// separator is a truncated append and counts as malformed.
pub struct LogIterator {
    reader: Option<BufReader<File>>,
    buf: Vec<u8>,
    line_no: usize,
    failed: bool,
}

impl LogIterator {
    fn new(reader: BufReader<File>) -> Self {
        Self {
            reader: Some(reader),
            buf: Vec::new(),
            line_no: 0,
            failed: false,
        }
    }

    fn empty() -> Self {
        Self {
            reader: None,
            buf: Vec::new(),
            line_no: 0,
            failed: false,
        }
    }

    fn fail(&mut self, err: KvLogError) -> Option<Result<LogEntry>> {
        self.failed = true;
        Some(Err(err))
    }
}

impl Iterator for LogIterator {
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let reader = self.reader.as_mut()?;
        self.buf.clear();
        match reader.read_until(codec::RECORD_SEPARATOR, &mut self.buf) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(e) => return self.fail(e.into()),
        }
        self.line_no += 1;

        match codec::decode_framed(&self.buf) {
            Ok(entry) => Some(Ok(entry)),
            Err(KvLogError::MalformedRecord(reason)) => {
                let line_no = self.line_no;
                self.fail(KvLogError::MalformedRecord(format!("line {}: {}", line_no, reason)))
            }
            Err(e) => self.fail(e),
        }
    }
}
