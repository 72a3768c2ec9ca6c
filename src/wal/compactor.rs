//! WAL Compactor
//!
//! Rewrites the log keeping only the last record per key.
//!
//! ## Steps
//! 1. Stat the log (`before_size`)
//! 2. Lenient scan: malformed lines are skipped, every decodable line is
//!    kept and indexed by key (later lines overwrite earlier indices)
//! 3. Write surviving lines, in original order, to a temp file next to the log
//! 4. fsync the temp file and rename it over the log
//! 5. Stat the new log (`after_size`)
//!
//! Nothing touches the original file before the rename. Appends made while
//! a compaction is scanning are lost on the swap, so callers must not run
//! the two concurrently on the same path.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{KvLogError, Result};

use super::{codec, ensure_log_file};

/// Outcome of a compaction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompactionReport {
    /// Log size in bytes before compaction
    pub before_size: u64,

    /// Log size in bytes after compaction
    pub after_size: u64,

    /// Lines read from the old log
    pub lines_scanned: u64,

    /// Records written to the new log (one per distinct key)
    pub records_kept: u64,

    /// Malformed lines dropped during the scan
    pub lines_skipped: u64,
}

impl CompactionReport {
    /// Fraction of the old log size that was reclaimed
    ///
    /// Returns 0.0 for an empty log.
    pub fn savings_ratio(&self) -> f64 {
        if self.before_size == 0 {
            return 0.0;
        }
        (self.before_size as f64 - self.after_size as f64) / self.before_size as f64
    }
}

/// Compacts the WAL file
#[derive(Debug, Clone)]
pub struct Compactor {
    path: PathBuf,
}

/// Lines that survived the lenient scan, plus the winning line per key
struct ScanResult {
    lines: Vec<Vec<u8>>,
    latest: HashMap<String, usize>,
    scanned: u64,
    skipped: u64,
}

impl Compactor {
    /// Create a compactor for the log described by `config`
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.log_path.clone(),
        }
    }

    /// Compact the log and return the fraction of space saved
    pub fn compact(&self) -> Result<f64> {
        Ok(self.compact_with_report()?.savings_ratio())
    }

    /// Compact the log and return the full report
    pub fn compact_with_report(&self) -> Result<CompactionReport> {
        if ensure_log_file(&self.path)? {
            tracing::info!(path = %self.path.display(), "log absent, created empty; nothing to compact");
            return Ok(CompactionReport::default());
        }

        let before_size = fs::metadata(&self.path)?.len();
        let scan = self.scan()?;

        // Emit in original order, never in map order
        let mut survivors: Vec<usize> = scan.latest.values().copied().collect();
        survivors.sort_unstable();

        self.swap_in(&scan.lines, &survivors)?;

        let after_size = fs::metadata(&self.path)?.len();
        let report = CompactionReport {
            before_size,
            after_size,
            lines_scanned: scan.scanned,
            records_kept: survivors.len() as u64,
            lines_skipped: scan.skipped,
        };

        tracing::info!(
            path = %self.path.display(),
            before = report.before_size,
            after = report.after_size,
            kept = report.records_kept,
            skipped = report.lines_skipped,
            "compacted log"
        );

        Ok(report)
    }

    /// Path of the log this compactor rewrites
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lenient scan: malformed lines, including an unterminated tail, are
    /// counted and dropped. Kept lines retain their trailing separator.
    fn scan(&self) -> Result<ScanResult> {
        let mut reader = BufReader::new(File::open(&self.path)?);

        let mut result = ScanResult {
            lines: Vec::new(),
            latest: HashMap::new(),
            scanned: 0,
            skipped: 0,
        };

        loop {
            let mut line = Vec::new();
            if reader.read_until(codec::RECORD_SEPARATOR, &mut line)? == 0 {
                break;
            }
            result.scanned += 1;

            match codec::decode_framed(&line) {
                Ok(entry) => {
                    result.latest.insert(entry.key, result.lines.len());
                    result.lines.push(line);
                }
                Err(KvLogError::MalformedRecord(reason)) => {
                    tracing::debug!(line = result.scanned, %reason, "skipping malformed record");
                    result.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(result)
    }

    /// Write the surviving lines to a sibling temp file and rename it over the log
    ///
    /// The temp file is removed on any failure before the rename.
    fn swap_in(&self, lines: &[Vec<u8>], survivors: &[usize]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let prefix = match self.path.file_name() {
            Some(name) => format!(".{}.", name.to_string_lossy()),
            None => ".log.".to_string(),
        };

        let tmp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".compact")
            .tempfile_in(dir)?;

        {
            let mut writer = BufWriter::new(tmp.as_file());
            for &idx in survivors {
                writer.write_all(&lines[idx])?;
            }
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;

        // Keep the log's mode; temp files are created 0600
        fs::set_permissions(tmp.path(), fs::metadata(&self.path)?.permissions())?;

        tmp.persist(&self.path).map_err(|e| KvLogError::Io(e.error))?;
        Ok(())
    }
}
