//! Error types for kvlog
//!
//! Provides a unified error type for all log operations.

use thiserror::Error;

/// Result type alias using KvLogError
pub type Result<T> = std::result::Result<T, KvLogError>;

/// Unified error type for kvlog operations
#[derive(Debug, Error)]
pub enum KvLogError {
    // -------------------------------------------------------------------------
    // Location Errors
    // -------------------------------------------------------------------------
    #[error("Log path resolution failed: {0}")]
    PathResolution(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Malformed log record: {0}")]
    MalformedRecord(String),

    #[error("Invalid log entry: {0}")]
    InvalidEntry(String),
}

impl KvLogError {
    /// True if this error came from decoding a record rather than from the filesystem
    pub fn is_malformed(&self) -> bool {
        matches!(self, KvLogError::MalformedRecord(_))
    }
}
