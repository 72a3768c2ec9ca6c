//! WAL Entry definitions
//!
//! Defines the logical record stored on each line of the log.

use std::fmt;

use super::codec;

/// Operation name used for writes
pub const OP_SET: &str = "SET";

/// Operation name used for deletes
pub const OP_DELETE: &str = "DELETE";

/// A single entry in the WAL
///
/// The operation is opaque to the log itself; only collaborators such as
/// the store interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogEntry {
    /// Kind of mutation (e.g. "SET", "DELETE")
    pub operation: String,

    /// Key the mutation applies to; never empty
    pub key: String,

    /// Payload; may contain any character
    pub value: String,
}

impl LogEntry {
    /// Build an entry from its three fields
    pub fn new(
        operation: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Shorthand for a SET entry
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(OP_SET, key, value)
    }

    /// Shorthand for a DELETE entry (empty value)
    pub fn delete(key: impl Into<String>) -> Self {
        Self::new(OP_DELETE, key, String::new())
    }
}

/// Renders the entry exactly as it appears on disk, without the newline
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&codec::encode(self)))
    }
}
