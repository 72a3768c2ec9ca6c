//! # kvlog
//!
//! A minimal append-only write-ahead log for key-value stores:
//! - Line-oriented, escaped records that parse one line at a time
//! - Strict full replay in append order
//! - On-demand compaction to the last record per key, swapped in by rename
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  kvlog CLI / KvStore                        │
//! │              (callers; serialize writes)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ append / read_all / compact
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Wal                                  │
//! └──────┬──────────────────┬──────────────────────┬────────────┘
//!        │                  │                      │
//!        ▼                  ▼                      ▼
//!   ┌─────────┐       ┌──────────┐          ┌─────────────┐
//!   │ Writer  │       │  Reader  │          │  Compactor  │
//!   │(append) │       │ (strict) │          │  (lenient)  │
//!   └────┬────┘       └────┬─────┘          └──────┬──────┘
//!        └─────────────────┼───────────────────────┘
//!                          ▼
//!                   ┌─────────────┐
//!                   │    Codec    │
//!                   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod store;
pub mod wal;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::{Config, SyncMode};
pub use error::{KvLogError, Result};
pub use store::KvStore;
pub use wal::{CompactionReport, LogEntry, Wal};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvlog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
