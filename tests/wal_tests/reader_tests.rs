//! Tests for WAL Reader
//!
//! These tests verify:
//! - Reading entries in append order
//! - Missing file handling (created empty)
//! - Strict failure on malformed lines
//! - Iterator functionality

use std::fs;
use std::path::PathBuf;

use kvlog::config::Config;
use kvlog::wal::{LogEntry, LogReader, LogWriter};
use kvlog::KvLogError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_wal() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let wal_path = temp_dir.path().join("test.log");
    (temp_dir, wal_path)
}

fn write_entries(path: &PathBuf, entries: &[LogEntry]) {
    let writer = LogWriter::new(&Config::new(path));
    for entry in entries {
        writer.append_entry(entry).unwrap();
    }
}

// =============================================================================
// Basic Reading Tests
// =============================================================================

#[test]
fn test_read_missing_file_creates_it() {
    let (_temp, wal_path) = setup_temp_wal();
    assert!(!wal_path.exists());

    let entries = LogReader::new(&Config::new(&wal_path)).read_all().unwrap();

    assert!(entries.is_empty());
    assert!(wal_path.exists());
    assert_eq!(fs::metadata(&wal_path).unwrap().len(), 0);
}

#[test]
fn test_read_missing_file_in_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let wal_path = temp_dir.path().join(".kls").join("log.bin");

    let entries = LogReader::new(&Config::new(&wal_path)).read_all().unwrap();

    assert!(entries.is_empty());
    assert!(wal_path.exists());
}

#[test]
fn test_read_empty_file() {
    let (_temp, wal_path) = setup_temp_wal();
    fs::File::create(&wal_path).unwrap();

    let entries = LogReader::new(&Config::new(&wal_path)).read_all().unwrap();
    assert!(entries.is_empty());
}

#[test]
fn test_read_preserves_append_order() {
    let (_temp, wal_path) = setup_temp_wal();

    let original = vec![
        LogEntry::set("k1", "v1"),
        LogEntry::set("k2", "v2"),
        LogEntry::delete("k1"),
        LogEntry::set("k1", "v3"),
    ];
    write_entries(&wal_path, &original);

    let entries = LogReader::new(&Config::new(&wal_path)).read_all().unwrap();
    assert_eq!(entries, original);
}

#[test]
fn test_read_does_not_deduplicate() {
    let (_temp, wal_path) = setup_temp_wal();
    write_entries(
        &wal_path,
        &[LogEntry::set("a", "1"), LogEntry::set("a", "1"), LogEntry::set("a", "1")],
    );

    let entries = LogReader::new(&Config::new(&wal_path)).read_all().unwrap();
    assert_eq!(entries.len(), 3);
}

#[test]
fn test_read_fails_on_unterminated_last_line() {
    let (_temp, wal_path) = setup_temp_wal();
    fs::write(&wal_path, b"SET\ta\t1\nSET\tb\t2").unwrap();

    let result = LogReader::new(&Config::new(&wal_path)).read_all();

    match result {
        Err(KvLogError::MalformedRecord(msg)) => assert!(msg.contains("line 2"), "{}", msg),
        other => panic!("expected MalformedRecord, got {:?}", other),
    }
}

// =============================================================================
// Strict Decoding Tests
// =============================================================================

#[test]
fn test_read_fails_on_corrupt_line() {
    let (_temp, wal_path) = setup_temp_wal();
    fs::write(&wal_path, b"SET\ta\t1\ngarbage\nSET\tb\t2\n").unwrap();

    let result = LogReader::new(&Config::new(&wal_path)).read_all();

    match result {
        Err(KvLogError::MalformedRecord(msg)) => assert!(msg.contains("line 2"), "{}", msg),
        other => panic!("expected MalformedRecord, got {:?}", other),
    }
}

#[test]
fn test_read_fails_on_truncated_tail() {
    let (_temp, wal_path) = setup_temp_wal();
    write_entries(&wal_path, &[LogEntry::set("a", "1"), LogEntry::set("b", "2")]);

    let mut contents = fs::read(&wal_path).unwrap();
    contents.extend_from_slice(b"SET\tc");
    fs::write(&wal_path, &contents).unwrap();

    let result = LogReader::new(&Config::new(&wal_path)).read_all();
    assert!(result.unwrap_err().is_malformed());
}

#[test]
fn test_read_fails_on_value_cut_mid_way() {
    let (_temp, wal_path) = setup_temp_wal();
    write_entries(&wal_path, &[LogEntry::set("a", "good")]);

    // Torn append: the cut leaves three well-formed fields but no newline
    let mut contents = fs::read(&wal_path).unwrap();
    contents.extend_from_slice(b"SET\ta\tlongv");
    fs::write(&wal_path, &contents).unwrap();

    let result = LogReader::new(&Config::new(&wal_path)).read_all();
    assert!(result.unwrap_err().is_malformed());
}

#[test]
fn test_read_fails_on_blank_line() {
    let (_temp, wal_path) = setup_temp_wal();
    fs::write(&wal_path, b"SET\ta\t1\n\nSET\tb\t2\n").unwrap();

    let result = LogReader::new(&Config::new(&wal_path)).read_all();
    assert!(result.unwrap_err().is_malformed());
}

// =============================================================================
// Iterator Tests
// =============================================================================

#[test]
fn test_iterator_yields_entries_in_order() {
    let (_temp, wal_path) = setup_temp_wal();
    let original = vec![LogEntry::set("a", "1"), LogEntry::set("b", "2")];
    write_entries(&wal_path, &original);

    let reader = LogReader::new(&Config::new(&wal_path));
    let entries: Vec<LogEntry> = reader.iter().unwrap().map(|r| r.unwrap()).collect();

    assert_eq!(entries, original);
}

#[test]
fn test_iterator_stops_after_first_error() {
    let (_temp, wal_path) = setup_temp_wal();
    fs::write(&wal_path, b"SET\ta\t1\nbad\nalso bad\nSET\tb\t2\n").unwrap();

    let reader = LogReader::new(&Config::new(&wal_path));
    let results: Vec<_> = reader.iter().unwrap().collect();

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}
