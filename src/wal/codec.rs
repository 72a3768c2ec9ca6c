//! Record codec
//!
//! Turns a [`LogEntry`] into one newline-free line and back.
//!
//! ## Line Format
//! ```text
//! ┌─────────────┬────┬─────────┬────┬───────────┐
//! │  operation  │ \t │   key   │ \t │   value   │
//! └─────────────┴────┴─────────┴────┴───────────┘
//! ```
//!
//! Inside every field the bytes `\`, TAB, LF and CR are written as the
//! two-byte escapes `\\`, `\t`, `\n` and `\r`. A raw TAB is therefore always
//! a field separator and a raw LF never appears inside a record.

use crate::error::{KvLogError, Result};

use super::LogEntry;

/// Byte separating the three fields of a record
pub const FIELD_SEPARATOR: u8 = b'\t';

/// Byte terminating a record in the log file
pub const RECORD_SEPARATOR: u8 = b'\n';

/// Number of fields in every record
const FIELD_COUNT: usize = 3;

const ESCAPE: u8 = b'\\';

// =============================================================================
// Encoding
// =============================================================================

/// Encode an entry into a single line (without the trailing separator)
pub fn encode(entry: &LogEntry) -> Vec<u8> {
    let mut out =
        Vec::with_capacity(entry.operation.len() + entry.key.len() + entry.value.len() + 2);

    escape_into(entry.operation.as_bytes(), &mut out);
    out.push(FIELD_SEPARATOR);
    escape_into(entry.key.as_bytes(), &mut out);
    out.push(FIELD_SEPARATOR);
    escape_into(entry.value.as_bytes(), &mut out);

    out
}

fn escape_into(field: &[u8], out: &mut Vec<u8>) {
    for &byte in field {
        match byte {
            ESCAPE => out.extend_from_slice(b"\\\\"),
            b'\t' => out.extend_from_slice(b"\\t"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            other => out.push(other),
        }
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a record as read from the log, trailing separator included
///
/// The writer emits record and separator in one write, so a line without
/// its separator is a truncated append and is rejected even when the
/// bytes before the cut happen to decode.
pub fn decode_framed(line: &[u8]) -> Result<LogEntry> {
    match line.strip_suffix(&[RECORD_SEPARATOR]) {
        Some(record) => decode(record),
        None => Err(KvLogError::MalformedRecord(
            "truncated record: missing record separator".to_string(),
        )),
    }
}

/// Decode a single line (without the trailing separator) into an entry
///
/// Returns `MalformedRecord` on a wrong field count, a bad or dangling
/// escape, a raw line break, invalid UTF-8 or an empty key.
pub fn decode(line: &[u8]) -> Result<LogEntry> {
    if line.contains(&b'\n') || line.contains(&b'\r') {
        return Err(KvLogError::MalformedRecord(
            "raw line break inside record".to_string(),
        ));
    }

    let fields: Vec<&[u8]> = line.split(|&b| b == FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(KvLogError::MalformedRecord(format!(
            "expected {} fields, got {}",
            FIELD_COUNT,
            fields.len()
        )));
    }

    let operation = unescape(fields[0], "operation")?;
    let key = unescape(fields[1], "key")?;
    let value = unescape(fields[2], "value")?;

    if key.is_empty() {
        return Err(KvLogError::MalformedRecord("empty key".to_string()));
    }

    Ok(LogEntry {
        operation,
        key,
        value,
    })
}

fn unescape(field: &[u8], name: &str) -> Result<String> {
    let mut out = Vec::with_capacity(field.len());
    let mut bytes = field.iter();

    while let Some(&byte) = bytes.next() {
        if byte != ESCAPE {
            out.push(byte);
            continue;
        }

        match bytes.next() {
            Some(b'\\') => out.push(ESCAPE),
            Some(b't') => out.push(b'\t'),
            Some(b'n') => out.push(b'\n'),
            Some(b'r') => out.push(b'\r'),
            Some(&other) => {
                return Err(KvLogError::MalformedRecord(format!(
                    "{}: unknown escape sequence \\{}",
                    name,
                    other.escape_ascii()
                )));
            }
            None => {
                return Err(KvLogError::MalformedRecord(format!(
                    "{}: dangling escape at end of field",
                    name
                )));
            }
        }
    }

    String::from_utf8(out)
        .map_err(|e| KvLogError::MalformedRecord(format!("{}: invalid UTF-8: {}", name, e)))
}
