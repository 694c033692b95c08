//! Final state dump
//!
//! After its input closes, a candidate writes its full mapping as a
//! brace-delimited map and exits:
//!
//! ```text
//! {
//!     3: 17,
//!     0: 1,
//! }
//! ```
//!
//! Whitespace between tokens is insignificant and a trailing comma is
//! allowed. Nothing may precede `{` or follow `}`.

use kvdiff_core::{HarnessError, Key, Result, StoreSnapshot, Value};

use crate::number::parse_decimal;

const CONTEXT: &str = "final dump";

/// Encode entries in the canonical multi-line dump layout
pub fn encode_dump<I>(entries: I) -> String
where
    I: IntoIterator<Item = (Key, Value)>,
{
    let mut out = String::from("{\n");
    for (key, value) in entries {
        out.push_str(&format!("    {}: {},\n", key, value));
    }
    out.push_str("}\n");
    out
}

/// Parse a complete dump into a snapshot
///
/// # Errors
/// Returns `ProtocolViolation` if the text is not a single well-formed map or
/// if a key appears more than once.
pub fn parse_dump(text: &str) -> Result<StoreSnapshot> {
    let trimmed = text.trim_matches(|c: char| c.is_ascii_whitespace());
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| HarnessError::protocol(CONTEXT, first_line(trimmed)))?;

    if inner.contains('{') || inner.contains('}') {
        return Err(HarnessError::protocol(CONTEXT, first_line(trimmed)));
    }

    let pieces: Vec<&str> = inner.split(',').collect();
    let last = pieces.len() - 1;
    let mut entries = Vec::with_capacity(pieces.len());

    for (i, piece) in pieces.iter().enumerate() {
        let entry = piece.trim_matches(|c: char| c.is_ascii_whitespace());
        if entry.is_empty() {
            // `{}` or a trailing comma; an empty entry anywhere else is malformed
            if i == last {
                continue;
            }
            return Err(HarnessError::protocol(CONTEXT, format!("empty entry at position {}", i)));
        }
        entries.push(parse_entry(entry)?);
    }

    StoreSnapshot::from_entries(entries)
}

fn parse_entry(entry: &str) -> Result<(Key, Value)> {
    let (key, value) = entry
        .split_once(':')
        .ok_or_else(|| HarnessError::protocol(CONTEXT, entry))?;
    let key = parse_decimal(key.trim()).ok_or_else(|| HarnessError::protocol(CONTEXT, entry))?;
    let value =
        parse_decimal(value.trim()).ok_or_else(|| HarnessError::protocol(CONTEXT, entry))?;
    Ok((key, value))
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}
