//! Lookup response lines
//!
//! A candidate answers every `lookup` with exactly one line holding either a
//! decimal value or the missing-value token.

use kvdiff_core::{HarnessError, Result, Value};

use crate::number::parse_decimal;

/// Token a candidate prints when a looked-up key is absent
pub const MISSING_TOKEN: &str = "None";

/// Encode a lookup result as a full response line
pub fn encode_lookup_response(value: Option<Value>) -> String {
    match value {
        Some(v) => format!("{}\n", v),
        None => format!("{}\n", MISSING_TOKEN),
    }
}

/// Parse one lookup response line
///
/// Surrounding ASCII whitespace (including the terminator) is ignored.
///
/// # Errors
/// Returns `ProtocolViolation` carrying the raw line for anything other than
/// a `u32` or [`MISSING_TOKEN`].
pub fn parse_lookup_response(line: &str) -> Result<Option<Value>> {
    let token = line.trim_matches(|c: char| c.is_ascii_whitespace());
    if token == MISSING_TOKEN {
        return Ok(None);
    }
    parse_decimal(token)
        .map(Some)
        .ok_or_else(|| HarnessError::protocol("lookup response", line))
}
