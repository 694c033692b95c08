//! Decimal number tokens

/// Parse a strictly decimal `u32` (ASCII digits only, no sign)
pub(crate) fn parse_decimal(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
