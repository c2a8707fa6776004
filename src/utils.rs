//! Small shared helpers.

use std::cmp::min;

/// Convert a char index into a byte index in a UTF-8 string.
///
/// Rust strings can only be sliced at byte offsets on character boundaries,
/// while every cursor/column in this editor counts chars. Indexes past the
/// end clamp to the string length.
pub fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(bi, _)| bi)
}

/// Convert a byte offset back into a char index.
pub fn byte_to_char(s: &str, byte_idx: usize) -> usize {
    s[..min(byte_idx, s.len())].chars().count()
}

/// Number of decimal digits in `n` (used to size the line-number gutter).
pub fn digits(n: usize) -> usize {
    n.to_string().len()
}
