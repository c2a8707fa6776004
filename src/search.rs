//! Find/replace scanning over the document buffer.
//!
//! These functions are stateless: every call scans from the position the
//! caller supplies, in the requested direction only. Wrap-around at the
//! document edges is the caller's decision, made by re-issuing the call
//! from the opposite edge. Queries are plain text, matched per line.

use crate::buffer::Buffer;
use crate::types::Pos;

/// Flags applied to every comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Case comparison goes through `char::to_lowercase`; no custom Unicode
/// folding beyond what the standard library provides.
fn chars_equal(a: char, b: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.to_lowercase().eq(b.to_lowercase())
    }
}

/// Does `pattern` match in `chars` at `start`, honoring the flags?
fn match_at(chars: &[char], start: usize, pattern: &[char], opts: SearchOptions) -> bool {
    let end = start + pattern.len();
    if end > chars.len() {
        return false;
    }
    for (offset, &pc) in pattern.iter().enumerate() {
        if !chars_equal(chars[start + offset], pc, opts.case_sensitive) {
            return false;
        }
    }
    if opts.whole_word {
        if start > 0 && is_word_char(chars[start - 1]) {
            return false;
        }
        if end < chars.len() && is_word_char(chars[end]) {
            return false;
        }
    }
    true
}

/// Find the first match after `from` (forward) or the nearest match before
/// it (backward). "After" and "before" compare match **start** positions,
/// strictly, so repeating a search from the current hit always advances.
///
/// Empty queries never match. Returns the match range or `None` when the
/// scan runs off the document edge.
pub fn find_next(
    buf: &Buffer,
    query: &str,
    from: Pos,
    opts: SearchOptions,
    backward: bool,
) -> Option<(Pos, Pos)> {
    if query.is_empty() {
        return None;
    }
    let pattern: Vec<char> = query.chars().collect();
    let from = buf.clamp(from);

    if backward {
        for y in (0..=from.y).rev() {
            let chars: Vec<char> = buf.line(y).chars().collect();
            let limit = if y == from.y { from.x } else { chars.len() + 1 };
            for x in (0..limit.min(chars.len() + 1)).rev() {
                if match_at(&chars, x, &pattern, opts) {
                    return Some((Pos { y, x }, Pos { y, x: x + pattern.len() }));
                }
            }
        }
    } else {
        for y in from.y..buf.line_count() {
            let chars: Vec<char> = buf.line(y).chars().collect();
            let first = if y == from.y { from.x + 1 } else { 0 };
            for x in first..=chars.len() {
                if match_at(&chars, x, &pattern, opts) {
                    return Some((Pos { y, x }, Pos { y, x: x + pattern.len() }));
                }
            }
        }
    }
    None
}

/// Every non-overlapping match in document order.
pub fn find_all(buf: &Buffer, query: &str, opts: SearchOptions) -> Vec<(Pos, Pos)> {
    let mut out = Vec::new();
    if query.is_empty() {
        return out;
    }
    let pattern: Vec<char> = query.chars().collect();

    for y in 0..buf.line_count() {
        let chars: Vec<char> = buf.line(y).chars().collect();
        let mut x = 0;
        while x + pattern.len() <= chars.len() {
            if match_at(&chars, x, &pattern, opts) {
                out.push((Pos { y, x }, Pos { y, x: x + pattern.len() }));
                x += pattern.len();
            } else {
                x += 1;
            }
        }
    }
    out
}

/// Is the range `a..b` exactly a match for `query` (flags included)?
///
/// Used to validate that the current selection still corresponds to an
/// active match before a replace-current is allowed to touch it.
pub fn range_matches(buf: &Buffer, a: Pos, b: Pos, query: &str, opts: SearchOptions) -> bool {
    if query.is_empty() || a.y != b.y || b.x < a.x {
        return false;
    }
    let pattern: Vec<char> = query.chars().collect();
    if b.x - a.x != pattern.len() {
        return false;
    }
    let chars: Vec<char> = buf.line(a.y).chars().collect();
    if b.x > chars.len() {
        return false;
    }
    match_at(&chars, a.x, &pattern, opts)
}
