//! Keystroke policy for printable characters: bracket pairing, skip-over,
//! and the identifier lookup that feeds calltips.
//!
//! Pure decision functions over the text around the cursor. The input layer
//! asks what a keystroke *means*; applying the answer to the buffer (and
//! recording undo) stays out of here.

use crate::utils::char_to_byte;

/// Auto-closed bracket pairs.
const BRACKETS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

/// The closing character for an opening bracket.
pub fn closing_for(open: char) -> Option<char> {
    BRACKETS.iter().find(|&&(o, _)| o == open).map(|&(_, c)| c)
}

/// Is `ch` one of the closing bracket characters?
pub fn is_closing(ch: char) -> bool {
    BRACKETS.iter().any(|&(_, c)| c == ch)
}

/// What typing a printable character should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDecision {
    /// Insert the typed opener plus `close`, leaving the cursor between.
    InsertPair { close: char },
    /// The same closer already sits under the cursor: step over it.
    SkipOver,
    /// Ordinary insertion (replacing any selection).
    Plain,
}

/// Decide what typing `ch` does, given whether a selection is active and
/// which character (if any) sits immediately after the cursor.
///
/// Openers always pair up. A closer falls back to plain insertion when a
/// selection is active, and only skips over when the very next character is
/// the identical closer; that is what keeps `(` then `)` at `()` instead
/// of `())`.
pub fn decide_char(ch: char, has_selection: bool, next_char: Option<char>) -> TypeDecision {
    if let Some(close) = closing_for(ch) {
        return TypeDecision::InsertPair { close };
    }
    if is_closing(ch) && !has_selection && next_char == Some(ch) {
        return TypeDecision::SkipOver;
    }
    TypeDecision::Plain
}

/// The identifier ending just before char column `col`, if any.
///
/// Identifiers are ASCII `[A-Za-z_][A-Za-z0-9_]*`, same as the lexer the
/// highlighter uses for names.
pub fn identifier_before(line: &str, col: usize) -> Option<&str> {
    let head = &line[..char_to_byte(line, col)];
    let start = head
        .char_indices()
        .rev()
        .take_while(|&(_, c)| c.is_ascii_alphanumeric() || c == '_')
        .last()
        .map(|(i, _)| i)?;

    // an identifier cannot begin with a digit
    let ident = head[start..].trim_start_matches(|c: char| c.is_ascii_digit());
    if ident.is_empty() {
        None
    } else {
        Some(ident)
    }
}
