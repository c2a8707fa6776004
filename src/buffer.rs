//! The document buffer: lines of text plus the low-level editing operations.

use crate::types::{LineEnding, Pos};
use crate::utils::char_to_byte;
use std::cmp::min;

/// The document model: a list of lines (each line is a `String`).
///
/// Intentionally simple; a rope would scale better to huge files, but a
/// `Vec<String>` keeps every operation easy to reason about and is plenty
/// for source files. There is always at least one line, and positions are
/// (line, char-column) pairs.
pub struct Buffer {
    pub lines: Vec<String>,
    pub line_ending: LineEnding,
    /// True once the buffer diverges from its on-disk contents.
    pub modified: bool,
}

impl Buffer {
    /// Create a new empty buffer with a single empty line and LF endings.
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            line_ending: LineEnding::LF,
            modified: false,
        }
    }

    /// Build a buffer from an on-disk string, detecting and honoring line endings.
    pub fn from_string(s: &str) -> Self {
        let line_ending = if s.contains("\r\n") {
            LineEnding::CRLF
        } else {
            LineEnding::LF
        };

        let mut lines: Vec<String> = s
            .split('\n')
            .map(|l| l.trim_end_matches('\r').to_string())
            .collect();
        if lines.is_empty() {
            lines.push(String::new());
        }

        Self { lines, line_ending, modified: false }
    }

    /// Serialize the buffer for saving to disk, using the detected line ending.
    pub fn contents(&self) -> String {
        self.lines.join(self.line_ending.as_str())
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, y: usize) -> &str {
        self.lines.get(y).map_or("", String::as_str)
    }

    pub fn line_len(&self, y: usize) -> usize {
        self.line(y).chars().count()
    }

    /// Position of the very end of the document.
    pub fn end_pos(&self) -> Pos {
        let y = self.lines.len().saturating_sub(1);
        Pos { y, x: self.line_len(y) }
    }

    /// Clamp a position to a valid line and a valid column within that line.
    pub fn clamp(&self, mut p: Pos) -> Pos {
        p.y = min(p.y, self.lines.len().saturating_sub(1));
        p.x = min(p.x, self.line_len(p.y));
        p
    }

    /// Insert text at a position and return the position just past it.
    ///
    /// The text may contain newlines; `\r\n` is normalized to `\n` before
    /// splitting so pasted Windows text cannot smuggle stray carriage
    /// returns into lines.
    pub fn insert_text(&mut self, p: Pos, text: &str) -> Pos {
        let p = self.clamp(p);
        let normalized = text.replace("\r\n", "\n");
        self.modified = true;

        let tail = {
            let line = &mut self.lines[p.y];
            line.split_off(char_to_byte(line, p.x))
        };

        let mut parts = normalized.split('\n');
        let first = parts.next().unwrap_or_default();
        self.lines[p.y].push_str(first);
        let mut end = Pos { y: p.y, x: p.x + first.chars().count() };

        for part in parts {
            end = Pos { y: end.y + 1, x: part.chars().count() };
            self.lines.insert(end.y, part.to_string());
        }

        self.lines[end.y].push_str(&tail);
        end
    }

    /// Remove the text between `a` and `b` and return it.
    ///
    /// Multi-line ranges are joined with `\n` in the returned text. The
    /// caller's cursor belongs at `a` afterwards.
    pub fn remove_range(&mut self, a: Pos, b: Pos) -> String {
        let a = self.clamp(a);
        let b = self.clamp(b);
        if b <= a {
            return String::new();
        }
        let removed = self.text_of_range(a, b);
        self.modified = true;

        if a.y == b.y {
            let line = &mut self.lines[a.y];
            let b0 = char_to_byte(line, a.x);
            let b1 = char_to_byte(line, b.x);
            line.replace_range(b0..b1, "");
        } else {
            let tail = {
                let last = &self.lines[b.y];
                last[char_to_byte(last, b.x)..].to_string()
            };
            {
                let first = &mut self.lines[a.y];
                let keep = char_to_byte(first, a.x);
                first.truncate(keep);
                first.push_str(&tail);
            }
            self.lines.drain(a.y + 1..=b.y);
        }
        removed
    }

    /// Extract the text between `a` and `b` without mutating anything.
    pub fn text_of_range(&self, a: Pos, b: Pos) -> String {
        let a = self.clamp(a);
        let b = self.clamp(b);
        if b <= a {
            return String::new();
        }
        if a.y == b.y {
            let line = &self.lines[a.y];
            return line[char_to_byte(line, a.x)..char_to_byte(line, b.x)].to_string();
        }
        let mut out = String::new();
        let first = &self.lines[a.y];
        out.push_str(&first[char_to_byte(first, a.x)..]);
        out.push('\n');
        for y in (a.y + 1)..b.y {
            out.push_str(&self.lines[y]);
            out.push('\n');
        }
        let last = &self.lines[b.y];
        out.push_str(&last[..char_to_byte(last, b.x)]);
        out
    }

    /// Position just past `text` if it were inserted at `p`.
    pub fn end_pos_after_insert(p: Pos, text: &str) -> Pos {
        let normalized = text.replace("\r\n", "\n");
        let mut parts = normalized.split('\n');
        let first = parts.next().unwrap_or_default();
        let mut end = Pos { y: p.y, x: p.x + first.chars().count() };
        for part in parts {
            end = Pos { y: end.y + 1, x: part.chars().count() };
        }
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== construction tests ====================

    #[test]
    fn new_buffer_has_one_empty_line() {
        let buf = Buffer::new();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0), "");
        assert!(!buf.modified);
    }

    #[test]
    fn from_string_detects_line_endings() {
        let lf = Buffer::from_string("a\nb");
        assert_eq!(lf.line_ending, LineEnding::LF);
        assert_eq!(lf.contents(), "a\nb");

        let crlf = Buffer::from_string("a\r\nb");
        assert_eq!(crlf.line_ending, LineEnding::CRLF);
        assert_eq!(crlf.line(0), "a");
        assert_eq!(crlf.contents(), "a\r\nb");
    }

    // ==================== insert tests ====================

    #[test]
    fn insert_single_line() {
        let mut buf = Buffer::from_string("ac");
        let end = buf.insert_text(Pos { y: 0, x: 1 }, "b");
        assert_eq!(buf.line(0), "abc");
        assert_eq!(end, Pos { y: 0, x: 2 });
        assert!(buf.modified);
    }

    #[test]
    fn insert_multiline_splits_line() {
        let mut buf = Buffer::from_string("start end");
        let end = buf.insert_text(Pos { y: 0, x: 6 }, "one\ntwo\nthree");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line(0), "start one");
        assert_eq!(buf.line(1), "two");
        assert_eq!(buf.line(2), "threeend");
        assert_eq!(end, Pos { y: 2, x: 5 });
    }

    #[test]
    fn insert_newline_with_indent_is_one_edit() {
        let mut buf = Buffer::from_string("    if x:rest");
        let end = buf.insert_text(Pos { y: 0, x: 9 }, "\n        ");
        assert_eq!(buf.line(0), "    if x:");
        assert_eq!(buf.line(1), "        rest");
        assert_eq!(end, Pos { y: 1, x: 8 });
    }

    #[test]
    fn insert_multibyte() {
        let mut buf = Buffer::from_string("hllo");
        let end = buf.insert_text(Pos { y: 0, x: 1 }, "é");
        assert_eq!(buf.line(0), "héllo");
        assert_eq!(end, Pos { y: 0, x: 2 });
    }

    // ==================== remove tests ====================

    #[test]
    fn remove_within_line() {
        let mut buf = Buffer::from_string("abcdef");
        let removed = buf.remove_range(Pos { y: 0, x: 1 }, Pos { y: 0, x: 4 });
        assert_eq!(removed, "bcd");
        assert_eq!(buf.line(0), "aef");
    }

    #[test]
    fn remove_across_lines() {
        let mut buf = Buffer::from_string("one\ntwo\nthree");
        let removed = buf.remove_range(Pos { y: 0, x: 2 }, Pos { y: 2, x: 3 });
        assert_eq!(removed, "e\ntwo\nthr");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0), "onee");
    }

    #[test]
    fn remove_inverted_range_is_noop() {
        let mut buf = Buffer::from_string("abc");
        let removed = buf.remove_range(Pos { y: 0, x: 2 }, Pos { y: 0, x: 1 });
        assert_eq!(removed, "");
        assert_eq!(buf.line(0), "abc");
        assert!(!buf.modified);
    }

    // ==================== range / position tests ====================

    #[test]
    fn text_of_range_multiline() {
        let buf = Buffer::from_string("one\ntwo\nthree");
        let text = buf.text_of_range(Pos { y: 0, x: 1 }, Pos { y: 2, x: 2 });
        assert_eq!(text, "ne\ntwo\nth");
    }

    #[test]
    fn clamp_limits_line_and_column() {
        let buf = Buffer::from_string("ab\ncdef");
        assert_eq!(buf.clamp(Pos { y: 9, x: 9 }), Pos { y: 1, x: 4 });
        assert_eq!(buf.clamp(Pos { y: 0, x: 9 }), Pos { y: 0, x: 2 });
    }

    #[test]
    fn end_pos_after_insert_matches_insert() {
        let mut buf = Buffer::from_string("xy");
        let p = Pos { y: 0, x: 1 };
        let predicted = Buffer::end_pos_after_insert(p, "a\nbb");
        let actual = buf.insert_text(p, "a\nbb");
        assert_eq!(predicted, actual);
    }

    #[test]
    fn roundtrip_insert_remove() {
        let mut buf = Buffer::from_string("hello world");
        let p = Pos { y: 0, x: 5 };
        let end = buf.insert_text(p, " brave\nnew");
        let removed = buf.remove_range(p, end);
        assert_eq!(removed, " brave\nnew");
        assert_eq!(buf.contents(), "hello world");
    }
}
