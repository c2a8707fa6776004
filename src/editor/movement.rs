//! Cursor movement and viewport scrolling.

use super::render::{term_size, wrap_segments};
use super::Editor;
use crate::types::Pos;
use crate::utils::digits;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::cmp::{max, min};

/// Character class for word-boundary movement: whitespace, word, punctuation.
fn char_class(c: char) -> u8 {
    if c.is_whitespace() {
        0
    } else if c.is_alphanumeric() || c == '_' {
        1
    } else {
        2
    }
}

impl Editor {
    /// Rows available for document text with the current prompt state.
    pub(crate) fn editor_height(&self) -> usize {
        let (_w, h) = term_size();
        h.saturating_sub(1 + usize::from(self.prompt.is_some()))
    }

    /// Move the cursor for a movement key. With `selecting` (Shift held)
    /// the selection is created or extended; otherwise it is cleared.
    pub(crate) fn move_cursor(&mut self, key: KeyEvent, selecting: bool) {
        if selecting && self.anchor.is_none() {
            self.anchor = Some(self.cursor);
        }
        if !selecting {
            self.clear_selection();
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let mut p = self.cursor;

        match key.code {
            KeyCode::Left => {
                if ctrl {
                    p = self.word_left(p);
                } else if p.x > 0 {
                    p.x -= 1;
                } else if p.y > 0 {
                    p.y -= 1;
                    p.x = self.buf.line_len(p.y);
                }
            }
            KeyCode::Right => {
                if ctrl {
                    p = self.word_right(p);
                } else if p.x < self.buf.line_len(p.y) {
                    p.x += 1;
                } else if p.y + 1 < self.buf.line_count() {
                    p.y += 1;
                    p.x = 0;
                }
            }
            KeyCode::Up => {
                if p.y > 0 {
                    p.y -= 1;
                    p.x = min(p.x, self.buf.line_len(p.y));
                }
            }
            KeyCode::Down => {
                if p.y + 1 < self.buf.line_count() {
                    p.y += 1;
                    p.x = min(p.x, self.buf.line_len(p.y));
                }
            }
            KeyCode::Home => {
                if ctrl {
                    p = Pos { y: 0, x: 0 };
                } else {
                    p.x = 0;
                }
            }
            KeyCode::End => {
                if ctrl {
                    p = self.buf.end_pos();
                } else {
                    p.x = self.buf.line_len(p.y);
                }
            }
            KeyCode::PageUp => {
                let jump = self.editor_height().saturating_sub(1).max(1);
                p.y = p.y.saturating_sub(jump);
                p.x = min(p.x, self.buf.line_len(p.y));
            }
            KeyCode::PageDown => {
                let jump = self.editor_height().saturating_sub(1).max(1);
                p.y = min(p.y + jump, self.buf.line_count().saturating_sub(1));
                p.x = min(p.x, self.buf.line_len(p.y));
            }
            _ => {}
        }

        let old = self.cursor;
        self.cursor = self.buf.clamp(p);
        if old != self.cursor {
            self.mark_redraw();
        }
        self.ensure_visible();
    }

    /// Start of the word (or punctuation run) left of `p`.
    fn word_left(&self, p: Pos) -> Pos {
        if p.x == 0 {
            if p.y > 0 {
                return Pos { y: p.y - 1, x: self.buf.line_len(p.y - 1) };
            }
            return p;
        }
        let chars: Vec<char> = self.buf.line(p.y).chars().collect();
        let mut x = p.x;
        while x > 0 && chars[x - 1].is_whitespace() {
            x -= 1;
        }
        if x > 0 {
            let class = char_class(chars[x - 1]);
            while x > 0 && char_class(chars[x - 1]) == class {
                x -= 1;
            }
        }
        Pos { y: p.y, x }
    }

    /// Start of the next word (or line) right of `p`.
    fn word_right(&self, p: Pos) -> Pos {
        let chars: Vec<char> = self.buf.line(p.y).chars().collect();
        let mut x = p.x;
        if x >= chars.len() {
            if p.y + 1 < self.buf.line_count() {
                return Pos { y: p.y + 1, x: 0 };
            }
            return p;
        }
        let class = char_class(chars[x]);
        while x < chars.len() && char_class(chars[x]) == class {
            x += 1;
        }
        while x < chars.len() && chars[x].is_whitespace() {
            x += 1;
        }
        Pos { y: p.y, x }
    }

    /// Adjust `scroll_x`/`scroll_y` so the cursor is on screen.
    pub(crate) fn ensure_visible(&mut self) {
        let (width, _h) = term_size();
        let editor_h = self.editor_height();
        if editor_h == 0 {
            return;
        }
        let lnw = max(2, digits(self.buf.line_count()));
        let gutter = lnw + 2;
        let avail = width.saturating_sub(gutter).max(1);
        let old = (self.scroll_y, self.scroll_x);

        if self.word_wrap {
            // scroll_y counts screen rows in wrap mode
            let mut row = 0;
            for y in 0..self.cursor.y {
                row += wrap_segments(self.buf.line(y), avail).len();
            }
            let segs = wrap_segments(self.buf.line(self.cursor.y), avail);
            row += segs
                .iter()
                .rposition(|&(start, _)| self.cursor.x >= start)
                .unwrap_or(0);

            if row < self.scroll_y {
                self.scroll_y = row;
            } else if row >= self.scroll_y + editor_h {
                self.scroll_y = row + 1 - editor_h;
            }
            self.scroll_x = 0;
        } else {
            if self.cursor.y < self.scroll_y {
                self.scroll_y = self.cursor.y;
            } else if self.cursor.y >= self.scroll_y + editor_h {
                self.scroll_y = self.cursor.y + 1 - editor_h;
            }

            let text_avail = avail.saturating_sub(1).max(1);
            if self.cursor.x < self.scroll_x {
                self.scroll_x = self.cursor.x;
            } else if self.cursor.x >= self.scroll_x + text_avail {
                self.scroll_x = self.cursor.x + 1 - text_avail;
            }
        }

        if old != (self.scroll_y, self.scroll_x) {
            self.mark_redraw();
        }
    }
}
