//! Editor: the application state and all editing operations.

mod clipboard;
mod file_ops;
mod input;
mod movement;
mod render;
mod search_ops;
mod undo;

use crate::buffer::Buffer;
use crate::config::Settings;
use crate::highlight::{Highlighter, PYTHON};
use crate::search::SearchOptions;
use crate::types::{Calltip, EditOperation, Pos, Prompt, StatusMsg, UndoEntry};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Find/replace state that outlives a single prompt: the last query, the
/// active flags, the last replacement, and the interactive replace session.
#[derive(Default)]
pub(crate) struct FindState {
    pub query: String,
    pub opts: SearchOptions,
    pub replacement: String,
    /// Number of replacements made so far in the running replace session;
    /// `None` when no session is active.
    pub session: Option<usize>,
}

/// The top-level application state.
///
/// `Editor` owns the document, the cursor/selection, the undo history, and
/// the UI bookkeeping (prompt, status message, calltip popup, scrolling).
/// The pure editing rules live in their own modules; this struct wires
/// keystrokes to them and applies the results to the buffer.
pub struct Editor {
    /// The editable document (lines of text + modified flag).
    pub buf: Buffer,

    /// Cursor position (0-based line, 0-based char column).
    pub cursor: Pos,

    /// Selection anchor. If `Some`, the selection runs from the anchor to
    /// `cursor`; if `None`, there is no selection.
    pub anchor: Option<Pos>,

    /// Viewport scroll position. In word-wrap mode `scroll_y` counts screen
    /// rows; otherwise it counts buffer lines.
    pub scroll_y: usize,
    pub scroll_x: usize,

    /// Path we'll save to. `None` until the buffer is associated with a file.
    pub file_path: Option<PathBuf>,

    /// Persisted settings (theme, calltips, word wrap).
    pub(crate) settings: Settings,

    /// Syntax highlighting rules + per-line span cache.
    pub(crate) highlighter: Highlighter,

    /// Optional bottom-line prompt (open/save/find/replace/goto).
    pub(crate) prompt: Option<Prompt>,

    /// Short-lived status message shown in the status bar.
    pub(crate) status: Option<StatusMsg>,

    /// Active calltip popup, expired from `tick()`.
    pub(crate) calltip: Option<Calltip>,

    /// Tracks quit-confirmation timing when the buffer is modified.
    pub(crate) last_quit_hint: Option<Instant>,

    /// Undo and redo stacks; each entry is one user-visible action.
    pub(crate) undo: Vec<UndoEntry>,
    pub(crate) redo: Vec<UndoEntry>,

    /// Clipboard access. Can be unavailable in headless terminals.
    pub(crate) clipboard: Option<arboard::Clipboard>,

    /// Find/replace state.
    pub(crate) find: FindState,

    /// Whether the screen needs to be redrawn.
    pub(crate) needs_redraw: bool,

    /// Whether word wrapping is enabled (mirrors the setting).
    pub word_wrap: bool,
}

impl Editor {
    /// Create a new editor, optionally opening the path from the command line.
    ///
    /// A path that does not exist yet is kept as the save target and the
    /// buffer starts empty, so `sypad new_file.py` works as expected.
    pub fn new(path: Option<PathBuf>, settings: Settings) -> Result<Self> {
        let mut buf = Buffer::new();
        let mut file_path = None;

        if let Some(p) = path {
            if p.exists() {
                let s = fs::read_to_string(&p)
                    .with_context(|| format!("Failed to read file: {}", p.display()))?;
                buf = Buffer::from_string(&s);
                file_path = Some(p);
            } else {
                file_path = Some(p);
            }
        }

        // Best effort: arboard can fail in headless or unusual terminals.
        let clipboard = arboard::Clipboard::new().ok();
        let word_wrap = settings.word_wrap;

        let mut ed = Self {
            buf,
            cursor: Pos { y: 0, x: 0 },
            anchor: None,
            scroll_y: 0,
            scroll_x: 0,
            file_path,
            settings,
            highlighter: Highlighter::new(&PYTHON),
            prompt: None,
            status: None,
            calltip: None,
            last_quit_hint: None,
            undo: vec![],
            redo: vec![],
            clipboard,
            find: FindState::default(),
            needs_redraw: true,
            word_wrap,
        };
        ed.set_status("Ctrl+S save • Ctrl+F find • Ctrl+H replace • Ctrl+Q quit", Duration::from_secs(4));
        Ok(ed)
    }

    /// Mark that the screen needs to be redrawn.
    pub(crate) fn mark_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Show a message in the status bar for `ttl`.
    pub(crate) fn set_status(&mut self, msg: impl Into<String>, ttl: Duration) {
        self.status = Some(StatusMsg { text: msg.into(), until: Instant::now() + ttl });
        self.mark_redraw();
    }

    /// Periodic updates when no input arrives: expire the status message
    /// and the calltip popup once their deadlines pass.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if self.status.as_ref().is_some_and(|st| now >= st.until) {
            self.status = None;
            self.mark_redraw();
        }
        if self.calltip.as_ref().is_some_and(|ct| now >= ct.until) {
            self.calltip = None;
            self.mark_redraw();
        }
    }

    /// Called when the terminal is resized.
    pub fn on_resize(&mut self) {
        self.mark_redraw();
        self.ensure_visible();
    }

    // ==================== selection ====================

    /// The normalized selection range `(start, end)`, `start <= end`.
    pub fn selection_range(&self) -> Option<(Pos, Pos)> {
        let a = self.anchor?;
        if a == self.cursor {
            None
        } else if a <= self.cursor {
            Some((a, self.cursor))
        } else {
            Some((self.cursor, a))
        }
    }

    /// Clear any selection (cursor stays put).
    pub(crate) fn clear_selection(&mut self) {
        if self.anchor.is_some() {
            self.anchor = None;
            self.mark_redraw();
        }
    }

    /// Select the entire buffer.
    pub(crate) fn select_all(&mut self) {
        self.anchor = Some(Pos { y: 0, x: 0 });
        self.cursor = self.buf.end_pos();
        self.mark_redraw();
    }

    /// The selected text, empty when nothing is selected.
    pub(crate) fn selected_text(&self) -> String {
        self.selection_range()
            .map(|(a, b)| self.buf.text_of_range(a, b))
            .unwrap_or_default()
    }

    // ==================== edit transactions ====================

    /// Every mutation of the buffer goes through a transaction so that one
    /// user action lands as one undo entry, however many inserts and
    /// deletes it needs.
    pub(crate) fn begin_tx(&self) -> EditTx {
        EditTx {
            ops: Vec::new(),
            cursor_before: self.cursor,
            anchor_before: self.anchor,
        }
    }

    /// Insert `text` at `pos` within a transaction; returns the end position.
    pub(crate) fn tx_insert(&mut self, tx: &mut EditTx, pos: Pos, text: &str) -> Pos {
        let end = self.buf.insert_text(pos, text);
        if end.y == pos.y {
            self.highlighter.invalidate_line(pos.y);
        } else {
            self.highlighter.invalidate_all();
        }
        tx.ops.push(EditOperation::Insert { pos, text: text.to_string() });
        end
    }

    /// Delete `a..b` within a transaction; returns the removed text.
    pub(crate) fn tx_delete(&mut self, tx: &mut EditTx, a: Pos, b: Pos) -> String {
        let removed = self.buf.remove_range(a, b);
        if a.y == b.y {
            self.highlighter.invalidate_line(a.y);
        } else {
            self.highlighter.invalidate_all();
        }
        tx.ops.push(EditOperation::Delete { start: a, deleted_text: removed.clone() });
        removed
    }

    /// Push the finished transaction onto the undo stack.
    pub(crate) fn commit_tx(&mut self, tx: EditTx) {
        if tx.ops.is_empty() {
            return;
        }
        const CAP: usize = 1000;
        self.undo.push(UndoEntry {
            ops: tx.ops,
            cursor_before: tx.cursor_before,
            anchor_before: tx.anchor_before,
        });
        if self.undo.len() > CAP {
            self.undo.drain(0..(self.undo.len() - CAP));
        }
        self.redo.clear();
        self.mark_redraw();
    }

    /// Replace the selection with `text`, or insert at the cursor when
    /// nothing is selected. One undo entry either way.
    pub(crate) fn insert_over_selection(&mut self, text: &str) {
        let mut tx = self.begin_tx();
        if let Some((a, b)) = self.selection_range() {
            self.tx_delete(&mut tx, a, b);
            self.cursor = a;
            self.anchor = None;
        }
        self.cursor = self.tx_insert(&mut tx, self.cursor, text);
        self.commit_tx(tx);
    }

    // ==================== quitting ====================

    /// Quit, demanding a second Ctrl+Q within two seconds when the buffer
    /// has unsaved changes.
    pub(crate) fn try_quit(&mut self) -> bool {
        if !self.buf.modified {
            return true;
        }
        let now = Instant::now();
        if let Some(t) = self.last_quit_hint {
            if now.duration_since(t) <= Duration::from_secs(2) {
                return true;
            }
        }
        self.last_quit_hint = Some(now);
        self.set_status("Unsaved changes! Press Ctrl+Q again to quit.", Duration::from_secs(2));
        false
    }
}

/// An in-progress undo transaction. See [`Editor::begin_tx`].
pub(crate) struct EditTx {
    ops: Vec<EditOperation>,
    cursor_before: Pos,
    anchor_before: Option<Pos>,
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn editor_with(text: &str) -> Editor {
        let mut ed = Editor::new(None, Settings::default()).unwrap();
        ed.buf = Buffer::from_string(text);
        ed.buf.modified = false;
        ed
    }

    #[test]
    fn selection_range_normalizes_direction() {
        let mut ed = editor_with("hello");
        ed.anchor = Some(Pos { y: 0, x: 4 });
        ed.cursor = Pos { y: 0, x: 1 };
        assert_eq!(
            ed.selection_range(),
            Some((Pos { y: 0, x: 1 }, Pos { y: 0, x: 4 }))
        );
    }

    #[test]
    fn empty_selection_is_none() {
        let mut ed = editor_with("hello");
        ed.anchor = Some(ed.cursor);
        assert_eq!(ed.selection_range(), None);
    }

    #[test]
    fn insert_over_selection_is_one_undo_entry() {
        let mut ed = editor_with("hello world");
        ed.anchor = Some(Pos { y: 0, x: 0 });
        ed.cursor = Pos { y: 0, x: 5 };
        ed.insert_over_selection("goodbye");
        assert_eq!(ed.buf.line(0), "goodbye world");
        assert_eq!(ed.undo.len(), 1);
        assert_eq!(ed.undo[0].ops.len(), 2);
    }

    #[test]
    fn select_all_spans_document() {
        let mut ed = editor_with("ab\ncd");
        ed.select_all();
        assert_eq!(ed.selected_text(), "ab\ncd");
    }

    #[test]
    fn tick_expires_calltip() {
        let mut ed = editor_with("");
        ed.calltip = Some(Calltip {
            text: "len(obj, /)".into(),
            anchor: Pos { y: 0, x: 0 },
            until: Instant::now() - Duration::from_millis(1),
        });
        ed.tick();
        assert!(ed.calltip.is_none());
    }
}
