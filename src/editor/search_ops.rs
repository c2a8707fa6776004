//! Find and replace flows: prompts, repeat-find, and the interactive
//! replace session.
//!
//! The scanning itself lives in `crate::search`; this module decides where
//! scans start, what the selection becomes, and when to wrap around the
//! document edge (the core never wraps on its own).

use super::Editor;
use crate::search;
use crate::types::{Pos, Prompt, PromptKind};
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Duration;

impl Editor {
    pub(crate) fn open_find_prompt(&mut self) {
        self.prompt = Some(Prompt::new(PromptKind::Find, self.find.query.clone()));
        self.set_status("Alt+C toggle case • Alt+W toggle whole word • F3 repeat", Duration::from_secs(3));
    }

    pub(crate) fn open_replace_prompt(&mut self) {
        self.prompt = Some(Prompt::new(PromptKind::ReplaceQuery, self.find.query.clone()));
        self.set_status("Alt+C toggle case • Alt+W toggle whole word", Duration::from_secs(3));
    }

    /// Position one step before `p` in reading order; `None` at the very
    /// start of the document.
    fn pos_before(&self, p: Pos) -> Option<Pos> {
        if p.x > 0 {
            Some(Pos { y: p.y, x: p.x - 1 })
        } else if p.y > 0 {
            Some(Pos { y: p.y - 1, x: self.buf.line_len(p.y - 1) })
        } else {
            None
        }
    }

    /// Forward find treating `start` itself as a candidate match position.
    fn find_inclusive(&self, start: Pos) -> Option<(Pos, Pos)> {
        match self.pos_before(start) {
            Some(from) => search::find_next(&self.buf, &self.find.query, from, self.find.opts, false),
            None => search::find_all(&self.buf, &self.find.query, self.find.opts)
                .into_iter()
                .next(),
        }
    }

    /// Make a hit the current selection and bring it on screen.
    fn select_match(&mut self, m: (Pos, Pos)) {
        self.anchor = Some(m.0);
        self.cursor = m.1;
        self.mark_redraw();
        self.ensure_visible();
    }

    /// Where a repeated scan should measure from: the current match start
    /// when the selection holds one, the cursor otherwise.
    fn scan_origin(&self) -> Pos {
        self.selection_range().map_or(self.cursor, |(a, _)| a)
    }

    /// Submitted Find prompt: search from the cursor, wrapping once.
    pub(crate) fn submit_find(&mut self, input: &str) {
        if input.is_empty() {
            self.set_status("Empty search pattern.", Duration::from_secs(2));
            return;
        }
        self.find.query = input.to_string();
        match self.find_inclusive(self.cursor) {
            Some(m) => self.select_match(m),
            None => self.wrap_find(false),
        }
    }

    /// F3 / Shift+F3: jump to the next or previous occurrence.
    pub(crate) fn repeat_find(&mut self, backward: bool) {
        if self.find.query.is_empty() {
            self.open_find_prompt();
            return;
        }
        let from = self.scan_origin();
        match search::find_next(&self.buf, &self.find.query, from, self.find.opts, backward) {
            Some(m) => self.select_match(m),
            None => self.wrap_find(backward),
        }
    }

    /// One wrap-around attempt from the document edge, reported as such.
    fn wrap_find(&mut self, backward: bool) {
        let wrapped = if backward {
            search::find_next(&self.buf, &self.find.query, self.buf.end_pos(), self.find.opts, true)
        } else {
            search::find_all(&self.buf, &self.find.query, self.find.opts)
                .into_iter()
                .next()
        };
        match wrapped {
            Some(m) => {
                self.select_match(m);
                self.set_status("Search wrapped.", Duration::from_secs(2));
            }
            None => self.set_status("No matches.", Duration::from_secs(2)),
        }
    }

    /// Submitted Replace prompt (stage one): remember the query and ask for
    /// the replacement text.
    pub(crate) fn submit_replace_query(&mut self, input: &str) {
        if input.is_empty() {
            self.set_status("Empty search pattern.", Duration::from_secs(2));
            return;
        }
        self.find.query = input.to_string();
        self.prompt = Some(Prompt::new(PromptKind::ReplaceWith, self.find.replacement.clone()));
        self.mark_redraw();
    }

    /// Submitted With prompt (stage two): select the first hit and start
    /// the interactive session.
    pub(crate) fn submit_replace_with(&mut self, input: String) {
        self.find.replacement = input;
        match self.find_inclusive(self.cursor) {
            Some(m) => {
                self.select_match(m);
                self.find.session = Some(0);
                self.mark_redraw();
            }
            None => self.set_status("No matches.", Duration::from_secs(2)),
        }
    }

    /// Keys during the replace session: Enter/`y` replace-and-advance,
    /// `n` skip, `a` all, Esc/`q` stop.
    pub(crate) fn handle_replace_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') => {
                let replaced = self.replace_current();
                if replaced {
                    if let Some(n) = &mut self.find.session {
                        *n += 1;
                    }
                }
                self.advance_session(replaced);
            }
            KeyCode::Char('n') => self.advance_session(false),
            KeyCode::Char('a') => {
                let count = self.replace_all();
                let total = self.find.session.take().unwrap_or(0) + count;
                self.clear_selection();
                self.set_status(
                    format!("Replaced {total} occurrence(s)."),
                    Duration::from_secs(3),
                );
            }
            KeyCode::Esc | KeyCode::Char('q') => self.end_session(),
            _ => {}
        }
    }

    /// Move the session to the next match, or finish when there is none.
    ///
    /// After a replacement the cursor sits at the end of the inserted text;
    /// scanning restarts just before it so an adjacent match is not
    /// skipped. After a skip, scanning restarts at the skipped match.
    fn advance_session(&mut self, after_replace: bool) {
        let next = if after_replace {
            match self.pos_before(self.cursor) {
                Some(from) => {
                    search::find_next(&self.buf, &self.find.query, from, self.find.opts, false)
                }
                None => self.find_inclusive(self.cursor),
            }
        } else {
            search::find_next(&self.buf, &self.find.query, self.scan_origin(), self.find.opts, false)
        };
        match next {
            Some(m) => self.select_match(m),
            None => self.end_session(),
        }
    }

    fn end_session(&mut self) {
        if let Some(n) = self.find.session.take() {
            self.set_status(format!("Replaced {n} occurrence(s)."), Duration::from_secs(3));
        }
        self.clear_selection();
        self.mark_redraw();
    }

    /// Replace the current selection when it is an active match. Reports
    /// failure (no selection, or selection that is not a match) with a
    /// transient message and `false`; never an error.
    pub(crate) fn replace_current(&mut self) -> bool {
        let Some((a, b)) = self.selection_range() else {
            self.set_status("No active match to replace.", Duration::from_secs(2));
            return false;
        };
        if !search::range_matches(&self.buf, a, b, &self.find.query, self.find.opts) {
            self.set_status("Selection is not a match.", Duration::from_secs(2));
            return false;
        }
        let replacement = self.find.replacement.clone();
        let mut tx = self.begin_tx();
        self.tx_delete(&mut tx, a, b);
        self.cursor = self.tx_insert(&mut tx, a, &replacement);
        self.anchor = None;
        self.commit_tx(tx);
        true
    }

    /// Replace every non-overlapping match in the whole document inside a
    /// single undo transaction. Returns the replacement count; an empty
    /// query replaces nothing.
    pub(crate) fn replace_all(&mut self) -> usize {
        let query = self.find.query.clone();
        if query.is_empty() {
            return 0;
        }
        let replacement = self.find.replacement.clone();
        let matches = search::find_all(&self.buf, &query, self.find.opts);
        if matches.is_empty() {
            return 0;
        }
        let mut tx = self.begin_tx();
        // applied back to front so earlier match positions stay valid
        for &(a, b) in matches.iter().rev() {
            self.tx_delete(&mut tx, a, b);
            self.tx_insert(&mut tx, a, &replacement);
        }
        self.cursor = self.buf.clamp(self.cursor);
        self.anchor = None;
        self.commit_tx(tx);
        matches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::editor_with;
    use crate::search::SearchOptions;
    use crate::types::Pos;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn session_key(ed: &mut super::Editor, code: KeyCode) {
        ed.handle_replace_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    // ==================== replace_all tests ====================

    #[test]
    fn replace_all_case_insensitive_counts_every_match() {
        let mut ed = editor_with("Foo foo FOO");
        ed.find.query = "foo".into();
        ed.find.replacement = "bar".into();
        ed.find.opts = SearchOptions { case_sensitive: false, whole_word: false };
        assert_eq!(ed.replace_all(), 3);
        assert_eq!(ed.buf.line(0), "bar bar bar");
    }

    #[test]
    fn replace_all_empty_query_is_a_no_op() {
        let mut ed = editor_with("anything");
        ed.find.query = String::new();
        ed.find.replacement = "x".into();
        assert_eq!(ed.replace_all(), 0);
        assert_eq!(ed.buf.line(0), "anything");
        assert!(!ed.buf.modified);
    }

    #[test]
    fn replace_all_is_one_undo_step() {
        let mut ed = editor_with("a b a b a");
        ed.find.query = "a".into();
        ed.find.replacement = "long".into();
        ed.find.opts = SearchOptions { case_sensitive: true, whole_word: false };
        assert_eq!(ed.replace_all(), 3);
        assert_eq!(ed.buf.line(0), "long b long b long");
        assert_eq!(ed.undo.len(), 1);
        ed.undo();
        assert_eq!(ed.buf.line(0), "a b a b a");
    }

    #[test]
    fn replace_all_spans_multiple_lines() {
        let mut ed = editor_with("x = 1\ny = x + x\nreturn x");
        ed.find.query = "x".into();
        ed.find.replacement = "value".into();
        assert_eq!(ed.replace_all(), 4);
        assert_eq!(ed.buf.line(1), "y = value + value");
    }

    // ==================== replace_current tests ====================

    #[test]
    fn replace_current_without_selection_is_false() {
        let mut ed = editor_with("foo");
        ed.find.query = "foo".into();
        ed.find.replacement = "bar".into();
        assert!(!ed.replace_current());
        assert_eq!(ed.buf.line(0), "foo");
    }

    #[test]
    fn replace_current_rejects_non_match_selection() {
        let mut ed = editor_with("hello world");
        ed.find.query = "foo".into();
        ed.anchor = Some(Pos { y: 0, x: 0 });
        ed.cursor = Pos { y: 0, x: 5 };
        assert!(!ed.replace_current());
        assert_eq!(ed.buf.line(0), "hello world");
    }

    #[test]
    fn replace_current_applies_on_active_match() {
        let mut ed = editor_with("say hello");
        ed.find.query = "hello".into();
        ed.find.replacement = "goodbye".into();
        ed.anchor = Some(Pos { y: 0, x: 4 });
        ed.cursor = Pos { y: 0, x: 9 };
        assert!(ed.replace_current());
        assert_eq!(ed.buf.line(0), "say goodbye");
        assert_eq!(ed.cursor, Pos { y: 0, x: 11 });
    }

    // ==================== session tests ====================

    #[test]
    fn session_replaces_adjacent_matches_without_skipping() {
        let mut ed = editor_with("aaa");
        ed.find.query = "a".into();
        ed.submit_replace_with("b".into());
        assert!(ed.find.session.is_some());
        session_key(&mut ed, KeyCode::Char('y'));
        session_key(&mut ed, KeyCode::Char('y'));
        session_key(&mut ed, KeyCode::Char('y'));
        assert_eq!(ed.buf.line(0), "bbb");
        // the third replacement exhausted the matches: session over
        assert!(ed.find.session.is_none());
    }

    #[test]
    fn session_skip_leaves_match_untouched() {
        let mut ed = editor_with("a a");
        ed.find.query = "a".into();
        ed.submit_replace_with("b".into());
        session_key(&mut ed, KeyCode::Char('n'));
        session_key(&mut ed, KeyCode::Char('y'));
        assert_eq!(ed.buf.line(0), "a b");
    }

    #[test]
    fn session_all_reports_total() {
        let mut ed = editor_with("x x x");
        ed.find.query = "x".into();
        ed.submit_replace_with("y".into());
        session_key(&mut ed, KeyCode::Char('a'));
        assert_eq!(ed.buf.line(0), "y y y");
        assert!(ed.find.session.is_none());
    }

    #[test]
    fn session_quit_stops_immediately() {
        let mut ed = editor_with("q q");
        ed.find.query = "q".into();
        ed.submit_replace_with("z".into());
        session_key(&mut ed, KeyCode::Esc);
        assert_eq!(ed.buf.line(0), "q q");
        assert!(ed.find.session.is_none());
    }

    // ==================== find flow tests ====================

    #[test]
    fn submit_find_selects_first_hit_from_cursor() {
        let mut ed = editor_with("one two one");
        ed.submit_find("one");
        assert_eq!(
            ed.selection_range(),
            Some((Pos { y: 0, x: 0 }, Pos { y: 0, x: 3 }))
        );
    }

    #[test]
    fn repeat_find_advances_and_wraps() {
        let mut ed = editor_with("hit miss hit");
        ed.submit_find("hit");
        ed.repeat_find(false);
        assert_eq!(
            ed.selection_range(),
            Some((Pos { y: 0, x: 9 }, Pos { y: 0, x: 12 }))
        );
        // wrap back to the first occurrence
        ed.repeat_find(false);
        assert_eq!(
            ed.selection_range(),
            Some((Pos { y: 0, x: 0 }, Pos { y: 0, x: 3 }))
        );
    }

    #[test]
    fn repeat_find_backward_goes_to_previous() {
        let mut ed = editor_with("ab ab ab");
        ed.cursor = Pos { y: 0, x: 8 };
        ed.submit_find("ab");
        // no hit after the cursor: wraps to the first one
        assert_eq!(
            ed.selection_range(),
            Some((Pos { y: 0, x: 0 }, Pos { y: 0, x: 2 }))
        );
        ed.cursor = Pos { y: 0, x: 8 };
        ed.anchor = None;
        ed.repeat_find(true);
        assert_eq!(
            ed.selection_range(),
            Some((Pos { y: 0, x: 6 }, Pos { y: 0, x: 8 }))
        );
    }
}
