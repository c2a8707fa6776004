//! Input handling: the keystroke decision chain and prompt editing.
//!
//! Document keystrokes resolve in a fixed priority order: the calltip
//! chord, cancel/commit keys, indentation keys, bracket pairing/skip-over,
//! then plain insertion. Prompts and the replace session consume keys
//! before any of that.

use super::Editor;
use crate::calltips;
use crate::edit::{decide_char, identifier_before, TypeDecision};
use crate::indent::{newline_insertion, unindent_line, INDENT};
use crate::types::{Calltip, Pos, Prompt, PromptKind};
use crate::utils::char_to_byte;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::cmp::min;
use std::path::PathBuf;
use std::time::{Duration, Instant};

impl Editor {
    /// Top-level key handler. Returns `Ok(true)` when the editor should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        // Prompt mode consumes keys first.
        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }
        // The interactive replace session is next in line.
        if self.find.session.is_some() {
            self.handle_replace_key(key);
            return Ok(false);
        }

        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        // Calltip chord: consumed outright, independent of everything else.
        if ctrl && key.code == KeyCode::Char(' ') {
            self.try_show_calltip(self.cursor.x);
            return Ok(false);
        }

        // Movement keys (selection-aware with Shift).
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right
            | KeyCode::Home | KeyCode::End | KeyCode::PageUp | KeyCode::PageDown => {
                self.move_cursor(key, shift);
                return Ok(false);
            }
            _ => {}
        }

        if key.code == KeyCode::F(3) {
            self.repeat_find(shift);
            return Ok(false);
        }

        // Global chords.
        match (key.code, ctrl, alt) {
            (KeyCode::Char('q'), true, _) => return Ok(self.try_quit()),
            (KeyCode::Char('s'), true, _) => {
                if let Err(e) = self.cmd_save() {
                    self.set_status(format!("{e:#}"), Duration::from_secs(3));
                }
                return Ok(false);
            }
            (KeyCode::Char('o'), true, _) => {
                self.prompt = Some(Prompt::new(PromptKind::Open, ""));
                self.mark_redraw();
                return Ok(false);
            }
            (KeyCode::Char('f'), true, _) => {
                self.open_find_prompt();
                return Ok(false);
            }
            (KeyCode::Char('h'), true, _) => {
                self.open_replace_prompt();
                return Ok(false);
            }
            (KeyCode::Char('g'), true, _) => {
                self.prompt = Some(Prompt::new(PromptKind::GotoLine, ""));
                self.mark_redraw();
                return Ok(false);
            }
            (KeyCode::Char('a'), true, _) => {
                self.select_all();
                self.ensure_visible();
                return Ok(false);
            }
            (KeyCode::Char('z'), true, _) => {
                self.undo();
                return Ok(false);
            }
            (KeyCode::Char('y'), true, _) => {
                self.redo();
                return Ok(false);
            }
            (KeyCode::Char('c'), true, _) => {
                self.copy();
                return Ok(false);
            }
            (KeyCode::Char('x'), true, _) => {
                self.cut();
                return Ok(false);
            }
            (KeyCode::Char('v'), true, _) => {
                self.paste();
                return Ok(false);
            }
            (KeyCode::Char('t'), false, true) => {
                self.toggle_theme();
                return Ok(false);
            }
            (KeyCode::Char('k'), false, true) => {
                self.toggle_calltips();
                return Ok(false);
            }
            (KeyCode::Char('w'), false, true) => {
                self.toggle_word_wrap();
                return Ok(false);
            }
            _ => {}
        }

        match key.code {
            KeyCode::Esc => {
                // dismiss the popup; Esc never falls through to an edit
                self.calltip = None;
                self.clear_selection();
                self.mark_redraw();
            }
            KeyCode::Enter => {
                // dismiss the popup, then auto-indent
                self.calltip = None;
                self.insert_newline_indented();
                self.ensure_visible();
            }
            KeyCode::Tab => {
                self.insert_over_selection(INDENT);
                self.ensure_visible();
            }
            KeyCode::BackTab => {
                self.dedent_selection();
                self.ensure_visible();
            }
            KeyCode::Backspace => {
                self.delete_backward();
                self.ensure_visible();
            }
            KeyCode::Delete => {
                self.delete_forward();
                self.ensure_visible();
            }
            KeyCode::Char(ch) => {
                if !ctrl && !alt {
                    self.type_char(ch);
                    self.ensure_visible();
                }
            }
            _ => {}
        }

        Ok(false)
    }

    /// Printable-character dispatch: bracket pairing, skip-over, or plain
    /// insertion.
    fn type_char(&mut self, ch: char) {
        let next_char = self.buf.line(self.cursor.y).chars().nth(self.cursor.x);
        match decide_char(ch, self.selection_range().is_some(), next_char) {
            TypeDecision::InsertPair { close } => {
                let pair: String = [ch, close].iter().collect();
                self.insert_over_selection(&pair);
                // leave the cursor between the pair
                self.cursor.x -= 1;
                if ch == '(' {
                    self.try_show_calltip(self.cursor.x - 1);
                }
            }
            TypeDecision::SkipOver => {
                self.cursor.x += 1;
                if ch == ')' {
                    self.calltip = None;
                }
                self.mark_redraw();
            }
            TypeDecision::Plain => {
                self.insert_over_selection(&ch.to_string());
            }
        }
    }

    /// Enter: replace any selection with a newline plus computed
    /// indentation. A single undo entry covers the whole thing.
    fn insert_newline_indented(&mut self) {
        let mut tx = self.begin_tx();
        if let Some((a, b)) = self.selection_range() {
            self.tx_delete(&mut tx, a, b);
            self.cursor = a;
            self.anchor = None;
        }
        let prefix = {
            let line = self.buf.line(self.cursor.y);
            line[..char_to_byte(line, self.cursor.x)].to_string()
        };
        let text = newline_insertion(&prefix, INDENT);
        self.cursor = self.tx_insert(&mut tx, self.cursor, &text);
        self.commit_tx(tx);
    }

    /// Shift+Tab: remove one indent unit from the cursor line, or from
    /// every line the selection touches. The selection's extent survives
    /// as well as the shifted columns allow.
    fn dedent_selection(&mut self) {
        let (first, last) = match self.selection_range() {
            Some((a, b)) => {
                // a line the selection merely ends *at* (column 0) stays put
                let last = if b.x == 0 && b.y > a.y { b.y - 1 } else { b.y };
                (a.y, last)
            }
            None => (self.cursor.y, self.cursor.y),
        };
        let unit_len = INDENT.chars().count();
        let mut tx = self.begin_tx();
        for y in first..=last {
            let line = self.buf.line(y);
            if unindent_line(line, INDENT).len() == line.len() {
                continue;
            }
            self.tx_delete(&mut tx, Pos { y, x: 0 }, Pos { y, x: unit_len });
            if self.cursor.y == y {
                self.cursor.x = self.cursor.x.saturating_sub(unit_len);
            }
            if let Some(a) = &mut self.anchor {
                if a.y == y {
                    a.x = a.x.saturating_sub(unit_len);
                }
            }
        }
        self.commit_tx(tx);
    }

    fn delete_backward(&mut self) {
        let mut tx = self.begin_tx();
        if let Some((a, b)) = self.selection_range() {
            self.tx_delete(&mut tx, a, b);
            self.cursor = a;
            self.anchor = None;
        } else if self.cursor.x > 0 {
            let start = Pos { y: self.cursor.y, x: self.cursor.x - 1 };
            self.tx_delete(&mut tx, start, self.cursor);
            self.cursor = start;
        } else if self.cursor.y > 0 {
            // merge with the previous line
            let start = Pos { y: self.cursor.y - 1, x: self.buf.line_len(self.cursor.y - 1) };
            self.tx_delete(&mut tx, start, self.cursor);
            self.cursor = start;
        }
        self.commit_tx(tx);
    }

    fn delete_forward(&mut self) {
        let mut tx = self.begin_tx();
        if let Some((a, b)) = self.selection_range() {
            self.tx_delete(&mut tx, a, b);
            self.cursor = a;
            self.anchor = None;
        } else {
            let end = if self.cursor.x < self.buf.line_len(self.cursor.y) {
                Pos { y: self.cursor.y, x: self.cursor.x + 1 }
            } else if self.cursor.y + 1 < self.buf.line_count() {
                Pos { y: self.cursor.y + 1, x: 0 }
            } else {
                self.cursor
            };
            if end != self.cursor {
                self.tx_delete(&mut tx, self.cursor, end);
            }
        }
        self.commit_tx(tx);
    }

    /// Resolve and show a calltip for the identifier ending at `col` on the
    /// cursor line. Unknown and non-callable names show nothing.
    pub(crate) fn try_show_calltip(&mut self, col: usize) {
        if !self.settings.show_calltips {
            return;
        }
        let tip = {
            let line = self.buf.line(self.cursor.y);
            identifier_before(line, col).and_then(calltips::resolve)
        };
        let Some(text) = tip else { return };
        self.calltip = Some(Calltip {
            text,
            anchor: Pos { y: self.cursor.y, x: col },
            until: Instant::now() + self.settings.calltip_timeout(),
        });
        self.mark_redraw();
    }

    // ==================== settings toggles ====================

    fn toggle_theme(&mut self) {
        self.settings.theme = self.settings.theme.toggled();
        self.settings.save();
        // every visible line restyles before the next paint
        self.highlighter.invalidate_all();
        let name = match self.settings.theme {
            crate::theme::Theme::Dark => "dark",
            crate::theme::Theme::Light => "light",
        };
        self.set_status(format!("Theme: {name}"), Duration::from_secs(2));
    }

    fn toggle_calltips(&mut self) {
        self.settings.show_calltips = !self.settings.show_calltips;
        if !self.settings.show_calltips {
            self.calltip = None;
        }
        self.settings.save();
        let state = if self.settings.show_calltips { "on" } else { "off" };
        self.set_status(format!("Calltips: {state}"), Duration::from_secs(2));
    }

    fn toggle_word_wrap(&mut self) {
        self.word_wrap = !self.word_wrap;
        self.settings.word_wrap = self.word_wrap;
        self.settings.save();
        self.scroll_x = 0;
        self.scroll_y = 0;
        self.ensure_visible();
        let state = if self.word_wrap { "on" } else { "off" };
        self.set_status(format!("Word wrap: {state}"), Duration::from_secs(2));
    }

    // ==================== prompt editing ====================

    /// Handle keys while a prompt is active: most keys edit the prompt
    /// input; Enter submits, Esc cancels.
    fn handle_prompt_key(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        // Search-flag toggles apply while a find/replace prompt is open.
        let kind = self.prompt.as_ref().map(|p| p.kind);
        if alt && matches!(kind, Some(PromptKind::Find | PromptKind::ReplaceQuery)) {
            match key.code {
                KeyCode::Char('c') => {
                    self.find.opts.case_sensitive = !self.find.opts.case_sensitive;
                    self.mark_redraw();
                    return Ok(false);
                }
                KeyCode::Char('w') => {
                    self.find.opts.whole_word = !self.find.opts.whole_word;
                    self.mark_redraw();
                    return Ok(false);
                }
                _ => {}
            }
        }

        let Some(prompt) = &mut self.prompt else { return Ok(false) };
        match (key.code, ctrl) {
            (KeyCode::Esc, _) => {
                self.prompt = None;
                self.mark_redraw();
            }
            (KeyCode::Enter, _) => {
                let kind = prompt.kind;
                let input = prompt.input.clone();
                self.prompt = None;
                self.mark_redraw();
                return self.submit_prompt(kind, input);
            }
            (KeyCode::Backspace, _) => {
                if prompt.cursor > 0 {
                    let mut chars: Vec<char> = prompt.input.chars().collect();
                    chars.remove(prompt.cursor - 1);
                    prompt.input = chars.into_iter().collect();
                    prompt.cursor -= 1;
                    self.mark_redraw();
                }
            }
            (KeyCode::Delete, _) => {
                let len = prompt.input.chars().count();
                if prompt.cursor < len {
                    let mut chars: Vec<char> = prompt.input.chars().collect();
                    chars.remove(prompt.cursor);
                    prompt.input = chars.into_iter().collect();
                    self.mark_redraw();
                }
            }
            (KeyCode::Left, _) => {
                prompt.cursor = prompt.cursor.saturating_sub(1);
                self.mark_redraw();
            }
            (KeyCode::Right, _) => {
                prompt.cursor = min(prompt.cursor + 1, prompt.input.chars().count());
                self.mark_redraw();
            }
            (KeyCode::Home, _) => {
                prompt.cursor = 0;
                self.mark_redraw();
            }
            (KeyCode::End, _) => {
                prompt.cursor = prompt.input.chars().count();
                self.mark_redraw();
            }
            (KeyCode::Char('u'), true) => {
                prompt.input.clear();
                prompt.cursor = 0;
                self.mark_redraw();
            }
            (KeyCode::Char(ch), false) => {
                if !alt {
                    let mut chars: Vec<char> = prompt.input.chars().collect();
                    chars.insert(prompt.cursor, ch);
                    prompt.input = chars.into_iter().collect();
                    prompt.cursor += 1;
                    self.mark_redraw();
                }
            }
            _ => {}
        }
        Ok(false)
    }

    /// Perform the action a submitted prompt asked for. Filesystem errors
    /// land in the status bar; they never take the editor down.
    fn submit_prompt(&mut self, kind: PromptKind, input: String) -> Result<bool> {
        match kind {
            PromptKind::Open => {
                let p = PathBuf::from(input.trim());
                if !p.as_os_str().is_empty() {
                    if let Err(e) = self.open_path(p) {
                        self.set_status(format!("{e:#}"), Duration::from_secs(3));
                    }
                }
            }
            PromptKind::SaveAs => {
                let p = PathBuf::from(input.trim());
                if !p.as_os_str().is_empty() {
                    if let Err(e) = self.save_to_path(p) {
                        self.set_status(format!("{e:#}"), Duration::from_secs(3));
                    }
                }
            }
            PromptKind::GotoLine => {
                let n: usize = input.trim().parse().unwrap_or(1);
                let target = n.max(1).min(self.buf.line_count()) - 1;
                self.cursor.y = target;
                self.cursor.x = min(self.cursor.x, self.buf.line_len(target));
                self.clear_selection();
                self.mark_redraw();
                self.ensure_visible();
            }
            PromptKind::Find => self.submit_find(&input),
            PromptKind::ReplaceQuery => self.submit_replace_query(&input),
            PromptKind::ReplaceWith => self.submit_replace_with(input),
        }
        Ok(false)
    }
}
