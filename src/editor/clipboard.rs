//! Clipboard operations: copy, cut, paste.

use super::Editor;
use std::time::Duration;

impl Editor {
    pub(crate) fn copy(&mut self) {
        let text = self.selected_text();
        if text.is_empty() {
            self.set_status("Nothing selected to copy.", Duration::from_secs(2));
            return;
        }
        if let Some(cb) = &mut self.clipboard {
            cb.set_text(text).ok();
            self.set_status("Copied selection.", Duration::from_secs(2));
        } else {
            self.set_status("Clipboard unavailable.", Duration::from_secs(2));
        }
    }

    pub(crate) fn cut(&mut self) {
        let Some((a, b)) = self.selection_range() else {
            self.set_status("Nothing selected to cut.", Duration::from_secs(2));
            return;
        };
        let mut tx = self.begin_tx();
        let text = self.tx_delete(&mut tx, a, b);
        self.cursor = a;
        self.anchor = None;
        self.commit_tx(tx);
        if let Some(cb) = &mut self.clipboard {
            cb.set_text(text).ok();
        }
        self.ensure_visible();
        self.set_status("Cut selection.", Duration::from_secs(2));
    }

    pub(crate) fn paste(&mut self) {
        let text = self.clipboard.as_mut().and_then(|cb| cb.get_text().ok());
        match text {
            Some(t) if !t.is_empty() => {
                self.insert_over_selection(&t);
                self.ensure_visible();
                self.set_status("Pasted.", Duration::from_secs(2));
            }
            _ => self.set_status("Clipboard unavailable.", Duration::from_secs(2)),
        }
    }
}
