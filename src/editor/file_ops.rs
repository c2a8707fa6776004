//! Opening and saving files.

use super::Editor;
use crate::buffer::Buffer;
use crate::types::{Pos, Prompt, PromptKind};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

impl Editor {
    /// Ctrl+S: write to the known path, or ask for one.
    pub(crate) fn cmd_save(&mut self) -> Result<()> {
        match self.file_path.clone() {
            Some(p) => self.save_to_path(p),
            None => {
                self.prompt = Some(Prompt::new(PromptKind::SaveAs, ""));
                self.mark_redraw();
                Ok(())
            }
        }
    }

    /// Write the buffer to `path` and adopt it as the file path.
    pub(crate) fn save_to_path(&mut self, path: PathBuf) -> Result<()> {
        fs::write(&path, self.buf.contents())
            .with_context(|| format!("Failed writing {}", path.display()))?;
        self.file_path = Some(path.clone());
        self.buf.modified = false;
        self.set_status(format!("Saved: {}", path.display()), Duration::from_secs(2));
        Ok(())
    }

    /// Load `path` into the buffer, resetting cursor, selection, scrolling,
    /// undo history, and cached highlighting.
    pub(crate) fn open_path(&mut self, path: PathBuf) -> Result<()> {
        let s = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.buf = Buffer::from_string(&s);
        self.cursor = Pos { y: 0, x: 0 };
        self.anchor = None;
        self.scroll_y = 0;
        self.scroll_x = 0;
        self.file_path = Some(path.clone());
        self.undo.clear();
        self.redo.clear();
        self.calltip = None;
        self.highlighter.invalidate_all();
        self.ensure_visible();
        self.set_status(format!("Opened: {}", path.display()), Duration::from_secs(2));
        Ok(())
    }
}
