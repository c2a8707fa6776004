//! Undo/redo over transaction entries.
//!
//! Undoing an entry applies the inverse of each of its operations in
//! reverse order, then pushes the mirrored entry onto the other stack.
//! Because both directions work the same way, redo is undo of an inverse.

use super::Editor;
use crate::buffer::Buffer;
use crate::types::{EditOperation, UndoEntry};

impl Editor {
    /// Invert every operation of `entry` against the buffer, returning the
    /// mirrored operation list (in the order it was applied).
    fn apply_inverse(&mut self, entry: &UndoEntry) -> Vec<EditOperation> {
        let mut inverse = Vec::with_capacity(entry.ops.len());
        for op in entry.ops.iter().rev() {
            match op {
                EditOperation::Insert { pos, text } => {
                    let end = Buffer::end_pos_after_insert(*pos, text);
                    self.buf.remove_range(*pos, end);
                    inverse.push(EditOperation::Delete { start: *pos, deleted_text: text.clone() });
                }
                EditOperation::Delete { start, deleted_text } => {
                    self.buf.insert_text(*start, deleted_text);
                    inverse.push(EditOperation::Insert { pos: *start, text: deleted_text.clone() });
                }
            }
        }
        inverse
    }

    /// Undo the most recent action (if any).
    pub(crate) fn undo(&mut self) {
        if let Some(entry) = self.undo.pop() {
            let inverse = self.apply_inverse(&entry);
            self.redo.push(UndoEntry {
                ops: inverse,
                cursor_before: self.cursor,
                anchor_before: self.anchor,
            });
            self.cursor = self.buf.clamp(entry.cursor_before);
            self.anchor = entry.anchor_before;
            self.highlighter.invalidate_all();
            self.mark_redraw();
            self.ensure_visible();
        }
    }

    /// Redo the most recently undone action (if any).
    pub(crate) fn redo(&mut self) {
        if let Some(entry) = self.redo.pop() {
            let inverse = self.apply_inverse(&entry);
            self.undo.push(UndoEntry {
                ops: inverse,
                cursor_before: self.cursor,
                anchor_before: self.anchor,
            });
            self.cursor = self.buf.clamp(entry.cursor_before);
            self.anchor = entry.anchor_before;
            self.highlighter.invalidate_all();
            self.mark_redraw();
            self.ensure_visible();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::editor_with;
    use crate::types::Pos;

    #[test]
    fn undo_restores_single_insert() {
        let mut ed = editor_with("abc");
        ed.cursor = Pos { y: 0, x: 3 };
        ed.insert_over_selection("def");
        assert_eq!(ed.buf.line(0), "abcdef");
        ed.undo();
        assert_eq!(ed.buf.line(0), "abc");
        assert_eq!(ed.cursor, Pos { y: 0, x: 3 });
    }

    #[test]
    fn redo_reapplies_in_original_order() {
        let mut ed = editor_with("abc");
        ed.anchor = Some(Pos { y: 0, x: 0 });
        ed.cursor = Pos { y: 0, x: 2 };
        ed.insert_over_selection("XY"); // delete "ab" + insert "XY", one entry
        assert_eq!(ed.buf.line(0), "XYc");

        ed.undo();
        assert_eq!(ed.buf.line(0), "abc");
        ed.redo();
        assert_eq!(ed.buf.line(0), "XYc");
    }

    #[test]
    fn multi_op_transaction_undoes_in_one_step() {
        let mut ed = editor_with("one two");
        let mut tx = ed.begin_tx();
        ed.tx_delete(&mut tx, Pos { y: 0, x: 0 }, Pos { y: 0, x: 3 });
        ed.tx_insert(&mut tx, Pos { y: 0, x: 0 }, "ONE");
        ed.tx_delete(&mut tx, Pos { y: 0, x: 4 }, Pos { y: 0, x: 7 });
        ed.tx_insert(&mut tx, Pos { y: 0, x: 4 }, "TWO");
        ed.commit_tx(tx);
        assert_eq!(ed.buf.line(0), "ONE TWO");

        ed.undo();
        assert_eq!(ed.buf.line(0), "one two");
        assert!(ed.undo.is_empty());
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut ed = editor_with("x");
        ed.cursor = Pos { y: 0, x: 1 };
        ed.insert_over_selection("a");
        ed.undo();
        assert_eq!(ed.redo.len(), 1);
        ed.insert_over_selection("b");
        assert!(ed.redo.is_empty());
    }
}
