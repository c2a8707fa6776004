//! Indentation rules: what a newline inserts, and how a line unindents.
//!
//! These are pure string functions so the keystroke layer can stay a thin
//! dispatcher and the rules can be tested without a buffer or a terminal.

/// The indent unit: four spaces.
pub const INDENT: &str = "    ";

/// Text to insert in place of a newline keystroke.
///
/// `prefix` is the current line's text from the start of the line up to the
/// cursor. The result is a line break, the prefix's leading spaces, and one
/// extra `indent_unit` when the prefix (ignoring trailing whitespace) ends
/// with `:`, i.e. the line opens a block. Only literal space characters
/// count toward the measured indent; tabs get no special treatment.
pub fn newline_insertion(prefix: &str, indent_unit: &str) -> String {
    let leading = prefix.chars().take_while(|&c| c == ' ').count();
    let mut out = String::with_capacity(1 + leading + indent_unit.len());
    out.push('\n');
    for _ in 0..leading {
        out.push(' ');
    }
    if prefix.trim_end().ends_with(':') {
        out.push_str(indent_unit);
    }
    out
}

/// Remove exactly one leading `indent_unit` from `line`, if present.
///
/// Lines that do not start with the full unit come back unchanged: no
/// partial dedent, no tab awareness.
pub fn unindent_line(line: &str, indent_unit: &str) -> String {
    line.strip_prefix(indent_unit).unwrap_or(line).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_line_keeps_indent() {
        assert_eq!(newline_insertion("    x = 1", INDENT), "\n    ");
        assert_eq!(newline_insertion("x = 1", INDENT), "\n");
    }

    #[test]
    fn colon_adds_one_unit() {
        assert_eq!(newline_insertion("    if True:", INDENT), "\n        ");
        assert_eq!(newline_insertion("def f():", INDENT), "\n    ");
    }

    #[test]
    fn colon_detected_through_trailing_whitespace() {
        assert_eq!(newline_insertion("if x:   ", INDENT), "\n    ");
        assert_eq!(newline_insertion("if x:\t", INDENT), "\n    ");
    }

    #[test]
    fn empty_prefix_is_bare_newline() {
        assert_eq!(newline_insertion("", INDENT), "\n");
    }

    #[test]
    fn tabs_do_not_count_as_indent() {
        assert_eq!(newline_insertion("\tx", INDENT), "\n");
        // leading spaces before a tab still count
        assert_eq!(newline_insertion("  \tx", INDENT), "\n  ");
    }

    #[test]
    fn all_whitespace_prefix_is_measured() {
        assert_eq!(newline_insertion("      ", INDENT), "\n      ");
    }

    #[test]
    fn unindent_removes_one_unit() {
        assert_eq!(unindent_line("    x = 1", INDENT), "x = 1");
        assert_eq!(unindent_line("        x", INDENT), "    x");
    }

    #[test]
    fn unindent_leaves_short_indent_alone() {
        assert_eq!(unindent_line("x = 1", INDENT), "x = 1");
        assert_eq!(unindent_line("  x", INDENT), "  x");
        assert_eq!(unindent_line("", INDENT), "");
    }
}
