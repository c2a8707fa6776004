//! Regex-based syntax highlighting.
//!
//! A fixed, ordered list of rules is applied to one line at a time. Every
//! rule scans the whole line and paints its token kind over the characters
//! it matched; later rules overwrite earlier ones, so the comment rule (for
//! example) wins over the string rule on the same characters. The painted
//! line is then coalesced into non-overlapping spans for the renderer.
//!
//! Highlighting is strictly line-local: a triple-quoted string that spans
//! several lines only colors correctly on the line that opens it. No state
//! is carried across lines.

use crate::utils::byte_to_char;
use regex::Regex;
use std::collections::HashMap;

/// Token classes the rules can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Builtin,
    Number,
    Str,
    Comment,
    FuncName,
}

/// A run of characters sharing one token kind. Offsets are char indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledSpan {
    pub start: usize,
    pub len: usize,
    pub kind: TokenKind,
}

/// The word lists a rule set is built from.
///
/// Only the words vary per language; the shape of the rules (numbers,
/// strings, comments, `def` names) is fixed.
pub struct Language {
    pub keywords: &'static [&'static str],
    pub builtins: &'static [&'static str],
}

/// Python reserved words, including the soft `async`/`await`.
pub const PYTHON: Language = Language {
    keywords: &[
        "False", "None", "True", "and", "as", "assert", "async", "await",
        "break", "class", "continue", "def", "del", "elif", "else", "except",
        "finally", "for", "from", "global", "if", "import", "in", "is",
        "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
        "while", "with", "yield",
    ],
    builtins: &["print", "len", "range", "enumerate", "zip", "map", "filter"],
};

/// A compiled highlight rule.
struct Rule {
    regex: Regex,
    kind: TokenKind,
    /// Which capture group to paint (0 = whole match).
    group: usize,
}

/// The ordered rule list for one language.
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile the fixed rule order for `lang`:
    /// keyword, builtin, number, string, comment, function-definition name.
    pub fn for_language(lang: &Language) -> Self {
        let compile = |pattern: &str, kind, group| Rule {
            regex: Regex::new(pattern).expect("built-in highlight pattern"),
            kind,
            group,
        };

        let keyword = format!(r"\b({})\b", lang.keywords.join("|"));
        let builtin = format!(r"\b(__?[a-zA-Z_]+__?|{})\b", lang.builtins.join("|"));
        // Triple-quoted alternatives come first so `'''…'''` is one token and
        // an unterminated opener colors to end of line; the escaped-quote
        // alternatives handle `\"` and `\'` inside ordinary strings.
        let string = concat!(
            r#"("""[\s\S]*?"""|'''[\s\S]*?'''|"""[\s\S]*|'''[\s\S]*"#,
            r#"|"([^"\\]|\\.)*"|'([^'\\]|\\.)*')"#,
        );

        let rules = vec![
            compile(&keyword, TokenKind::Keyword, 0),
            compile(&builtin, TokenKind::Builtin, 0),
            compile(r"\b(0x[0-9a-fA-F]+|\d+(\.\d+)?)\b", TokenKind::Number, 0),
            compile(string, TokenKind::Str, 0),
            compile(r"#[^\n]*", TokenKind::Comment, 0),
            compile(r"\bdef\s+([a-zA-Z_][a-zA-Z0-9_]*)", TokenKind::FuncName, 1),
        ];
        Self { rules }
    }

    /// Compute the spans for one line of text.
    pub fn spans(&self, line: &str) -> Vec<StyledSpan> {
        if line.is_empty() {
            return Vec::new();
        }
        let char_len = line.chars().count();
        let mut paint: Vec<Option<TokenKind>> = vec![None; char_len];

        for rule in &self.rules {
            for caps in rule.regex.captures_iter(line) {
                let Some(m) = caps.get(rule.group) else { continue };
                if m.start() == m.end() {
                    continue;
                }
                let start = byte_to_char(line, m.start());
                let end = byte_to_char(line, m.end());
                for slot in &mut paint[start..end] {
                    *slot = Some(rule.kind);
                }
            }
        }

        let mut spans = Vec::new();
        let mut i = 0;
        while i < char_len {
            let Some(kind) = paint[i] else {
                i += 1;
                continue;
            };
            let start = i;
            while i < char_len && paint[i] == Some(kind) {
                i += 1;
            }
            spans.push(StyledSpan { start, len: i - start, kind });
        }
        spans
    }
}

/// Per-line span cache over a [`RuleSet`].
///
/// Cleared wholesale on theme swaps and undo/redo; edits invalidate the
/// changed line and its neighbors.
pub struct Highlighter {
    rules: RuleSet,
    cache: HashMap<usize, Vec<StyledSpan>>,
}

impl Highlighter {
    pub fn new(lang: &Language) -> Self {
        Self {
            rules: RuleSet::for_language(lang),
            cache: HashMap::new(),
        }
    }

    /// Spans for line `y`, computed on miss and cached.
    pub fn spans_for_line(&mut self, y: usize, text: &str) -> Vec<StyledSpan> {
        if let Some(spans) = self.cache.get(&y) {
            return spans.clone();
        }
        let spans = self.rules.spans(text);
        self.cache.insert(y, spans.clone());
        spans
    }

    /// Drop the cached spans for a line and its immediate neighbors.
    pub fn invalidate_line(&mut self, y: usize) {
        self.cache.remove(&y);
        if y > 0 {
            self.cache.remove(&(y - 1));
        }
        self.cache.remove(&(y + 1));
    }

    /// Drop every cached span. Required after a palette swap: all visible
    /// lines restyle from scratch before the next paint.
    pub fn invalidate_all(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans_of(line: &str) -> Vec<StyledSpan> {
        RuleSet::for_language(&PYTHON).spans(line)
    }

    fn kind_at(spans: &[StyledSpan], i: usize) -> Option<TokenKind> {
        spans
            .iter()
            .find(|s| i >= s.start && i < s.start + s.len)
            .map(|s| s.kind)
    }

    // ==================== individual rule tests ====================

    #[test]
    fn keywords_are_word_bounded() {
        let spans = spans_of("for x in items");
        assert_eq!(kind_at(&spans, 0), Some(TokenKind::Keyword)); // for
        assert_eq!(kind_at(&spans, 6), Some(TokenKind::Keyword)); // in
        assert_eq!(kind_at(&spans, 4), None); // x

        // "definition" contains "def" but is not a keyword
        assert!(spans_of("definition = 1").is_empty());
    }

    #[test]
    fn builtins_and_dunders() {
        let spans = spans_of("print(len(__init__))");
        assert_eq!(kind_at(&spans, 0), Some(TokenKind::Builtin)); // print
        assert_eq!(kind_at(&spans, 6), Some(TokenKind::Builtin)); // len
        assert_eq!(kind_at(&spans, 10), Some(TokenKind::Builtin)); // __init__
    }

    #[test]
    fn numbers_hex_and_decimal() {
        let spans = spans_of("a = 0xFF + 3.14 + 42");
        assert_eq!(kind_at(&spans, 4), Some(TokenKind::Number));
        assert_eq!(kind_at(&spans, 11), Some(TokenKind::Number));
        assert_eq!(kind_at(&spans, 18), Some(TokenKind::Number));
        // no number span inside an identifier
        assert!(spans_of("x1 = y").is_empty());
    }

    #[test]
    fn string_with_escaped_quote_is_one_span() {
        let spans = spans_of(r#"s = "a \" b""#);
        assert_eq!(
            spans,
            vec![StyledSpan { start: 4, len: 8, kind: TokenKind::Str }]
        );
    }

    #[test]
    fn triple_quoted_on_one_line() {
        let spans = spans_of("s = '''doc string'''");
        assert_eq!(
            spans,
            vec![StyledSpan { start: 4, len: 16, kind: TokenKind::Str }]
        );
    }

    #[test]
    fn unterminated_triple_quote_colors_to_eol() {
        let spans = spans_of(r#"s = """start of block"#);
        assert_eq!(
            spans,
            vec![StyledSpan { start: 4, len: 17, kind: TokenKind::Str }]
        );
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let spans = spans_of("x = 1  # note");
        assert_eq!(kind_at(&spans, 4), Some(TokenKind::Number));
        assert_eq!(kind_at(&spans, 7), Some(TokenKind::Comment));
        assert_eq!(kind_at(&spans, 12), Some(TokenKind::Comment));
    }

    // ==================== rule-order (painter) tests ====================

    #[test]
    fn later_comment_rule_overwrites_string() {
        // the '#' sits inside the string literal, but the comment rule runs
        // last of the two and wins from there to end of line
        let spans = spans_of(r##""a # b""##);
        assert_eq!(kind_at(&spans, 0), Some(TokenKind::Str));
        assert_eq!(kind_at(&spans, 3), Some(TokenKind::Comment));
        assert_eq!(kind_at(&spans, 6), Some(TokenKind::Comment));
    }

    #[test]
    fn def_name_gets_function_kind_not_def_itself() {
        let spans = spans_of("def add(a, b):");
        // "def" stays a keyword
        assert_eq!(kind_at(&spans, 0), Some(TokenKind::Keyword));
        assert_eq!(kind_at(&spans, 2), Some(TokenKind::Keyword));
        // only the name is painted as a function
        assert_eq!(kind_at(&spans, 4), Some(TokenKind::FuncName));
        assert_eq!(kind_at(&spans, 6), Some(TokenKind::FuncName));
        assert_eq!(kind_at(&spans, 7), None); // '('
    }

    #[test]
    fn spans_are_sorted_and_disjoint() {
        let spans = spans_of("def f(): return 0x1f  # tail");
        let mut last_end = 0;
        for s in &spans {
            assert!(s.start >= last_end);
            assert!(s.len > 0);
            last_end = s.start + s.len;
        }
    }

    #[test]
    fn empty_line_has_no_spans() {
        assert!(spans_of("").is_empty());
    }

    // ==================== cache tests ====================

    #[test]
    fn cache_returns_stale_spans_until_invalidated() {
        let mut hl = Highlighter::new(&PYTHON);
        let first = hl.spans_for_line(0, "def f():");
        assert!(!first.is_empty());

        // same line index, different text: cache wins until invalidated
        let stale = hl.spans_for_line(0, "plain");
        assert_eq!(stale, first);

        hl.invalidate_line(0);
        let fresh = hl.spans_for_line(0, "plain");
        assert!(fresh.is_empty());
    }

    #[test]
    fn invalidate_line_takes_neighbors() {
        let mut hl = Highlighter::new(&PYTHON);
        for y in 0..4 {
            hl.spans_for_line(y, "return 1");
        }
        hl.invalidate_line(2);
        assert!(hl.cache.contains_key(&0));
        assert!(!hl.cache.contains_key(&1));
        assert!(!hl.cache.contains_key(&2));
        assert!(!hl.cache.contains_key(&3));
    }

    #[test]
    fn invalidate_all_is_idempotent() {
        let mut hl = Highlighter::new(&PYTHON);
        let before = hl.spans_for_line(0, "while True:");
        hl.invalidate_all();
        hl.invalidate_all();
        let after = hl.spans_for_line(0, "while True:");
        assert_eq!(before, after);
    }
}
