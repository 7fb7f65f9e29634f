//! Pass moving braces to their expected lines.
//!
//! - a line starting with `{` that follows a control line (`if`, `while`,
//!   `for`, `switch`, `else if`) ending in `)` is joined onto it, across any
//!   blank lines in between
//! - a block-opening `{` followed by code on the same line gets a line break
//!   after it
//! - a `}` preceded by `;` on the same line moves to its own line
//!
//! New lines are indented from the layout tracker. Rounds repeat until a
//! round makes no edit.

use normfix_core::utils::{is_blank, mask_lines, tabs, CharClass, FileText, LayoutTracker, MaskedLine};
use normfix_core::{Pass, PassContext, PassId, PassOutcome};
use tracing::{debug, warn};

/// Pass name for brace placement.
pub const NAME: &str = "braces";

const MAX_ROUNDS: usize = 8;
const CONTROL_KEYWORDS: [&str; 4] = ["if", "while", "for", "switch"];

/// Joins and breaks lines around braces.
#[derive(Debug, Clone, Copy, Default)]
pub struct BracesPass;

impl BracesPass {
    /// Creates the pass.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Pass for BracesPass {
    fn id(&self) -> PassId {
        PassId::Braces
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Joins opening braces onto control lines and splits code sharing a line with a brace"
    }

    fn apply(&self, ctx: &PassContext, text: &str) -> PassOutcome {
        let mut buffer = FileText::split(text);
        let mut changes = 0;

        for round in 0..MAX_ROUNDS {
            let (joined, joins) = join_braces(&buffer.lines);
            let (lines, breaks) = break_braces(joined);
            buffer.lines = lines;
            if joins + breaks == 0 {
                break;
            }
            changes += joins + breaks;
            if round + 1 == MAX_ROUNDS {
                warn!(file = %ctx.filename, "brace placement did not settle");
            }
        }

        debug!(file = %ctx.filename, changes, "braces pass done");
        PassOutcome {
            text: buffer.join(),
            changes,
        }
    }
}

/// Joins `{` lines onto the preceding control line.
fn join_braces(lines: &[String]) -> (Vec<String>, usize) {
    let masks = mask_lines(lines);
    // Each output line remembers whether it may still receive a brace.
    let mut out: Vec<(String, bool)> = Vec::with_capacity(lines.len());
    let mut joins = 0;

    for (line, masked) in lines.iter().zip(&masks) {
        let opens = !masked.starts_in_comment
            && masked
                .first_non_blank()
                .is_some_and(|i| masked.code_char_is(i, '{'));
        if opens {
            if let Some(target) = out.iter().rposition(|(l, _)| !is_blank(l)) {
                if out[target].1 {
                    out.truncate(target + 1);
                    let (head, _) = &out[target];
                    let merged = format!("{} {}", head.trim_end(), line.trim_start());
                    out[target] = (merged, false);
                    joins += 1;
                    continue;
                }
            }
        }
        out.push((line.clone(), is_control_line(masked)));
    }

    (out.into_iter().map(|(line, _)| line).collect(), joins)
}

/// A line like `if (x)` or `} else if (y)`: control keyword, balanced
/// parentheses, ends in `)` and holds no `{`.
fn is_control_line(masked: &MaskedLine) -> bool {
    if masked.starts_in_comment {
        return false;
    }
    let chars = &masked.chars;
    let Some(mut i) = masked.first_non_blank() else {
        return false;
    };
    if masked.code_char_is(i, '}') {
        i = skip_blank(chars, i + 1);
    }
    let (word, after) = word_from(masked, i);
    let keyword_ok = if word == "else" {
        let (next, _) = word_from(masked, skip_blank(chars, after));
        next == "if"
    } else {
        CONTROL_KEYWORDS.contains(&word.as_str())
    };
    if !keyword_ok {
        return false;
    }

    let Some(last) = (0..chars.len()).rev().find(|&p| chars[p] != ' ' && chars[p] != '\t') else {
        return false;
    };
    if !masked.code_char_is(last, ')') {
        return false;
    }

    let mut balance: i64 = 0;
    for p in 0..chars.len() {
        if !masked.is_code(p) {
            continue;
        }
        match chars[p] {
            '{' => return false,
            '(' => balance += 1,
            ')' => {
                balance -= 1;
                if balance < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    balance == 0
}

fn skip_blank(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && (chars[i] == ' ' || chars[i] == '\t') {
        i += 1;
    }
    i
}

fn word_from(masked: &MaskedLine, start: usize) -> (String, usize) {
    let mut end = start;
    while end < masked.len()
        && masked.is_code(end)
        && (masked.chars[end].is_ascii_alphanumeric() || masked.chars[end] == '_')
    {
        end += 1;
    }
    (masked.slice(start, end), end)
}

enum Break {
    AfterOpen(usize),
    BeforeClose(usize),
}

/// Splits lines at braces sharing a line with code.
fn break_braces(lines: Vec<String>) -> (Vec<String>, usize) {
    let mut tracker = LayoutTracker::new();
    let mut out = Vec::with_capacity(lines.len());
    let mut breaks = 0;

    for line in lines {
        let mut piece = line;
        loop {
            let masked = tracker.mask(&piece);
            let layout = tracker.classify_masked(&masked);
            if layout.blank || layout.directive || layout.in_comment {
                break;
            }
            let (head, tail) = match find_break(&masked, &tracker) {
                Some(Break::AfterOpen(at)) => (
                    masked.slice(0, at + 1),
                    masked.slice(at + 1, masked.len()),
                ),
                Some(Break::BeforeClose(at)) => {
                    (masked.slice(0, at), masked.slice(at, masked.len()))
                }
                None => break,
            };
            let head = head.trim_end().to_string();
            let tail = tail.trim().to_string();
            tracker.advance(&head);
            out.push(head);
            let indent = tracker.classify(&tail).indent_tabs();
            piece = format!("{}{tail}", tabs(indent));
            breaks += 1;
        }
        tracker.advance(&piece);
        out.push(piece);
    }

    (out, breaks)
}

fn significant(masked: &MaskedLine, i: usize) -> bool {
    masked.classes[i] != CharClass::Comment && masked.chars[i] != ' ' && masked.chars[i] != '\t'
}

/// Earliest brace on the line that needs a break.
fn find_break(masked: &MaskedLine, tracker: &LayoutTracker) -> Option<Break> {
    let n = masked.len();
    let mut prev: Option<usize> = None;

    for i in 0..n {
        if masked.code_char_is(i, '{') {
            let followed = (i + 1..n).any(|k| significant(masked, k));
            if followed && opens_block(masked, prev, tracker) {
                return Some(Break::AfterOpen(i));
            }
        } else if masked.code_char_is(i, '}') && prev.is_some_and(|p| masked.code_char_is(p, ';')) {
            return Some(Break::BeforeClose(i));
        }
        if significant(masked, i) {
            prev = Some(i);
        }
    }
    None
}

/// Whether a `{` opens a block rather than an initializer.
fn opens_block(masked: &MaskedLine, prev: Option<usize>, tracker: &LayoutTracker) -> bool {
    let before = match prev {
        Some(p) => Some(masked.chars[p]),
        None => tracker.prev_end(),
    };
    match before {
        None => true,
        Some(c) => matches!(c, ')' | ';' | '}') || c.is_ascii_alphanumeric() || c == '_',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> PassOutcome {
        BracesPass::new().apply(&PassContext::new("test.c"), text)
    }

    // --- joins ---

    #[test]
    fn test_joins_brace_onto_control_line() {
        let outcome = run("\tif (x)\n\t{\n\t\ty();\n\t}\n");
        assert_eq!(outcome.text, "\tif (x) {\n\t\ty();\n\t}\n");
        assert_eq!(outcome.changes, 1);
    }

    #[test]
    fn test_joins_across_blank_lines() {
        let outcome = run("while (i < n)\n\n{\n}\n");
        assert_eq!(outcome.text, "while (i < n) {\n}\n");
    }

    #[test]
    fn test_else_if_and_closing_prefix() {
        let outcome = run("{\n\t} else if (b)\n\t{\n\t}\n}\n");
        assert_eq!(outcome.text, "{\n\t} else if (b) {\n\t}\n}\n");
    }

    #[test]
    fn test_function_definition_not_joined() {
        let text = "int main(void)\n{\n\treturn (0);\n}\n";
        let outcome = run(text);
        assert_eq!(outcome.changes, 0);
        assert_eq!(outcome.text, text);
    }

    #[test]
    fn test_unbalanced_control_line_not_joined() {
        let text = "if (a\n\t&& b)\n{\n}\n";
        assert_eq!(run(text).changes, 0);
    }

    // --- breaks ---

    #[test]
    fn test_breaks_code_after_open_brace() {
        let outcome = run("int f(void)\n{ return (1); }\n");
        assert_eq!(outcome.text, "int f(void)\n{\n\treturn (1);\n}\n");
        assert_eq!(outcome.changes, 2);
    }

    #[test]
    fn test_join_then_break() {
        let outcome = run("{\n\tif (x)\n\t{ a = 1; b = 2; }\n}\n");
        assert_eq!(outcome.text, "{\n\tif (x) {\n\t\ta = 1; b = 2;\n\t}\n}\n");
        assert_eq!(outcome.changes, 3);
    }

    #[test]
    fn test_comment_after_brace_kept() {
        let text = "if (x) { /* note */\n}\n";
        assert_eq!(run(text).changes, 0);
    }

    #[test]
    fn test_initializer_braces_untouched() {
        let text = "int a[2] = { 1, 2 };\nint b[2][2] = {\n\t{ 1, 2 },\n\t{ 3, 4 }\n};\n";
        assert_eq!(run(text).changes, 0);
    }

    #[test]
    fn test_closing_after_else_if_gets_joined_next_round() {
        let outcome = run("{\n\tif (a) {\n\t\ta; } else if (b)\n\t{\n\t\tc;\n\t}\n}\n");
        assert_eq!(
            outcome.text,
            "{\n\tif (a) {\n\t\ta;\n\t} else if (b) {\n\t\tc;\n\t}\n}\n"
        );
        assert_eq!(outcome.changes, 2);
        assert_eq!(run(&outcome.text).changes, 0);
    }

    #[test]
    fn test_braces_in_strings_ignored() {
        assert_eq!(run("s = \"{ x; }\";\n").changes, 0);
    }
}
