//! Pass splitting lines longer than 80 characters.
//!
//! Split points are tried in order:
//!
//! 1. the top-level commas of the first call whose argument list closes on
//!    the line and holds at least two arguments
//! 2. the last space-delimited binary operator ending by column 70
//! 3. the last comma before column 70
//! 4. the gap between two adjacent string literals before column 70
//!
//! Points 2 to 4 must also lie at least 10 characters past the indentation.
//! Whitespace at a split point is dropped. Produced lines that are still too
//! long are split again.

use std::collections::VecDeque;

use normfix_core::utils::{char_len, leading_whitespace, tabs, FileText, LayoutTracker, MaskedLine};
use normfix_core::{Pass, PassContext, PassId, PassOutcome};
use tracing::debug;

/// Pass name for long-line splitting.
pub const NAME: &str = "long-lines";

/// Maximum line length in characters.
pub const MAX_LINE: usize = 80;

const SPLIT_COLUMN: usize = 70;
const MIN_OFFSET: usize = 10;

const CALL_KEYWORDS: [&str; 6] = ["if", "while", "for", "switch", "return", "sizeof"];

const OPERATORS: [&str; 13] = [
    "&&", "||", "==", "!=", "<=", ">=", "+", "-", "*", "/", "=", "<", ">",
];

/// Breaks long lines at calls, operators, commas and literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongLinesPass;

impl LongLinesPass {
    /// Creates the pass.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Pass for LongLinesPass {
    fn id(&self) -> PassId {
        PassId::LongLines
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Splits lines over 80 characters at argument lists, operators, commas or literals"
    }

    fn apply(&self, ctx: &PassContext, text: &str) -> PassOutcome {
        let buffer = FileText::split(text);
        let mut tracker = LayoutTracker::new();
        let mut out = Vec::with_capacity(buffer.lines.len());
        let mut changes = 0;

        for (index, line) in buffer.lines.into_iter().enumerate() {
            let mut work = VecDeque::from([line]);
            while let Some(piece) = work.pop_front() {
                if char_len(&piece) > MAX_LINE {
                    if let Some(parts) = try_split(&piece, &tracker) {
                        changes += 1;
                        for part in parts.into_iter().rev() {
                            work.push_front(part);
                        }
                        continue;
                    }
                    debug!(file = %ctx.filename, line = index + 1, "no split point");
                }
                tracker.advance(&piece);
                out.push(piece);
            }
        }

        debug!(file = %ctx.filename, changes, "long-lines pass done");
        PassOutcome {
            text: FileText::from_lines(out, buffer.trailing_newline).join(),
            changes,
        }
    }
}

/// Splits `piece` into shorter lines, or `None` when no strategy applies.
///
/// `tracker` must be positioned just before `piece`.
fn try_split(piece: &str, tracker: &LayoutTracker) -> Option<Vec<String>> {
    let masked = tracker.mask(piece);
    let layout = tracker.classify_masked(&masked);
    if layout.blank || layout.directive || layout.in_comment {
        return None;
    }
    let indent = leading_whitespace(piece);
    let indent_len = char_len(indent);

    let strategies: [fn(&MaskedLine, usize) -> Option<Vec<String>>; 4] =
        [split_call, split_operator, split_comma, split_literals];
    strategies.iter().find_map(|strategy| {
        let segments = strategy(&masked, indent_len)?;
        assemble(piece, indent, segments, tracker)
    })
}

/// Indents the segments and checks that every produced line is acceptable.
fn assemble(
    piece: &str,
    indent: &str,
    segments: Vec<String>,
    tracker: &LayoutTracker,
) -> Option<Vec<String>> {
    if segments.len() < 2 {
        return None;
    }
    let limit = char_len(piece);
    let base_tabs = indent.chars().filter(|c| *c == '\t').count();
    let mut after = tracker.clone();
    let mut parts = Vec::with_capacity(segments.len());

    for (i, segment) in segments.into_iter().enumerate() {
        if !acceptable_start(&segment) {
            return None;
        }
        let part = if i == 0 {
            format!("{indent}{segment}")
        } else {
            let layout = after.classify(&segment);
            let width = if layout.continuation {
                (layout.depth + 1).max(base_tabs + 1)
            } else {
                layout.depth
            };
            format!("{}{segment}", tabs(width))
        };
        if char_len(&part) >= limit {
            return None;
        }
        after.advance(&part);
        parts.push(part);
    }
    Some(parts)
}

fn acceptable_start(segment: &str) -> bool {
    !segment.trim().is_empty()
        && !segment.starts_with(['{', '}', '#'])
        && !segment.starts_with("/*")
        && !segment.starts_with("//")
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits after each top-level comma of the first qualifying call.
fn split_call(masked: &MaskedLine, indent_len: usize) -> Option<Vec<String>> {
    let chars = &masked.chars;
    (1..masked.len())
        .filter(|&open| masked.code_char_is(open, '(') && masked.is_code(open - 1))
        .find_map(|open| {
            let mut start = open;
            while start > 0 && masked.is_code(start - 1) && is_word(chars[start - 1]) {
                start -= 1;
            }
            if start == open || chars[start].is_ascii_digit() {
                return None;
            }
            let name = masked.slice(start, open);
            if CALL_KEYWORDS.contains(&name.as_str()) {
                return None;
            }
            let (close, commas) = argument_commas(masked, open)?;
            if commas.is_empty() {
                return None;
            }

            let mut bounds = vec![open];
            bounds.extend(&commas);
            bounds.push(close);
            let mut segments = Vec::with_capacity(bounds.len() - 1);
            for (k, pair) in bounds.windows(2).enumerate() {
                let arg = masked.slice(pair[0] + 1, pair[1]);
                let arg = arg.trim();
                let segment = if k == 0 {
                    format!("{}{arg},", masked.slice(indent_len, open + 1))
                } else if k + 2 == bounds.len() {
                    format!("{arg}{}", masked.slice(close, masked.len()))
                } else {
                    format!("{arg},")
                };
                segments.push(segment);
            }
            Some(segments)
        })
}

/// The matching `)` of the `(` at `open` and the commas directly inside it.
fn argument_commas(masked: &MaskedLine, open: usize) -> Option<(usize, Vec<usize>)> {
    let mut depth = 0usize;
    let mut commas = Vec::new();
    for i in open..masked.len() {
        if !masked.is_code(i) {
            continue;
        }
        match masked.chars[i] {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return (masked.chars[i] == ')').then_some((i, commas));
                }
            }
            ',' if depth == 1 => commas.push(i),
            _ => {}
        }
    }
    None
}

/// Splits after a code position `end` (exclusive), dropping the whitespace.
fn split_at(masked: &MaskedLine, indent_len: usize, end: usize) -> Vec<String> {
    vec![
        masked.slice(indent_len, end).trim_end().to_string(),
        masked.slice(end, masked.len()).trim_start().to_string(),
    ]
}

fn in_window(indent_len: usize, start: usize, end: usize) -> bool {
    end <= SPLIT_COLUMN && start >= indent_len + MIN_OFFSET
}

/// Splits after the last space-delimited operator in the window.
fn split_operator(masked: &MaskedLine, indent_len: usize) -> Option<Vec<String>> {
    let chars = &masked.chars;
    let n = masked.len();
    let mut best = None;
    for start in 1..n {
        if chars[start - 1] != ' ' || !masked.is_code(start) {
            continue;
        }
        let found = OPERATORS.iter().find(|op| {
            let end = start + op.len();
            end < n
                && chars[end] == ' '
                && (start..end).all(|i| masked.is_code(i))
                && chars[start..end].iter().copied().eq(op.chars())
        });
        if let Some(op) = found {
            let end = start + op.len();
            if in_window(indent_len, start, end) {
                best = Some(end);
            }
        }
    }
    best.map(|end| split_at(masked, indent_len, end))
}

/// Splits after the last code comma in the window.
fn split_comma(masked: &MaskedLine, indent_len: usize) -> Option<Vec<String>> {
    (0..masked.len())
        .rev()
        .find(|&i| masked.code_char_is(i, ',') && in_window(indent_len, i, i + 1))
        .map(|i| split_at(masked, indent_len, i + 1))
}

/// Splits between the last pair of whitespace-separated string literals in
/// the window.
fn split_literals(masked: &MaskedLine, indent_len: usize) -> Option<Vec<String>> {
    let chars = &masked.chars;
    let n = masked.len();
    (0..n)
        .rev()
        .filter(|&q| {
            chars[q] == '"' && !masked.is_code(q) && q + 1 < n && masked.is_code(q + 1)
        })
        .find(|&q| {
            let next = (q + 1..n).find(|&i| chars[i] != ' ' && chars[i] != '\t');
            let separated = next.is_some_and(|r| r > q + 1 && chars[r] == '"' && !masked.is_code(r));
            separated && in_window(indent_len, q, q + 1)
        })
        .map(|q| split_at(masked, indent_len, q + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> PassOutcome {
        LongLinesPass::new().apply(&PassContext::new("test.c"), text)
    }

    fn squeeze(text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    fn assert_fits(text: &str) {
        for line in text.lines() {
            assert!(char_len(line) <= MAX_LINE, "too long: {line:?}");
        }
    }

    // --- strategies ---

    #[test]
    fn test_splits_call_arguments() {
        let text = "{\n\tvalue = compute_something(alpha_parameter, beta_parameter, gamma_parameter, delta);\n}\n";
        let outcome = run(text);
        assert_eq!(
            outcome.text,
            "{\n\tvalue = compute_something(alpha_parameter,\n\t\tbeta_parameter,\n\t\tgamma_parameter,\n\t\tdelta);\n}\n"
        );
        assert_eq!(outcome.changes, 1);
        assert_eq!(run(&outcome.text).changes, 0);
    }

    #[test]
    fn test_keyword_parens_are_not_calls() {
        let text = "{\n\tif (first_condition_value && second_condition_value && third_condition_value_that_is_long)\n\t\treturn (1);\n}\n";
        let outcome = run(text);
        assert_eq!(
            outcome.text,
            "{\n\tif (first_condition_value && second_condition_value &&\n\t\tthird_condition_value_that_is_long)\n\t\treturn (1);\n}\n"
        );
        assert_eq!(outcome.changes, 1);
    }

    #[test]
    fn test_splits_at_comma_without_call() {
        let text = "int\taaaaaaaaaaaaaaaaaaaa, bbbbbbbbbbbbbbbbbbbb, cccccccccccccccccccc, dddddddddddddddd;\n";
        let outcome = run(text);
        assert_eq!(outcome.changes, 1);
        assert_fits(&outcome.text);
        assert_eq!(squeeze(&outcome.text), squeeze(text));
    }

    #[test]
    fn test_splits_between_literals() {
        let text = "{\n\tft_putstr(\"the first half of a rather long message \" \"and then its second half, which is long\");\n}\n";
        let outcome = run(text);
        assert_eq!(
            outcome.text,
            "{\n\tft_putstr(\"the first half of a rather long message \"\n\t\t\"and then its second half, which is long\");\n}\n"
        );
    }

    // --- guards ---

    #[test]
    fn test_short_lines_and_directives_untouched() {
        let directive = format!("#define LONG_MACRO(a, b) {}\n", "x + ".repeat(25));
        assert_eq!(run(&directive).changes, 0);
        assert_eq!(run("int main(void);\n").changes, 0);
    }

    #[test]
    fn test_unsplittable_line_left_alone() {
        let text = format!("\t{};\n", "x".repeat(90));
        let outcome = run(&text);
        assert_eq!(outcome.changes, 0);
        assert_eq!(outcome.text, text);
    }

    #[test]
    fn test_split_preserves_content_without_spaces() {
        let text = format!("\tresult = fn_name({});\n", vec!["argument_value"; 8].join(","));
        let outcome = run(&text);
        assert!(outcome.changes >= 1);
        assert_fits(&outcome.text);
        assert_eq!(squeeze(&outcome.text), squeeze(&text));
        assert_eq!(run(&outcome.text).changes, 0);
    }

    #[test]
    fn test_resplits_long_pieces() {
        let text = "\tresult = first_function(second_function(long_argument_number_one + long_argument_number_two), other);\n";
        let outcome = run(text);
        assert_eq!(
            outcome.text,
            "\tresult = first_function(second_function(long_argument_number_one +\n\t\tlong_argument_number_two),\n\t\tother);\n"
        );
        assert_eq!(outcome.changes, 2);
        assert_eq!(squeeze(&outcome.text), squeeze(text));
    }
}
