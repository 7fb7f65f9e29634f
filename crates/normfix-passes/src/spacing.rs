//! Pass normalizing horizontal spacing in code.
//!
//! Only code characters are inspected; literals, comments and preprocessor
//! lines are left alone.
//!
//! - `if`, `while`, `for`, `switch` and `return` get exactly one space before `(`
//! - other identifiers lose any whitespace before their `(`
//! - `== != <= >= < > = + - * / %` get one space on each side when both
//!   neighbours are word characters
//! - `,` and `;` get exactly one space before a following non-blank character

use normfix_core::utils::{FileText, LayoutTracker, MaskedLine};
use normfix_core::{Pass, PassContext, PassId, PassOutcome};
use tracing::debug;

/// Pass name for spacing normalization.
pub const NAME: &str = "spacing";

const CONTROL_KEYWORDS: [&str; 5] = ["if", "while", "for", "switch", "return"];

const DECLARATION_WORDS: [&str; 20] = [
    "int", "char", "void", "long", "short", "unsigned", "signed", "float", "double", "const",
    "static", "struct", "union", "enum", "typedef", "extern", "volatile", "register", "else",
    "case",
];

const TOKENS: [&str; 21] = [
    "<<=", ">>=", "==", "!=", "<=", ">=", "->", "++", "--", "+=", "-=", "*=", "/=", "%=", "&&",
    "||", "&=", "|=", "^=", "<<", ">>",
];

const SPACED: [&str; 12] = ["==", "!=", "<=", ">=", "<", ">", "=", "+", "-", "*", "/", "%"];

/// Normalizes spaces around keywords, calls, operators and separators.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacingPass;

impl SpacingPass {
    /// Creates the pass.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Pass for SpacingPass {
    fn id(&self) -> PassId {
        PassId::Spacing
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Normalizes spaces around keywords, calls, operators, commas and semicolons"
    }

    fn apply(&self, ctx: &PassContext, text: &str) -> PassOutcome {
        let mut buffer = FileText::split(text);
        let mut tracker = LayoutTracker::new();
        let mut changes = 0;

        for line in &mut buffer.lines {
            let masked = tracker.mask(line);
            let layout = tracker.classify_masked(&masked);
            if !layout.directive && !layout.blank {
                let (fixed, edits) = fix_line(&masked);
                if edits > 0 {
                    *line = fixed;
                    changes += edits;
                }
            }
            tracker.advance(line);
        }

        debug!(file = %ctx.filename, changes, "spacing pass done");
        PassOutcome {
            text: buffer.join(),
            changes,
        }
    }
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn skip_spaces(chars: &[char], mut index: usize) -> usize {
    while index < chars.len() && is_space(chars[index]) {
        index += 1;
    }
    index
}

fn word_at(masked: &MaskedLine, index: usize) -> bool {
    masked.is_code(index) && is_word(masked.chars[index])
}

/// Operator token starting at `index`, by longest match.
fn operator_at(masked: &MaskedLine, index: usize) -> Option<usize> {
    let chars = &masked.chars;
    if !"=!<>+-*/%&|^".contains(chars[index]) {
        return None;
    }
    for token in TOKENS {
        let len = token.len();
        if index + len <= chars.len()
            && (index..index + len).all(|i| masked.is_code(i))
            && chars[index..index + len].iter().copied().eq(token.chars())
        {
            return Some(len);
        }
    }
    Some(1)
}

/// Rewrites one code line, returning the new text and the number of edits.
fn fix_line(masked: &MaskedLine) -> (String, usize) {
    let chars = &masked.chars;
    let n = chars.len();
    let mut out: Vec<char> = Vec::with_capacity(n + 8);
    let mut edits = 0;

    let mut i = skip_spaces(chars, 0);
    out.extend_from_slice(&chars[..i]);

    while i < n {
        if !masked.is_code(i) {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let c = chars[i];

        if is_word(c) {
            let start = i;
            while i < n && word_at(masked, i) {
                i += 1;
            }
            out.extend_from_slice(&chars[start..i]);
            let word: String = chars[start..i].iter().collect();
            let next = skip_spaces(chars, i);
            if next < n && masked.code_char_is(next, '(') && !chars[start].is_ascii_digit() {
                let gap = &chars[i..next];
                if CONTROL_KEYWORDS.contains(&word.as_str()) {
                    if gap != [' '] {
                        edits += 1;
                    }
                    out.push(' ');
                    i = next;
                } else if !DECLARATION_WORDS.contains(&word.as_str()) {
                    if !gap.is_empty() {
                        edits += 1;
                    }
                    i = next;
                }
            }
            continue;
        }

        if c == ',' || c == ';' {
            out.push(c);
            let next = skip_spaces(chars, i + 1);
            let exempt = c == ';' && (masked.code_char_is(next, ';') || masked.code_char_is(next, ')'));
            if next < n && !exempt {
                if chars[i + 1..next] != [' '] {
                    edits += 1;
                }
                out.push(' ');
                i = next;
            } else {
                i += 1;
            }
            continue;
        }

        if let Some(len) = operator_at(masked, i) {
            let token: String = chars[i..i + len].iter().collect();
            let after = i + len;
            if SPACED.contains(&token.as_str()) {
                if let Some(edit) = respace_operator(masked, i, after) {
                    if edit {
                        edits += 1;
                    }
                    let left_gap = i - left_neighbour(chars, i).map_or(0, |p| p + 1);
                    out.truncate(out.len() - left_gap);
                    out.push(' ');
                    out.extend(token.chars());
                    out.push(' ');
                    i = skip_spaces(chars, after);
                    continue;
                }
            }
            out.extend(token.chars());
            i = after;
            continue;
        }

        out.push(c);
        i += 1;
    }

    (out.into_iter().collect(), edits)
}

fn left_neighbour(chars: &[char], index: usize) -> Option<usize> {
    (0..index).rev().find(|&p| !is_space(chars[p]))
}

/// Decides whether the operator at `start..end` gets one space on each side.
///
/// Returns `None` to leave it alone, otherwise whether the spacing changes.
fn respace_operator(masked: &MaskedLine, start: usize, end: usize) -> Option<bool> {
    let chars = &masked.chars;
    let left = left_neighbour(chars, start)?;
    let right = skip_spaces(chars, end);
    if !word_at(masked, left) || right >= chars.len() || !word_at(masked, right) {
        return None;
    }

    let left_gap = &chars[left + 1..start];
    let right_gap = &chars[end..right];
    let token = &chars[start..end];

    if matches!(token, ['+' | '-']) && left_gap.is_empty() && is_exponent(masked, left) {
        return None;
    }
    if matches!(token, ['+' | '-' | '*']) && left_gap.is_empty() != right_gap.is_empty() {
        return None;
    }
    Some(left_gap != [' '] || right_gap != [' '])
}

/// `index` is the `e` of a numeric literal such as `1e`.
fn is_exponent(masked: &MaskedLine, index: usize) -> bool {
    let chars = &masked.chars;
    if !matches!(chars[index], 'e' | 'E') {
        return false;
    }
    let mut start = index;
    while start > 0 && word_at(masked, start - 1) {
        start -= 1;
    }
    chars[start].is_ascii_digit()
}
