//! Brace depth and statement continuation tracking.

use super::lexer::{CharClass, LexState, MaskedLine};

/// How a line sits in the surrounding structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLayout {
    /// Brace depth after the line's leading closing braces.
    pub depth: usize,
    /// The line continues the previous statement or an open `(` / `[`.
    pub continuation: bool,
    /// The line is a preprocessor directive or continues one.
    pub directive: bool,
    /// The line begins inside a block comment.
    pub in_comment: bool,
    /// The line holds only spaces and tabs.
    pub blank: bool,
}

impl LineLayout {
    /// Required indentation width in tabs.
    #[must_use]
    pub fn indent_tabs(&self) -> usize {
        if self.continuation {
            self.depth + 1
        } else {
            self.depth
        }
    }
}

/// Walks a file line by line, tracking open brackets, the end of the last
/// code-bearing line and the lexer state.
///
/// Call [`LayoutTracker::classify`] for a line before passing it to
/// [`LayoutTracker::advance`].
#[derive(Debug, Clone, Default)]
pub struct LayoutTracker {
    stack: Vec<char>,
    prev_end: Option<char>,
    lex: LexState,
    in_directive: bool,
}

impl LayoutTracker {
    /// A tracker at the top of a file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open `{`.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.iter().filter(|c| **c == '{').count()
    }

    /// Last significant character of the previous code-bearing line.
    #[must_use]
    pub fn prev_end(&self) -> Option<char> {
        self.prev_end
    }

    /// Lexer state at the start of the next line.
    #[must_use]
    pub fn lex_state(&self) -> LexState {
        self.lex
    }

    /// Masks `line` with the current lexer state without advancing.
    #[must_use]
    pub fn mask(&self, line: &str) -> MaskedLine {
        let mut lex = self.lex;
        MaskedLine::new(line, &mut lex)
    }

    /// Classifies the next line without advancing.
    #[must_use]
    pub fn classify(&self, line: &str) -> LineLayout {
        self.classify_masked(&self.mask(line))
    }

    /// Classifies an already masked next line without advancing.
    #[must_use]
    pub fn classify_masked(&self, masked: &MaskedLine) -> LineLayout {
        let depth = self.depth();
        let mut layout = LineLayout {
            depth,
            continuation: false,
            directive: self.in_directive || masked.is_directive(),
            in_comment: masked.starts_in_comment,
            blank: masked.first_non_blank().is_none(),
        };
        if layout.blank || layout.directive || layout.in_comment {
            return layout;
        }

        let Some(first) = masked.first_non_blank() else {
            return layout;
        };
        let mut closes = 0;
        for i in first..masked.len() {
            match masked.chars[i] {
                '}' if masked.is_code(i) => closes += 1,
                ' ' | '\t' => {}
                _ => break,
            }
        }
        layout.depth = depth.saturating_sub(closes);

        // A line opening with a literal may still continue a statement.
        if masked.classes[first] == CharClass::Comment
            || (masked.is_code(first) && matches!(masked.chars[first], '{' | '}' | '#'))
        {
            return layout;
        }
        layout.continuation = match self.stack.last() {
            Some('(' | '[') => true,
            top => match self.prev_end {
                None | Some(';' | '{' | '}' | ':') => false,
                Some(',') => top != Some(&'{'),
                Some(_) => true,
            },
        };
        layout
    }

    /// Moves past `line`.
    pub fn advance(&mut self, line: &str) {
        let masked = MaskedLine::new(line, &mut self.lex);

        if self.in_directive || masked.is_directive() {
            self.in_directive = masked.chars.last() == Some(&'\\');
            self.prev_end = None;
            return;
        }

        for (i, c) in masked.chars.iter().enumerate() {
            if !masked.is_code(i) {
                continue;
            }
            match c {
                '{' | '(' | '[' => self.stack.push(*c),
                '}' => {
                    if self.stack.contains(&'{') {
                        while let Some(open) = self.stack.pop() {
                            if open == '{' {
                                break;
                            }
                        }
                    }
                }
                ')' => {
                    if self.stack.last() == Some(&'(') {
                        self.stack.pop();
                    }
                }
                ']' => {
                    if self.stack.last() == Some(&'[') {
                        self.stack.pop();
                    }
                }
                _ => {}
            }
        }

        if let Some(end) = masked.last_significant() {
            self.prev_end = Some(end);
        }
    }
}

/// A string of `count` tabs.
#[must_use]
pub fn tabs(count: usize) -> String {
    "\t".repeat(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(lines: &[&str]) -> Vec<LineLayout> {
        let mut tracker = LayoutTracker::new();
        lines
            .iter()
            .map(|line| {
                let layout = tracker.classify(line);
                tracker.advance(line);
                layout
            })
            .collect()
    }

    #[test]
    fn depth_follows_braces() {
        let layouts = walk(&["int f(void)", "{", "if (x)", "{", "y();", "}", "}"]);
        let depths: Vec<_> = layouts.iter().map(|l| l.depth).collect();
        assert_eq!(depths, vec![0, 0, 1, 1, 2, 1, 0]);
    }

    #[test]
    fn brace_less_body_is_continuation() {
        let layouts = walk(&["{", "if (x)", "return ;", "y = 1;"]);
        assert!(layouts[2].continuation);
        assert!(!layouts[3].continuation);
        assert_eq!(layouts[2].indent_tabs(), 2);
    }

    #[test]
    fn open_paren_makes_continuation() {
        let layouts = walk(&["f(a,", "b);", "c;"]);
        assert!(layouts[1].continuation);
        assert!(!layouts[2].continuation);
    }

    #[test]
    fn initializer_comma_is_not_continuation() {
        let layouts = walk(&["int a[] = {", "1,", "2", "};"]);
        assert!(!layouts[2].continuation);
        assert_eq!(layouts[2].depth, 1);
        assert_eq!(layouts[3].depth, 0);
    }

    #[test]
    fn directives_do_not_open_continuations() {
        let layouts = walk(&["#define X(a) (a", "#include <b.h>", "int x;"]);
        assert!(layouts[0].directive);
        assert!(!layouts[2].continuation);
    }

    #[test]
    fn directive_backslash_continues() {
        let layouts = walk(&["#define X \\", "  1", "int y;"]);
        assert!(layouts[1].directive);
        assert!(!layouts[2].directive);
    }

    #[test]
    fn comment_lines_keep_previous_end() {
        let layouts = walk(&["x = 1 +", "/* note */", "2;"]);
        assert!(!layouts[1].continuation);
        assert!(layouts[2].continuation);
    }

    #[test]
    fn literal_first_line_can_continue() {
        let layouts = walk(&["{", "f(\"first\"", "\"second\");", "'x';"]);
        assert!(layouts[2].continuation);
        assert_eq!(layouts[2].indent_tabs(), 2);
        assert!(!layouts[3].continuation);
    }

    #[test]
    fn braces_in_strings_are_ignored() {
        let layouts = walk(&["s = \"{\";", "t;"]);
        assert_eq!(layouts[1].depth, 0);
    }

    #[test]
    fn block_comment_interior_is_flagged() {
        let layouts = walk(&["/*", " * text {", " */", "x;"]);
        assert!(layouts[1].in_comment);
        assert_eq!(layouts[3].depth, 0);
    }
}
