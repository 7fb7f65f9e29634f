//! Character-level lexical mask for C source lines.
//!
//! Each character of a line is classified as code, literal (string or char
//! literal, escapes included) or comment. Block comments carry across lines
//! through [`LexState`]; string state does not.

/// Lexical class of one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Ordinary code, including whitespace between tokens.
    Code,
    /// Inside a string or char literal, quotes included.
    Literal,
    /// Inside a comment, delimiters included.
    Comment,
}

/// Lexer state carried from one line to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexState {
    /// A `/*` comment is open at the end of the previous line.
    pub in_block_comment: bool,
}

/// A line with its per-character classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedLine {
    /// The line's characters.
    pub chars: Vec<char>,
    /// One class per character.
    pub classes: Vec<CharClass>,
    /// The line began inside a block comment.
    pub starts_in_comment: bool,
    /// Index of the `//` that opens a line comment, if any.
    pub line_comment: Option<usize>,
}

impl MaskedLine {
    /// Classifies `line`, advancing `state` past it.
    #[must_use]
    pub fn new(line: &str, state: &mut LexState) -> Self {
        let chars: Vec<char> = line.chars().collect();
        let n = chars.len();
        let mut classes = vec![CharClass::Code; n];
        let starts_in_comment = state.in_block_comment;
        let mut in_block = state.in_block_comment;
        let mut line_comment = None;
        let mut i = 0;

        while i < n {
            if in_block {
                classes[i] = CharClass::Comment;
                if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                    classes[i + 1] = CharClass::Comment;
                    in_block = false;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }
            match chars[i] {
                '/' if chars.get(i + 1) == Some(&'*') => {
                    classes[i] = CharClass::Comment;
                    classes[i + 1] = CharClass::Comment;
                    in_block = true;
                    i += 2;
                }
                '/' if chars.get(i + 1) == Some(&'/') => {
                    for class in &mut classes[i..] {
                        *class = CharClass::Comment;
                    }
                    line_comment = Some(i);
                    break;
                }
                quote @ ('"' | '\'') => {
                    classes[i] = CharClass::Literal;
                    i += 1;
                    while i < n {
                        classes[i] = CharClass::Literal;
                        if chars[i] == '\\' {
                            if i + 1 < n {
                                classes[i + 1] = CharClass::Literal;
                            }
                            i += 2;
                            continue;
                        }
                        i += 1;
                        if chars[i - 1] == quote {
                            break;
                        }
                    }
                }
                _ => i += 1,
            }
        }

        state.in_block_comment = in_block;
        Self {
            chars,
            classes,
            starts_in_comment,
            line_comment,
        }
    }

    /// Number of characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the line is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Whether the character at `index` is code.
    #[must_use]
    pub fn is_code(&self, index: usize) -> bool {
        self.classes.get(index) == Some(&CharClass::Code)
    }

    /// Whether the character at `index` is code and equals `c`.
    #[must_use]
    pub fn code_char_is(&self, index: usize, c: char) -> bool {
        self.is_code(index) && self.chars[index] == c
    }

    /// Index of the first character that is not a space or tab.
    #[must_use]
    pub fn first_non_blank(&self) -> Option<usize> {
        self.chars.iter().position(|c| *c != ' ' && *c != '\t')
    }

    /// The first non-blank character is code and starts a preprocessor directive.
    #[must_use]
    pub fn is_directive(&self) -> bool {
        self.first_non_blank()
            .is_some_and(|i| self.code_char_is(i, '#'))
    }

    /// The first non-blank character belongs to a comment.
    #[must_use]
    pub fn starts_with_comment(&self) -> bool {
        self.first_non_blank()
            .is_some_and(|i| self.classes[i] == CharClass::Comment)
    }

    /// The last non-blank character that is code or literal.
    #[must_use]
    pub fn last_significant(&self) -> Option<char> {
        (0..self.len())
            .rev()
            .find(|&i| {
                self.classes[i] != CharClass::Comment
                    && self.chars[i] != ' '
                    && self.chars[i] != '\t'
            })
            .map(|i| self.chars[i])
    }

    /// Whether any character is code and not blank.
    #[must_use]
    pub fn has_code(&self) -> bool {
        (0..self.len()).any(|i| {
            self.classes[i] != CharClass::Comment && self.chars[i] != ' ' && self.chars[i] != '\t'
        })
    }

    /// The characters from `start` to `end` as a string.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }
}

/// Masks every line of a file, carrying block comment state.
#[must_use]
pub fn mask_lines(lines: &[String]) -> Vec<MaskedLine> {
    let mut state = LexState::default();
    lines
        .iter()
        .map(|line| MaskedLine::new(line, &mut state))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use CharClass::{Code, Comment, Literal};

    fn classes(line: &str) -> Vec<CharClass> {
        MaskedLine::new(line, &mut LexState::default()).classes
    }

    #[test]
    fn string_literal_with_escape() {
        assert_eq!(
            classes(r#"a"\"b"c"#),
            vec![Code, Literal, Literal, Literal, Literal, Literal, Code]
        );
    }

    #[test]
    fn char_literal() {
        assert_eq!(classes("x='('"), vec![Code, Code, Literal, Literal, Literal]);
    }

    #[test]
    fn line_comment_runs_to_end() {
        assert_eq!(classes("a//b\"c"), vec![Code, Comment, Comment, Comment, Comment, Comment]);
        let masked = MaskedLine::new("/* a */// b", &mut LexState::default());
        assert_eq!(masked.line_comment, Some(7));
    }

    #[test]
    fn comment_markers_inside_strings_are_literal() {
        let masked = MaskedLine::new("\"/*\" x", &mut LexState::default());
        assert!(masked.is_code(5));
        assert!(!masked.is_code(1));
    }

    #[test]
    fn block_comment_spans_lines() {
        let lines = vec!["a /* b".to_string(), "c */ d".to_string(), "e".to_string()];
        let masked = mask_lines(&lines);
        assert!(!masked[0].starts_in_comment);
        assert!(masked[1].starts_in_comment);
        assert_eq!(masked[1].classes[..4], [Comment, Comment, Comment, Comment]);
        assert!(masked[1].is_code(5));
        assert!(!masked[2].starts_in_comment);
    }

    #[test]
    fn line_queries() {
        let masked = MaskedLine::new("\tx = 1; /* y */", &mut LexState::default());
        assert_eq!(masked.first_non_blank(), Some(1));
        assert_eq!(masked.last_significant(), Some(';'));
        assert!(masked.has_code());
        assert!(!masked.is_directive());
        assert!(MaskedLine::new("  #include <a.h>", &mut LexState::default()).is_directive());
        assert!(MaskedLine::new("  // c", &mut LexState::default()).starts_with_comment());
    }
}
