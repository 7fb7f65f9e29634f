//! Whole-file text addressed as lines.

/// A file's text split on `\n`.
///
/// Whether the text ended with a newline is remembered so [`FileText::join`]
/// reproduces it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileText {
    /// Lines without their terminators.
    pub lines: Vec<String>,
    /// Whether the text ended with `\n`.
    pub trailing_newline: bool,
}

impl FileText {
    /// Splits `text` into lines.
    #[must_use]
    pub fn split(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        let (body, trailing_newline) = match text.strip_suffix('\n') {
            Some(body) => (body, true),
            None => (text, false),
        };
        Self {
            lines: body.split('\n').map(str::to_string).collect(),
            trailing_newline,
        }
    }

    /// Builds a buffer from already split lines.
    #[must_use]
    pub fn from_lines(lines: Vec<String>, trailing_newline: bool) -> Self {
        Self {
            lines,
            trailing_newline,
        }
    }

    /// Joins the lines back into text.
    #[must_use]
    pub fn join(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut text = self.lines.join("\n");
        if self.trailing_newline {
            text.push('\n');
        }
        text
    }
}

/// Whether a line holds only spaces and tabs.
#[must_use]
pub fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

/// The leading spaces and tabs of a line.
#[must_use]
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Number of characters in a line.
#[must_use]
pub fn char_len(line: &str) -> usize {
    line.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_and_join_keep_trailing_newline() {
        for text in ["", "a", "a\n", "a\n\nb\n", "\n", "a\n\n"] {
            assert_eq!(FileText::split(text).join(), text);
        }
    }

    #[test]
    fn split_drops_only_the_final_terminator() {
        let buffer = FileText::split("a\n\n");
        assert_eq!(buffer.lines, vec!["a", ""]);
        assert!(buffer.trailing_newline);
    }

    #[test]
    fn blank_and_indent_helpers() {
        assert!(is_blank(" \t "));
        assert!(is_blank(""));
        assert!(!is_blank("\tx"));
        assert_eq!(leading_whitespace("\t  x = 1;"), "\t  ");
        assert_eq!(leading_whitespace("   "), "   ");
        assert_eq!(char_len("é\t"), 2);
    }
}
