//! Pass rewriting trailing `//` comments as block comments.
//!
//! `x = 1; // note` becomes `x = 1; /* note */`. Comments that start their
//! line and empty trailing comments are left alone.

use normfix_core::utils::{mask_lines, FileText, MaskedLine};
use normfix_core::{Pass, PassContext, PassId, PassOutcome};
use tracing::debug;

/// Pass name for comment conversion.
pub const NAME: &str = "comments";

/// Converts end-of-line `//` comments to `/* */`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentsPass;

impl CommentsPass {
    /// Creates the pass.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Pass for CommentsPass {
    fn id(&self) -> PassId {
        PassId::Comments
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Rewrites trailing // comments as /* */ comments"
    }

    fn apply(&self, ctx: &PassContext, text: &str) -> PassOutcome {
        let mut buffer = FileText::split(text);
        let masks = mask_lines(&buffer.lines);
        let mut changes = 0;

        for (line, masked) in buffer.lines.iter_mut().zip(&masks) {
            if let Some(fixed) = convert_trailing(masked) {
                *line = fixed;
                changes += 1;
            }
        }

        debug!(file = %ctx.filename, changes, "comments pass done");
        PassOutcome {
            text: buffer.join(),
            changes,
        }
    }
}

/// The line with its trailing `//` comment rewritten, if it has one.
fn convert_trailing(masked: &MaskedLine) -> Option<String> {
    let start = masked.line_comment?;
    if masked.first_non_blank() == Some(start) {
        return None;
    }
    let body = masked.slice(start + 2, masked.len());
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let prefix = masked.slice(0, start);
    Some(format!(
        "{} /* {} */",
        prefix.trim_end(),
        body.replace("*/", "* /")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> PassOutcome {
        CommentsPass::new().apply(&PassContext::new("test.c"), text)
    }

    #[test]
    fn test_converts_trailing_comment() {
        let outcome = run("\tx = 1; // set x\n");
        assert_eq!(outcome.text, "\tx = 1; /* set x */\n");
        assert_eq!(outcome.changes, 1);
    }

    #[test]
    fn test_whole_line_comment_untouched() {
        assert_eq!(run("// top\n\t// indented\n").changes, 0);
    }

    #[test]
    fn test_empty_comment_untouched() {
        assert_eq!(run("x = 1; //   \n").changes, 0);
    }

    #[test]
    fn test_slashes_in_string_untouched() {
        let text = "s = \"http://x\";\n";
        assert_eq!(run(text).text, text);
    }

    #[test]
    fn test_block_terminator_in_body_is_defused() {
        let outcome = run("y; // a */ b\n");
        assert_eq!(outcome.text, "y; /* a * / b */\n");
    }

    #[test]
    fn test_inside_block_comment_untouched() {
        assert_eq!(run("/*\n x; // y\n*/\n").changes, 0);
    }

    #[test]
    fn test_rerun_is_clean() {
        let first = run("a; // one\nb; // two\n");
        assert_eq!(first.changes, 2);
        assert_eq!(run(&first.text).changes, 0);
    }
}
