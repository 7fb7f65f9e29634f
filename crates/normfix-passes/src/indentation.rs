//! Pass re-indenting lines from brace depth.
//!
//! A line at depth `d` is indented with `d` tabs. A continuation line needs at
//! least `d + 1`; an all-tab indent that deep is kept as is. Blank lines,
//! preprocessor lines and lines inside block comments are left alone.

use normfix_core::utils::{leading_whitespace, tabs, FileText, LayoutTracker, LineLayout};
use normfix_core::{Pass, PassContext, PassId, PassOutcome};
use tracing::debug;

/// Pass name for indentation normalization.
pub const NAME: &str = "indentation";

/// Re-indents code lines with tabs.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndentationPass;

impl IndentationPass {
    /// Creates the pass.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Pass for IndentationPass {
    fn id(&self) -> PassId {
        PassId::Indentation
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Indents each line with one tab per open brace"
    }

    fn apply(&self, ctx: &PassContext, text: &str) -> PassOutcome {
        let mut buffer = FileText::split(text);
        let mut tracker = LayoutTracker::new();
        let mut changes = 0;

        for line in &mut buffer.lines {
            let layout = tracker.classify(line);
            if !(layout.blank || layout.directive || layout.in_comment) {
                let indent = leading_whitespace(line);
                let wanted = required_indent(indent, &layout);
                if indent != wanted {
                    *line = format!("{wanted}{}", &line[indent.len()..]);
                    changes += 1;
                }
            }
            tracker.advance(line);
        }

        debug!(file = %ctx.filename, changes, "indentation pass done");
        PassOutcome {
            text: buffer.join(),
            changes,
        }
    }
}

/// The indentation a line should have, given its current one.
#[must_use]
pub fn required_indent(current: &str, layout: &LineLayout) -> String {
    let wanted = layout.indent_tabs();
    if layout.continuation && current.len() >= wanted && current.chars().all(|c| c == '\t') {
        return current.to_string();
    }
    tabs(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> PassOutcome {
        IndentationPass::new().apply(&PassContext::new("test.c"), text)
    }

    #[test]
    fn test_indents_by_depth() {
        let text = "int main(void)\n{\n  if (x)\n  {\n        y();\n  }\n  return (0);\n}\n";
        let outcome = run(text);
        assert_eq!(
            outcome.text,
            "int main(void)\n{\n\tif (x)\n\t{\n\t\ty();\n\t}\n\treturn (0);\n}\n"
        );
        assert_eq!(outcome.changes, 5);
    }

    #[test]
    fn test_closing_brace_before_else() {
        let text = "{\nif (a)\n{\nb;\n} else {\nc;\n}\n}\n";
        let outcome = run(text);
        assert_eq!(
            outcome.text,
            "{\n\tif (a)\n\t{\n\t\tb;\n\t} else {\n\t\tc;\n\t}\n}\n"
        );
    }

    #[test]
    fn test_continuation_keeps_deeper_tabs() {
        let text = "{\n\tx = f(a,\n\t\t\t\tb);\n\ty = g(c,\nd);\n}\n";
        let outcome = run(text);
        assert_eq!(outcome.text, "{\n\tx = f(a,\n\t\t\t\tb);\n\ty = g(c,\n\t\td);\n}\n");
        assert_eq!(outcome.changes, 1);
    }

    #[test]
    fn test_literal_continuation_kept() {
        let text = "{\n\tft_putstr(\"first\"\n\t\t\"second\");\n}\n";
        let outcome = run(text);
        assert_eq!(outcome.text, text);
        assert_eq!(outcome.changes, 0);

        let outcome = run("{\n\tft_putstr(\"first\"\n\"second\");\n}\n");
        assert_eq!(outcome.text, text);
        assert_eq!(outcome.changes, 1);
    }

    #[test]
    fn test_brace_less_body() {
        let outcome = run("{\n\tif (x)\n\treturn ;\n}\n");
        assert_eq!(outcome.text, "{\n\tif (x)\n\t\treturn ;\n}\n");
    }

    #[test]
    fn test_skips_directives_comments_and_blanks() {
        let text = "{\n#include \"a.h\"\n/*\n   text\n */\n   \n}\n";
        let outcome = run(text);
        assert_eq!(outcome.text, "{\n#include \"a.h\"\n\t/*\n   text\n */\n   \n}\n");
    }

    #[test]
    fn test_depth_never_negative() {
        let outcome = run("}\n}\nx;\n");
        assert_eq!(outcome.changes, 0);
    }
}
