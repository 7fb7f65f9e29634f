//! Pass putting one blank line before each function definition.
//!
//! A definition starts at column 0, at file scope, with a parameter list whose
//! balanced parentheses are followed by `{` (possibly on a later line). It is
//! preceded by exactly one blank line unless it is the first construct of the
//! file or sits directly below a comment or a preprocessor line. Blank lines
//! between such a line and the definition still collapse to one.

use normfix_core::utils::{is_blank, FileText, LayoutTracker, LineLayout, MaskedLine};
use normfix_core::{Pass, PassContext, PassId, PassOutcome};
use tracing::debug;

/// Pass name for function spacing.
pub const NAME: &str = "function-spacing";

/// Separates function definitions with one blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionSpacingPass;

impl FunctionSpacingPass {
    /// Creates the pass.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Pass for FunctionSpacingPass {
    fn id(&self) -> PassId {
        PassId::FunctionSpacing
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Puts exactly one blank line before each function definition"
    }

    fn apply(&self, ctx: &PassContext, text: &str) -> PassOutcome {
        let buffer = FileText::split(text);
        let mut tracker = LayoutTracker::new();
        let mut scanned: Vec<(MaskedLine, LineLayout)> = Vec::with_capacity(buffer.lines.len());
        for line in &buffer.lines {
            let masked = tracker.mask(line);
            let layout = tracker.classify_masked(&masked);
            tracker.advance(line);
            scanned.push((masked, layout));
        }

        let mut out: Vec<String> = Vec::with_capacity(buffer.lines.len() + 4);
        let mut changes = 0;

        for (index, line) in buffer.lines.iter().enumerate() {
            if is_definition(&scanned, index) {
                let blanks = out.iter().rev().take_while(|l| is_blank(l)).count();
                let anchor = out.len() - blanks;
                // A comment or directive only exempts the line it sits right above.
                let exempt =
                    anchor > 0 && blanks == 0 && is_comment_or_directive(&out[anchor - 1]);
                if anchor > 0 && blanks != 1 && !exempt {
                    out.truncate(anchor);
                    out.push(String::new());
                    changes += 1;
                }
            }
            out.push(line.clone());
        }

        debug!(file = %ctx.filename, changes, "function-spacing pass done");
        PassOutcome {
            text: FileText::from_lines(out, buffer.trailing_newline).join(),
            changes,
        }
    }
}

fn is_comment_or_directive(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("/*")
        || trimmed.starts_with('*')
        || trimmed.starts_with("//")
        || trimmed.ends_with("*/")
        || trimmed.starts_with('#')
}

/// Whether line `index` opens a function definition.
fn is_definition(scanned: &[(MaskedLine, LineLayout)], index: usize) -> bool {
    let (masked, layout) = &scanned[index];
    if layout.blank || layout.directive || layout.in_comment || layout.depth > 0 {
        return false;
    }
    if !masked.is_code(0) || matches!(masked.chars[0], ' ' | '\t' | '{' | '}') {
        return false;
    }
    let Some(open) = (0..masked.len()).find(|&i| masked.code_char_is(i, '(')) else {
        return false;
    };

    let mut balance: i64 = 0;
    let mut closed = false;
    let mut start = open;
    for (line, _) in &scanned[index..] {
        for i in start..line.len() {
            if !line.is_code(i) || matches!(line.chars[i], ' ' | '\t') {
                continue;
            }
            let c = line.chars[i];
            if closed {
                return c == '{';
            }
            match c {
                '(' => balance += 1,
                ')' => {
                    balance -= 1;
                    if balance == 0 {
                        closed = true;
                    }
                }
                ';' | '{' | '}' => return false,
                _ => {}
            }
        }
        start = 0;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> PassOutcome {
        FunctionSpacingPass::new().apply(&PassContext::new("test.c"), text)
    }

    #[test]
    fn test_inserts_blank_between_functions() {
        let outcome = run("int a(void)\n{\n\treturn (1);\n}\nint b(void)\n{\n\treturn (2);\n}\n");
        assert_eq!(
            outcome.text,
            "int a(void)\n{\n\treturn (1);\n}\n\nint b(void)\n{\n\treturn (2);\n}\n"
        );
        assert_eq!(outcome.changes, 1);
    }

    #[test]
    fn test_collapses_extra_blanks() {
        let outcome = run("int x;\n\n\n\nvoid f(void)\n{\n}\n");
        assert_eq!(outcome.text, "int x;\n\nvoid f(void)\n{\n}\n");
        assert_eq!(outcome.changes, 1);
    }

    #[test]
    fn test_first_construct_untouched() {
        assert_eq!(run("int main(void)\n{\n}\n").changes, 0);
    }

    #[test]
    fn test_after_comment_or_directive_untouched() {
        assert_eq!(run("/* entry */\nint main(void)\n{\n}\n").changes, 0);
        assert_eq!(run("#include <unistd.h>\nint main(void)\n{\n}\n").changes, 0);
    }

    #[test]
    fn test_blanks_below_comment_collapse() {
        let outcome = run("/* doc */\n\n\n\nint f(void)\n{\n}\n");
        assert_eq!(outcome.text, "/* doc */\n\nint f(void)\n{\n}\n");
        assert_eq!(outcome.changes, 1);

        let outcome = run("#include <unistd.h>\n\n\nint main(void)\n{\n}\n");
        assert_eq!(outcome.text, "#include <unistd.h>\n\nint main(void)\n{\n}\n");
        assert_eq!(run(&outcome.text).changes, 0);
    }

    #[test]
    fn test_prototypes_and_calls_ignored() {
        let text = "int a(void);\nint b(int x);\nint g = 0;\n";
        assert_eq!(run(text).changes, 0);
    }

    #[test]
    fn test_parameter_list_across_lines() {
        let outcome = run("int x;\nint f(int a,\n\t\tint b)\n{\n}\n");
        assert_eq!(outcome.text, "int x;\n\nint f(int a,\n\t\tint b)\n{\n}\n");
    }

    #[test]
    fn test_brace_on_same_line() {
        let outcome = run("int x;\nint f(void) {\n}\n");
        assert_eq!(outcome.changes, 1);
    }

    #[test]
    fn test_nested_calls_not_definitions() {
        let text = "int f(void)\n{\n\tg(1);\n}\n";
        assert_eq!(run(text).changes, 0);
    }
}
