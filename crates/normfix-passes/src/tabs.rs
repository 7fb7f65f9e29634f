//! Pass repairing leading whitespace.
//!
//! Four spaces count as one tab. Leading spaces of width 4 or more become
//! tabs, keeping the remainder (fewer than 4 spaces). Any other mix of tabs
//! and spaces becomes pure tabs, dropping the remainder. Tabs followed by
//! fewer than 4 spaces is already in final form.

use normfix_core::utils::{leading_whitespace, tabs, FileText};
use normfix_core::{Pass, PassContext, PassId, PassOutcome};
use tracing::debug;

/// Pass name for tab/space repair.
pub const NAME: &str = "tabs";

const TAB_WIDTH: usize = 4;

/// Converts space indentation to tabs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabsPass;

impl TabsPass {
    /// Creates the pass.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Pass for TabsPass {
    fn id(&self) -> PassId {
        PassId::Tabs
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Replaces space indentation with tabs"
    }

    fn apply(&self, ctx: &PassContext, text: &str) -> PassOutcome {
        let mut buffer = FileText::split(text);
        let mut changes = 0;

        for line in &mut buffer.lines {
            let indent = leading_whitespace(line);
            if let Some(fixed) = repair(indent) {
                *line = format!("{fixed}{}", &line[indent.len()..]);
                changes += 1;
            }
        }

        debug!(file = %ctx.filename, changes, "tabs pass done");
        PassOutcome {
            text: buffer.join(),
            changes,
        }
    }
}

/// The repaired form of a leading whitespace run, or `None` if it is fine.
#[must_use]
pub fn repair(indent: &str) -> Option<String> {
    let tab_count = indent.chars().filter(|c| *c == '\t').count();
    let space_count = indent.len() - tab_count;

    if tab_count == 0 {
        if space_count < TAB_WIDTH {
            return None;
        }
        return Some(format!(
            "{}{}",
            tabs(space_count / TAB_WIDTH),
            " ".repeat(space_count % TAB_WIDTH)
        ));
    }

    let tabs_first = indent.chars().take(tab_count).all(|c| c == '\t');
    if tabs_first && space_count < TAB_WIDTH {
        return None;
    }
    Some(tabs(tab_count + space_count / TAB_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> PassOutcome {
        TabsPass::new().apply(&PassContext::new("test.c"), text)
    }

    #[test]
    fn test_pure_spaces_become_tabs_plus_remainder() {
        assert_eq!(repair("        "), Some("\t\t".to_string()));
        assert_eq!(repair("      "), Some("\t  ".to_string()));
        assert_eq!(repair("   "), None);
    }

    #[test]
    fn test_mixed_becomes_pure_tabs() {
        assert_eq!(repair("  \t"), Some("\t".to_string()));
        assert_eq!(repair("\t    "), Some("\t\t".to_string()));
        assert_eq!(repair("\t \t"), Some("\t\t".to_string()));
    }

    #[test]
    fn test_tabs_with_short_alignment_kept() {
        assert_eq!(repair("\t\t"), None);
        assert_eq!(repair("\t  "), None);
        assert_eq!(repair(""), None);
    }

    #[test]
    fn test_counts_lines() {
        let outcome = run("    a;\n\tb;\n  \t c;\n");
        assert_eq!(outcome.text, "\ta;\n\tb;\n\tc;\n");
        assert_eq!(outcome.changes, 2);
        assert_eq!(run(&outcome.text).changes, 0);
    }
}
