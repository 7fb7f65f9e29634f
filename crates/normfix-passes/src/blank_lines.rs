//! Pass removing superfluous blank lines.
//!
//! Blank lines inside a brace scope are deleted, runs of blank lines at file
//! scope collapse to one and blank lines at the end of the file are dropped.
//! Blank lines inside block comments are kept.

use normfix_core::utils::{is_blank, FileText, LayoutTracker};
use normfix_core::{Pass, PassContext, PassId, PassOutcome};
use tracing::debug;

/// Pass name for blank-line normalization.
pub const NAME: &str = "blank-lines";

/// Deletes blank lines that the norm does not allow.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankLinesPass;

impl BlankLinesPass {
    /// Creates the pass.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Pass for BlankLinesPass {
    fn id(&self) -> PassId {
        PassId::BlankLines
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Removes blank lines inside functions, doubled blank lines and trailing blank lines"
    }

    fn apply(&self, ctx: &PassContext, text: &str) -> PassOutcome {
        let buffer = FileText::split(text);
        let mut tracker = LayoutTracker::new();
        let mut kept: Vec<String> = Vec::with_capacity(buffer.lines.len());
        let mut previous_blank = false;
        let mut changes = 0;

        for line in buffer.lines {
            let layout = tracker.classify(&line);
            tracker.advance(&line);
            if layout.blank && !layout.in_comment {
                if layout.depth > 0 || previous_blank {
                    changes += 1;
                    continue;
                }
                previous_blank = true;
            } else {
                previous_blank = false;
            }
            kept.push(line);
        }

        while kept.last().is_some_and(|line| is_blank(line)) {
            kept.pop();
            changes += 1;
        }

        debug!(file = %ctx.filename, changes, "blank-lines pass done");
        PassOutcome {
            text: FileText::from_lines(kept, buffer.trailing_newline).join(),
            changes,
        }
    }
}
