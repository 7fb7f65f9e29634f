//! Pass selection and ordered execution.

use crate::{
    BlankLinesPass, BracesPass, CommentsPass, FunctionSpacingPass, HeaderPass, IndentationPass,
    LongLinesPass, SpacingPass, TabsPass,
};
use normfix_core::{Analysis, PassBox, PassContext, PassId};
use serde::Serialize;
use tracing::debug;

/// Builds the built-in pass for `id`.
#[must_use]
pub fn pass_for(id: PassId) -> PassBox {
    match id {
        PassId::Header => Box::new(HeaderPass::new()),
        PassId::Spacing => Box::new(SpacingPass::new()),
        PassId::Indentation => Box::new(IndentationPass::new()),
        PassId::Braces => Box::new(BracesPass::new()),
        PassId::Tabs => Box::new(TabsPass::new()),
        PassId::Comments => Box::new(CommentsPass::new()),
        PassId::BlankLines => Box::new(BlankLinesPass::new()),
        PassId::FunctionSpacing => Box::new(FunctionSpacingPass::new()),
        PassId::LongLines => Box::new(LongLinesPass::new()),
    }
}

/// Returns every built-in pass in pipeline order.
#[must_use]
pub fn all_passes() -> Vec<PassBox> {
    PassId::ORDER.into_iter().map(pass_for).collect()
}

/// Passes activated by the auto-fixable analyses, in pipeline order.
#[must_use]
pub fn triggered_passes(analyses: &[Analysis]) -> Vec<PassId> {
    let codes: Vec<&str> = analyses
        .iter()
        .filter(|a| a.auto_fixable)
        .map(|a| a.rule_code.as_str())
        .collect();
    PassId::ORDER
        .into_iter()
        .filter(|id| id.is_triggered_by(codes.iter().copied()))
        .collect()
}

/// Change count of one executed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassStep {
    /// The pass that ran.
    pub pass: PassId,
    /// Edits it made.
    pub changes: usize,
}

/// Result of running a pipeline over one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Final text.
    pub text: String,
    /// Sum of all pass change counts.
    pub changes: usize,
    /// Per-pass counts in execution order.
    pub steps: Vec<PassStep>,
}

/// An ordered list of passes.
pub struct Pipeline {
    passes: Vec<PassBox>,
}

impl Pipeline {
    /// A pipeline running exactly `passes`, in the given order.
    #[must_use]
    pub fn new(passes: Vec<PassBox>) -> Self {
        Self { passes }
    }

    /// All built-in passes.
    #[must_use]
    pub fn full() -> Self {
        Self::new(all_passes())
    }

    /// The passes listed in `ids`, reordered into pipeline order.
    #[must_use]
    pub fn select(ids: &[PassId]) -> Self {
        let passes = PassId::ORDER
            .into_iter()
            .filter(|id| ids.contains(id))
            .map(pass_for)
            .collect();
        Self::new(passes)
    }

    /// The passes triggered by `analyses`.
    #[must_use]
    pub fn for_analyses(analyses: &[Analysis]) -> Self {
        Self::select(&triggered_passes(analyses))
    }

    /// Identifiers of the passes, in execution order.
    #[must_use]
    pub fn ids(&self) -> Vec<PassId> {
        self.passes.iter().map(|p| p.id()).collect()
    }

    /// Whether the pipeline has no passes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Runs every pass in order, feeding each the previous output.
    #[must_use]
    pub fn run(&self, ctx: &PassContext, text: &str) -> PipelineOutcome {
        let mut current = text.to_string();
        let mut steps = Vec::with_capacity(self.passes.len());
        let mut changes = 0;

        for pass in &self.passes {
            let outcome = pass.apply(ctx, &current);
            debug!(pass = pass.name(), changes = outcome.changes, "pass applied");
            changes += outcome.changes;
            steps.push(PassStep {
                pass: pass.id(),
                changes: outcome.changes,
            });
            current = outcome.text;
        }

        PipelineOutcome {
            text: current,
            changes,
            steps,
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").field("passes", &self.ids()).finish()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use normfix_core::{classify, ViolationRecord};

    fn analysis(code: &str) -> Analysis {
        classify(&ViolationRecord::new(code, 1, 1, "x"))
    }

    #[test]
    fn test_all_passes_in_order() {
        let passes = all_passes();
        let ids: Vec<_> = passes.iter().map(|p| p.id()).collect();
        assert_eq!(ids, PassId::ORDER.to_vec());
        for pass in &passes {
            assert_eq!(pass.name(), pass.id().name());
            assert!(!pass.description().is_empty());
        }
    }

    #[test]
    fn test_triggered_passes_from_analyses() {
        let analyses = vec![
            analysis("TOO_LONG_LINE"),
            analysis("SPACE_BEFORE_FUNC"),
            analysis("TOO_MANY_FUNCS"),
        ];
        assert_eq!(
            triggered_passes(&analyses),
            vec![PassId::Spacing, PassId::LongLines]
        );
    }

    #[test]
    fn test_non_fixable_analyses_trigger_nothing() {
        let analyses = vec![analysis("TOO_MANY_LINES"), analysis("SOMETHING_ELSE")];
        assert!(Pipeline::for_analyses(&analyses).is_empty());
    }

    #[test]
    fn test_select_reorders() {
        let pipeline = Pipeline::select(&[PassId::Tabs, PassId::Header]);
        assert_eq!(pipeline.ids(), vec![PassId::Header, PassId::Tabs]);
    }

    #[test]
    fn test_run_sums_changes() {
        let pipeline = Pipeline::select(&[PassId::Spacing, PassId::Comments]);
        let outcome = pipeline.run(&PassContext::new("a.c"), "if(x) // c\n");
        assert_eq!(outcome.text, "if (x) /* c */\n");
        assert_eq!(outcome.changes, 2);
        assert_eq!(outcome.steps.len(), 2);
        assert_eq!(outcome.steps[1].changes, 1);
    }
}
