//! Pass trait and trigger table for the text transformation pipeline.

use crate::catalog::RuleCode;
use crate::config::HeaderConfig;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;

/// Identifies a built-in pass. Variants are declared in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassId {
    /// Inserts the 42 header.
    Header,
    /// Normalizes spaces around keywords, calls and operators.
    Spacing,
    /// Re-indents lines from brace depth.
    Indentation,
    /// Moves braces to their expected lines.
    Braces,
    /// Converts leading spaces to tabs.
    Tabs,
    /// Rewrites trailing `//` comments.
    Comments,
    /// Removes superfluous blank lines.
    BlankLines,
    /// Puts one blank line before function definitions.
    FunctionSpacing,
    /// Splits lines over 80 characters.
    LongLines,
}

impl PassId {
    /// Every pass in pipeline order.
    pub const ORDER: [Self; 9] = [
        Self::Header,
        Self::Spacing,
        Self::Indentation,
        Self::Braces,
        Self::Tabs,
        Self::Comments,
        Self::BlankLines,
        Self::FunctionSpacing,
        Self::LongLines,
    ];

    /// Kebab-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Spacing => "spacing",
            Self::Indentation => "indentation",
            Self::Braces => "braces",
            Self::Tabs => "tabs",
            Self::Comments => "comments",
            Self::BlankLines => "blank-lines",
            Self::FunctionSpacing => "function-spacing",
            Self::LongLines => "long-lines",
        }
    }

    /// Rule codes that activate this pass.
    #[must_use]
    pub const fn triggers(self) -> &'static [RuleCode] {
        match self {
            Self::Header => &[RuleCode::HeaderMissing],
            Self::Spacing => &[RuleCode::SpaceBeforeFunc, RuleCode::SpaceAfterKw],
            Self::Indentation => &[RuleCode::IndentBranch, RuleCode::IndentMultBranch],
            Self::Braces => &[
                RuleCode::BraceNewline,
                RuleCode::BraceShouldEol,
                RuleCode::BraceShouldNewline,
            ],
            Self::Tabs => &[RuleCode::SpaceReplaceTab, RuleCode::TabReplaceSpace],
            Self::Comments => &[RuleCode::WrongScopeComment],
            Self::BlankLines => &[
                RuleCode::EmptyLineFunction,
                RuleCode::EmptyLineEof,
                RuleCode::ConsecutiveNewlines,
            ],
            Self::FunctionSpacing => &[RuleCode::NewlinePrecedesFunc],
            Self::LongLines => &[RuleCode::TooLongLine],
        }
    }

    /// Whether any of `codes` activates this pass.
    #[must_use]
    pub fn is_triggered_by<'a>(self, codes: impl IntoIterator<Item = &'a str>) -> bool {
        let triggers = self.triggers();
        codes
            .into_iter()
            .any(|code| triggers.iter().any(|t| t.as_str() == code))
    }
}

impl std::fmt::Display for PassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-file inputs a pass may need besides the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassContext {
    /// File name shown in the header.
    pub filename: String,
    /// Header author login.
    pub author: String,
    /// Header author email.
    pub email: String,
    /// Time written into the header.
    pub timestamp: NaiveDateTime,
}

impl PassContext {
    /// Context for `filename` with default author and the current local time.
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        let header = HeaderConfig::default();
        Self {
            filename: filename.into(),
            author: header.author,
            email: header.email,
            timestamp: Local::now().naive_local(),
        }
    }

    /// Takes author and email from the header configuration.
    #[must_use]
    pub fn with_header(mut self, header: &HeaderConfig) -> Self {
        self.author.clone_from(&header.author);
        self.email.clone_from(&header.email);
        self
    }

    /// Overrides the header timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Result of one pass over a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    /// The rewritten text.
    pub text: String,
    /// Number of edits made.
    pub changes: usize,
}

impl PassOutcome {
    /// An outcome that leaves `text` as is.
    #[must_use]
    pub fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            changes: 0,
        }
    }
}

/// A text transformation over a whole file.
///
/// Passes are pure: the same context and text always give the same outcome.
pub trait Pass: Send + Sync {
    /// Which built-in pass this is.
    fn id(&self) -> PassId;

    /// Returns the kebab-case name of this pass.
    fn name(&self) -> &'static str {
        self.id().name()
    }

    /// Returns a brief description of what this pass rewrites.
    fn description(&self) -> &'static str {
        ""
    }

    /// Rewrites `text`.
    fn apply(&self, ctx: &PassContext, text: &str) -> PassOutcome;
}

/// Type alias for boxed Pass trait objects.
pub type PassBox = Box<dyn Pass>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_matches_declaration() {
        let mut sorted = PassId::ORDER;
        sorted.sort();
        assert_eq!(sorted, PassId::ORDER);
    }

    #[test]
    fn trigger_table_lookup() {
        assert!(PassId::Spacing.is_triggered_by(["SPACE_AFTER_KW"]));
        assert!(!PassId::Spacing.is_triggered_by(["TOO_LONG_LINE"]));
        assert!(PassId::LongLines.is_triggered_by(["X", "TOO_LONG_LINE"]));
        assert!(!PassId::Header.is_triggered_by(Vec::<&str>::new()));
    }

    #[test]
    fn every_trigger_is_auto_fixable() {
        for id in PassId::ORDER {
            for rule in id.triggers() {
                assert!(rule.profile().auto_fixable, "{rule} triggers {id}");
            }
        }
    }

    #[test]
    fn context_takes_header_config() {
        let header = HeaderConfig {
            author: "jdoe".to_string(),
            email: "jdoe@x.fr".to_string(),
        };
        let ctx = PassContext::new("a.c").with_header(&header);
        assert_eq!(ctx.author, "jdoe");
        assert_eq!(ctx.filename, "a.c");
    }
}
