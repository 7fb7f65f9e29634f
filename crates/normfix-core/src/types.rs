//! Core types for violation records and their analyses.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Context key for the measured value in a "(current/limit)" description.
pub const CURRENT_VALUE: &str = "current_value";

/// Context key for the limit in a "(current/limit)" description.
pub const LIMIT: &str = "limit";

/// Context key for `current_value - limit`.
pub const EXCESS: &str = "excess";

/// Impact of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Cosmetic issue.
    Low,
    /// Should be addressed.
    Medium,
    /// Blocks a clean norminette run in most projects.
    High,
    /// Must be fixed before anything else.
    Critical,
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Priority rank used for ordering (Critical = 4 ... Low = 1).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Effort needed to fix a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixComplexity {
    /// A mechanical rewrite exists.
    Trivial,
    /// Small manual edit.
    Simple,
    /// Requires some refactoring.
    Moderate,
    /// Significant code changes.
    Complex,
}

impl FixComplexity {
    /// All complexities, easiest first.
    pub const ALL: [Self; 4] = [Self::Trivial, Self::Simple, Self::Moderate, Self::Complex];

    /// Priority rank used for ordering (Trivial = 4 ... Complex = 1).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Trivial => 4,
            Self::Simple => 3,
            Self::Moderate => 2,
            Self::Complex => 1,
        }
    }
}

impl std::fmt::Display for FixComplexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trivial => write!(f, "trivial"),
            Self::Simple => write!(f, "simple"),
            Self::Moderate => write!(f, "moderate"),
            Self::Complex => write!(f, "complex"),
        }
    }
}

/// A raw violation reported by the linter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// Rule code (e.g., "`SPACE_AFTER_KW`").
    pub rule_code: String,
    /// Line number (1-indexed, 0 when the linter gave none).
    pub line: usize,
    /// Column number (1-indexed, 0 when the linter gave none).
    pub column: usize,
    /// Description as printed by the linter.
    pub description: String,
    /// Coarse category assigned by the linter collaborator.
    pub coarse_category: String,
}

impl ViolationRecord {
    /// Creates a record, deriving the coarse category from the rule code.
    #[must_use]
    pub fn new(
        rule_code: impl Into<String>,
        line: usize,
        column: usize,
        description: impl Into<String>,
    ) -> Self {
        let rule_code = rule_code.into();
        let coarse_category = crate::catalog::category_for(&rule_code).to_string();
        Self {
            rule_code,
            line,
            column,
            description: description.into(),
            coarse_category,
        }
    }

    /// Overrides the coarse category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.coarse_category = category.into();
        self
    }
}

/// A violation enriched with its catalog profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Rule code as reported.
    pub rule_code: String,
    /// Line number.
    pub line: usize,
    /// Column number.
    pub column: usize,
    /// Raw description from the linter.
    pub description: String,
    /// Coarse category from the record.
    pub coarse_category: String,
    /// Severity from the catalog (or the fallback).
    pub severity: Severity,
    /// Fix complexity from the catalog (or the fallback).
    pub fix_complexity: FixComplexity,
    /// Human-readable fix suggestion.
    pub fix_suggestion: String,
    /// Whether a pass exists that fixes this rule.
    pub auto_fixable: bool,
    /// Rule codes that commonly appear together with this one.
    pub related_rule_codes: Vec<String>,
    /// Numbers pulled out of the description.
    pub extracted_context: BTreeMap<String, i64>,
}

impl Analysis {
    /// The measured value, when the description carried one.
    #[must_use]
    pub fn current_value(&self) -> Option<i64> {
        self.extracted_context.get(CURRENT_VALUE).copied()
    }

    /// How far the measured value exceeds the limit.
    #[must_use]
    pub fn excess(&self) -> Option<i64> {
        self.extracted_context.get(EXCESS).copied()
    }

    /// Composite ordering key: severity, then ease of fix, then auto-fixability.
    #[must_use]
    pub fn priority_key(&self) -> (u8, u8, u8) {
        (
            self.severity.rank(),
            self.fix_complexity.rank(),
            u8::from(self.auto_fixable),
        )
    }

    /// Formats the analysis for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} at {}:{} [{}]\n",
            self.rule_code, self.line, self.column, self.coarse_category
        );
        let _ = writeln!(
            output,
            "  {} ({}): {}",
            self.severity, self.fix_complexity, self.description
        );
        let _ = writeln!(output, "  = help: {}", self.fix_suggestion);
        if self.auto_fixable {
            let _ = writeln!(output, "  = auto-fixable");
        }
        output
    }
}

impl std::fmt::Display for Analysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.line, self.column, self.severity, self.rule_code, self.description
        )
    }
}

/// Renders an [`Analysis`] as a miette diagnostic against the file source.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct AnalysisDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl AnalysisDiagnostic {
    /// Builds a diagnostic whose span points at the analysis' line and column.
    ///
    /// Positions outside the source collapse to the nearest valid offset.
    #[must_use]
    pub fn new(analysis: &Analysis, source: &str) -> Self {
        let offset = byte_offset(source, analysis.line, analysis.column);
        let length = source[offset..]
            .chars()
            .next()
            .filter(|c| *c != '\n')
            .map_or(0, char::len_utf8);
        Self {
            message: format!("[{}] {}", analysis.rule_code, analysis.description),
            help: Some(analysis.fix_suggestion.clone()),
            span: SourceSpan::from((offset, length)),
            label_message: analysis.severity.to_string(),
        }
    }
}

fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line.max(1) {
            let within = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map_or(text.trim_end_matches('\n').len(), |(i, _)| i);
            return offset + within;
        }
        offset += text.len();
    }
    source.len()
}
