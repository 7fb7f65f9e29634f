//! Grouping, prioritizing and summarizing analyses.

use crate::types::{Analysis, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Groups analyses by coarse category, keeping input order within a group.
#[must_use]
pub fn group_by_category(analyses: &[Analysis]) -> BTreeMap<String, Vec<Analysis>> {
    let mut groups: BTreeMap<String, Vec<Analysis>> = BTreeMap::new();
    for analysis in analyses {
        groups
            .entry(analysis.coarse_category.clone())
            .or_default()
            .push(analysis.clone());
    }
    groups
}

/// Groups analyses by severity. All four severities are present as keys.
#[must_use]
pub fn group_by_severity(analyses: &[Analysis]) -> BTreeMap<Severity, Vec<Analysis>> {
    let mut groups: BTreeMap<Severity, Vec<Analysis>> =
        Severity::ALL.into_iter().map(|s| (s, Vec::new())).collect();
    for analysis in analyses {
        groups
            .entry(analysis.severity)
            .or_default()
            .push(analysis.clone());
    }
    groups
}

/// The auto-fixable subset, in input order.
#[must_use]
pub fn auto_fixable(analyses: &[Analysis]) -> Vec<Analysis> {
    analyses.iter().filter(|a| a.auto_fixable).cloned().collect()
}

/// Sorts by severity, then ease of fix, then auto-fixability, highest first.
///
/// The sort is stable: analyses with equal keys keep their input order.
#[must_use]
pub fn prioritize(analyses: &[Analysis]) -> Vec<Analysis> {
    let mut sorted = analyses.to_vec();
    sorted.sort_by(|a, b| b.priority_key().cmp(&a.priority_key()));
    sorted
}

/// Recurring problem shapes across a file's analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// Three or more spacing violations.
    MultipleSpacingIssues,
    /// More than three indentation violations.
    ConsistentIndentationIssues,
    /// More than one function size or signature violation.
    FunctionComplexityIssues,
    /// More than five over-long lines.
    WidespreadLineLengthIssues,
}

impl Pattern {
    /// Snake-case name used in summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MultipleSpacingIssues => "multiple_spacing_issues",
            Self::ConsistentIndentationIssues => "consistent_indentation_issues",
            Self::FunctionComplexityIssues => "function_complexity_issues",
            Self::WidespreadLineLengthIssues => "widespread_line_length_issues",
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const FUNCTION_RULES: [&str; 3] = ["TOO_MANY_LINES", "TOO_MANY_PARAMS", "TOO_MANY_FUNCS"];

/// Detects patterns. An analysis may belong to several patterns.
#[must_use]
pub fn detect_patterns(analyses: &[Analysis]) -> BTreeMap<Pattern, Vec<Analysis>> {
    let mut patterns = BTreeMap::new();

    let spacing = select(analyses, |a| a.coarse_category == "spacing");
    if spacing.len() >= 3 {
        patterns.insert(Pattern::MultipleSpacingIssues, spacing);
    }
    let indentation = select(analyses, |a| a.coarse_category == "indentation");
    if indentation.len() > 3 {
        patterns.insert(Pattern::ConsistentIndentationIssues, indentation);
    }
    let function = select(analyses, |a| FUNCTION_RULES.contains(&a.rule_code.as_str()));
    if function.len() > 1 {
        patterns.insert(Pattern::FunctionComplexityIssues, function);
    }
    let long_lines = select(analyses, |a| a.rule_code == "TOO_LONG_LINE");
    if long_lines.len() > 5 {
        patterns.insert(Pattern::WidespreadLineLengthIssues, long_lines);
    }

    patterns
}

fn select(analyses: &[Analysis], pred: impl Fn(&Analysis) -> bool) -> Vec<Analysis> {
    analyses.iter().filter(|&a| pred(a)).cloned().collect()
}

/// One entry of [`SummaryDetails::top_priority`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityEntry {
    /// Rule code.
    pub rule: String,
    /// Line number.
    pub line: usize,
    /// Severity.
    pub severity: Severity,
    /// Whether a pass fixes it.
    pub auto_fixable: bool,
}

/// Breakdown present only when there is at least one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDetails {
    /// Number of auto-fixable analyses.
    pub auto_fixable_count: usize,
    /// Share of auto-fixable analyses, 0 to 100.
    pub auto_fixable_percentage: f64,
    /// Count per severity; every severity is present.
    pub severity_breakdown: BTreeMap<Severity, usize>,
    /// Count per coarse category.
    pub type_breakdown: BTreeMap<String, usize>,
    /// Count per fix complexity that occurs.
    pub complexity_breakdown: BTreeMap<String, usize>,
    /// Names of the detected patterns.
    pub detected_patterns: Vec<String>,
    /// Member count per detected pattern.
    pub pattern_details: BTreeMap<String, usize>,
    /// Up to five highest-priority analyses.
    pub top_priority: Vec<PriorityEntry>,
}

/// Summary report over a set of analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of analyses.
    pub total_errors: usize,
    /// Breakdown, absent for an empty input.
    #[serde(flatten)]
    pub details: Option<SummaryDetails>,
}

/// Builds a [`Summary`]. An empty input yields only `total_errors: 0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(analyses: &[Analysis]) -> Summary {
    let total_errors = analyses.len();
    if total_errors == 0 {
        return Summary {
            total_errors,
            details: None,
        };
    }

    let auto_fixable_count = analyses.iter().filter(|a| a.auto_fixable).count();
    let severity_breakdown = group_by_severity(analyses)
        .into_iter()
        .map(|(severity, group)| (severity, group.len()))
        .collect();
    let type_breakdown = group_by_category(analyses)
        .into_iter()
        .map(|(category, group)| (category, group.len()))
        .collect();
    let mut complexity_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    for analysis in analyses {
        *complexity_breakdown
            .entry(analysis.fix_complexity.to_string())
            .or_default() += 1;
    }

    let patterns = detect_patterns(analyses);
    let top_priority = prioritize(analyses)
        .into_iter()
        .take(5)
        .map(|a| PriorityEntry {
            rule: a.rule_code,
            line: a.line,
            severity: a.severity,
            auto_fixable: a.auto_fixable,
        })
        .collect();

    Summary {
        total_errors,
        details: Some(SummaryDetails {
            auto_fixable_count,
            auto_fixable_percentage: auto_fixable_count as f64 / total_errors as f64 * 100.0,
            severity_breakdown,
            type_breakdown,
            complexity_breakdown,
            detected_patterns: patterns.keys().map(|p| p.as_str().to_string()).collect(),
            pattern_details: patterns
                .iter()
                .map(|(p, members)| (p.as_str().to_string(), members.len()))
                .collect(),
            top_priority,
        }),
    }
}

/// Overall state of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// No violations.
    Ok,
    /// Only low or medium severity violations.
    Warning,
    /// At least one high severity violation.
    Error,
    /// At least one critical violation.
    Critical,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Derives a file's status from its analyses and the linter's own verdict.
#[must_use]
pub fn file_status(analyses: &[Analysis], linter_ok: bool) -> FileStatus {
    if analyses.is_empty() {
        return if linter_ok {
            FileStatus::Ok
        } else {
            FileStatus::Error
        };
    }
    if analyses.iter().any(|a| a.severity == Severity::Critical) {
        FileStatus::Critical
    } else if analyses.iter().any(|a| a.severity == Severity::High) {
        FileStatus::Error
    } else {
        FileStatus::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_all;
    use crate::types::ViolationRecord;
    use proptest::prelude::*;

    fn analyses(codes: &[&str]) -> Vec<Analysis> {
        let records: Vec<ViolationRecord> = codes
            .iter()
            .enumerate()
            .map(|(i, code)| ViolationRecord::new(*code, i + 1, 1, "desc"))
            .collect();
        classify_all(&records)
    }

    // --- grouping ---

    #[test]
    fn severity_groups_have_every_key() {
        let groups = group_by_severity(&analyses(&["HEADER_MISSING"]));
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[&Severity::Critical].len(), 1);
        assert!(groups[&Severity::Low].is_empty());
    }

    #[test]
    fn category_groups_keep_input_order() {
        let input = analyses(&["SPACE_AFTER_KW", "TOO_LONG_LINE", "SPACE_BEFORE_FUNC"]);
        let groups = group_by_category(&input);
        let spacing: Vec<_> = groups["spacing"].iter().map(|a| a.line).collect();
        assert_eq!(spacing, vec![1, 3]);
    }

    // --- prioritizing ---

    #[test]
    fn critical_comes_first_and_ties_are_stable() {
        let input = analyses(&[
            "EMPTY_LINE_EOF",
            "CONSECUTIVE_NEWLINES",
            "HEADER_MISSING",
            "TOO_MANY_FUNCS",
        ]);
        let sorted = prioritize(&input);
        let codes: Vec<_> = sorted.iter().map(|a| a.rule_code.as_str()).collect();
        assert_eq!(
            codes,
            vec![
                "HEADER_MISSING",
                "TOO_MANY_FUNCS",
                "EMPTY_LINE_EOF",
                "CONSECUTIVE_NEWLINES"
            ]
        );
    }

    // --- patterns ---

    #[test]
    fn spacing_pattern_needs_three() {
        let two = analyses(&["SPACE_AFTER_KW", "SPACE_AFTER_KW"]);
        assert!(detect_patterns(&two).is_empty());
        let three = analyses(&["SPACE_AFTER_KW", "SPACE_AFTER_KW", "SPACE_BEFORE_FUNC"]);
        assert!(detect_patterns(&three).contains_key(&Pattern::MultipleSpacingIssues));
    }

    #[test]
    fn patterns_are_not_exclusive() {
        let input = analyses(&[
            "TOO_LONG_LINE",
            "TOO_LONG_LINE",
            "TOO_LONG_LINE",
            "TOO_LONG_LINE",
            "TOO_LONG_LINE",
            "TOO_LONG_LINE",
            "TOO_MANY_LINES",
            "TOO_MANY_PARAMS",
        ]);
        let patterns = detect_patterns(&input);
        assert_eq!(patterns[&Pattern::WidespreadLineLengthIssues].len(), 6);
        assert_eq!(patterns[&Pattern::FunctionComplexityIssues].len(), 2);
    }

    // --- summary ---

    #[test]
    fn empty_summary_has_only_total() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_errors, 0);
        assert!(summary.details.is_none());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json, serde_json::json!({ "total_errors": 0 }));
    }

    #[test]
    fn summary_counts() {
        let input = analyses(&["HEADER_MISSING", "TOO_MANY_FUNCS", "FOO"]);
        let summary = summarize(&input);
        let details = summary.details.unwrap();
        assert_eq!(summary.total_errors, 3);
        assert_eq!(details.auto_fixable_count, 1);
        assert!((details.auto_fixable_percentage - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(details.severity_breakdown[&Severity::Low], 0);
        assert_eq!(details.type_breakdown["other"], 1);
        assert_eq!(details.complexity_breakdown["simple"], 2);
        assert_eq!(details.top_priority[0].rule, "HEADER_MISSING");
    }

    #[test]
    fn top_priority_is_capped_at_five() {
        let input = analyses(&["EMPTY_LINE_EOF"; 8]);
        let details = summarize(&input).details.unwrap();
        assert_eq!(details.top_priority.len(), 5);
    }

    // --- file status ---

    #[test]
    fn file_status_levels() {
        assert_eq!(file_status(&[], true), FileStatus::Ok);
        assert_eq!(file_status(&[], false), FileStatus::Error);
        assert_eq!(
            file_status(&analyses(&["EMPTY_LINE_EOF"]), false),
            FileStatus::Warning
        );
        assert_eq!(
            file_status(&analyses(&["TOO_MANY_LINES", "EMPTY_LINE_EOF"]), false),
            FileStatus::Error
        );
        assert_eq!(
            file_status(&analyses(&["TOO_MANY_LINES", "HEADER_MISSING"]), false),
            FileStatus::Critical
        );
    }

    const CODES: [&str; 8] = [
        "TOO_LONG_LINE",
        "SPACE_AFTER_KW",
        "INDENT_BRANCH",
        "HEADER_MISSING",
        "TOO_MANY_FUNCS",
        "EMPTY_LINE_EOF",
        "UNKNOWN",
        "VAR_DECL_START_FUNC",
    ];

    proptest! {
        #[test]
        fn groupings_partition_the_input(picks in proptest::collection::vec(0usize..CODES.len(), 0..40)) {
            let codes: Vec<&str> = picks.iter().map(|i| CODES[*i]).collect();
            let input = analyses(&codes);

            let by_category = group_by_category(&input);
            let total: usize = by_category.values().map(Vec::len).sum();
            prop_assert_eq!(total, input.len());
            for (category, members) in &by_category {
                prop_assert!(members.iter().all(|a| &a.coarse_category == category));
            }

            let by_severity = group_by_severity(&input);
            let total: usize = by_severity.values().map(Vec::len).sum();
            prop_assert_eq!(total, input.len());
            for (severity, members) in &by_severity {
                prop_assert!(members.iter().all(|a| a.severity == *severity));
            }
        }

        #[test]
        fn critical_always_sorts_first(picks in proptest::collection::vec(0usize..CODES.len(), 0..40)) {
            let codes: Vec<&str> = picks.iter().map(|i| CODES[*i]).collect();
            let sorted = prioritize(&analyses(&codes));
            let first_other = sorted.iter().position(|a| a.severity != Severity::Critical);
            if let Some(index) = first_other {
                prop_assert!(sorted[index..].iter().all(|a| a.severity != Severity::Critical));
            }
        }
    }
}
