//! Turns raw violation records into analyses.

use crate::catalog::{profile_for, RuleCode};
use crate::types::{Analysis, ViolationRecord, CURRENT_VALUE, EXCESS, LIMIT};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Write;
use tracing::debug;

static RATIO: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\((\d+)\s*/\s*(\d+)\)").unwrap()
});

/// Classifies one record. Total: unknown codes get the fallback profile.
#[must_use]
pub fn classify(record: &ViolationRecord) -> Analysis {
    let rule = RuleCode::lookup(&record.rule_code);
    if rule.is_none() {
        debug!(rule = %record.rule_code, "unknown rule code, using fallback profile");
    }
    let profile = profile_for(&record.rule_code);
    let extracted_context = rule
        .map(|r| extract_context(r, &record.description))
        .unwrap_or_default();

    let mut fix_suggestion = profile.fix_template.to_string();
    if let (Some(unit), Some(excess)) = (
        rule.and_then(RuleCode::excess_unit),
        extracted_context.get(EXCESS).copied(),
    ) {
        if excess > 0 {
            let _ = write!(fix_suggestion, " (reduce by {excess} {unit})");
        }
    }

    Analysis {
        rule_code: record.rule_code.clone(),
        line: record.line,
        column: record.column,
        description: record.description.clone(),
        coarse_category: record.coarse_category.clone(),
        severity: profile.severity,
        fix_complexity: profile.fix_complexity,
        fix_suggestion,
        auto_fixable: profile.auto_fixable,
        related_rule_codes: rule
            .map(|r| r.related().iter().map(|c| c.as_str().to_string()).collect())
            .unwrap_or_default(),
        extracted_context,
    }
}

/// Classifies every record, preserving order.
#[must_use]
pub fn classify_all(records: &[ViolationRecord]) -> Vec<Analysis> {
    records.iter().map(classify).collect()
}

/// Pulls "(current/limit)" out of the description for rules that carry one.
///
/// Returns an empty map when the rule has no such pair or the description
/// does not contain it.
#[must_use]
pub fn extract_context(rule: RuleCode, description: &str) -> BTreeMap<String, i64> {
    let mut context = BTreeMap::new();
    if rule.excess_unit().is_none() {
        return context;
    }
    let Some(caps) = RATIO.captures(description) else {
        debug!(rule = %rule, "no (current/limit) pair in description");
        return context;
    };
    let (Ok(current), Ok(limit)) = (caps[1].parse::<i64>(), caps[2].parse::<i64>()) else {
        return context;
    };
    context.insert(CURRENT_VALUE.to_string(), current);
    context.insert(LIMIT.to_string(), limit);
    context.insert(EXCESS.to_string(), current - limit);
    context
}
