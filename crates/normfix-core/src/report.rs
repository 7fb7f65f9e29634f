//! Reader for captured norminette output.
//!
//! ```text
//! src/main.c: Error!
//! Error: SPACE_BEFORE_FUNC    (line:   4, col:  21):      space before function name
//! src/util.c: OK!
//! ```

use crate::types::ViolationRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Rule code given to `Error:` lines that do not have the expected shape.
pub const UNKNOWN_RULE: &str = "UNKNOWN";

/// Coarse category of [`UNKNOWN_RULE`] records.
pub const UNKNOWN_CATEGORY: &str = "unknown";

static SECTION: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^(.+?):\s*(OK|Error)!\s*$").unwrap()
});

static ERROR_LINE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^Error:\s+(\w+)\s+\(line:\s*(\d+),\s*col:\s*(\d+)\):\s*(.*)$").unwrap()
});

/// Verdict the linter printed for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinterStatus {
    /// `PATH: OK!`
    Ok,
    /// `PATH: Error!`
    Error,
}

/// One file section of the linter output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// File path as printed. Empty for error lines seen before any header.
    pub path: PathBuf,
    /// The linter's verdict.
    pub status: LinterStatus,
    /// Violations in output order.
    pub violations: Vec<ViolationRecord>,
}

impl FileReport {
    /// Whether the linter accepted the file.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == LinterStatus::Ok
    }
}

/// Parses captured linter output into per-file reports, in output order.
#[must_use]
pub fn parse_report(output: &str) -> Vec<FileReport> {
    let mut reports: Vec<FileReport> = Vec::new();

    for raw in output.lines() {
        let line = raw.trim_end();

        if line.starts_with("Error:") {
            let record = parse_error_line(line);
            if reports.is_empty() {
                reports.push(FileReport {
                    path: PathBuf::new(),
                    status: LinterStatus::Error,
                    violations: Vec::new(),
                });
            }
            if let Some(current) = reports.last_mut() {
                current.violations.push(record);
            }
        } else if let Some(caps) = SECTION.captures(line) {
            let status = if &caps[2] == "OK" {
                LinterStatus::Ok
            } else {
                LinterStatus::Error
            };
            reports.push(FileReport {
                path: PathBuf::from(&caps[1]),
                status,
                violations: Vec::new(),
            });
        }
    }

    debug!(files = reports.len(), "parsed linter output");
    reports
}

/// Parses one `Error:` line. Lines of an unexpected shape become an
/// [`UNKNOWN_RULE`] record in the [`UNKNOWN_CATEGORY`] carrying the whole
/// line.
#[must_use]
pub fn parse_error_line(line: &str) -> ViolationRecord {
    let parsed = ERROR_LINE.captures(line).and_then(|caps| {
        let line_no = caps[2].parse().ok()?;
        let column = caps[3].parse().ok()?;
        Some(ViolationRecord::new(
            &caps[1],
            line_no,
            column,
            caps[4].trim(),
        ))
    });
    parsed.unwrap_or_else(|| {
        debug!(line, "unrecognized error line");
        ViolationRecord::new(UNKNOWN_RULE, 0, 0, line).with_category(UNKNOWN_CATEGORY)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
src/main.c: Error!
Error: SPACE_BEFORE_FUNC    (line:   4, col:  21):\tspace before function name
Error: TOO_LONG_LINE        (line:  12, col:  81):\tline too long (95/80)
src/util.c: OK!
Notice: GLOBAL_VAR_DETECTED  (line:   1, col:   1):\tglobal variable present
";

    #[test]
    fn parses_sections_and_records() {
        let reports = parse_report(SAMPLE);
        assert_eq!(reports.len(), 2);

        let main = &reports[0];
        assert_eq!(main.path, PathBuf::from("src/main.c"));
        assert_eq!(main.status, LinterStatus::Error);
        assert_eq!(main.violations.len(), 2);
        assert_eq!(main.violations[0].rule_code, "SPACE_BEFORE_FUNC");
        assert_eq!(main.violations[0].line, 4);
        assert_eq!(main.violations[0].column, 21);
        assert_eq!(main.violations[0].description, "space before function name");
        assert_eq!(main.violations[0].coarse_category, "spacing");
        assert_eq!(main.violations[1].coarse_category, "line_length");

        assert!(reports[1].is_ok());
        assert!(reports[1].violations.is_empty());
    }

    #[test]
    fn malformed_error_line_becomes_unknown() {
        let record = parse_error_line("Error: something went wrong");
        assert_eq!(record.rule_code, UNKNOWN_RULE);
        assert_eq!(record.line, 0);
        assert_eq!(record.description, "Error: something went wrong");
        assert_eq!(record.coarse_category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn error_before_header_goes_to_anonymous_section() {
        let reports = parse_report("Error: HEADER_MISSING (line: 1, col: 1): missing header\n");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].path, PathBuf::new());
        assert_eq!(reports[0].violations[0].rule_code, "HEADER_MISSING");
    }

    #[test]
    fn empty_output_yields_nothing() {
        assert!(parse_report("").is_empty());
    }
}
