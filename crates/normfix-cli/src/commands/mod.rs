//! Subcommand implementations.

pub mod check;
pub mod format;
pub mod init;
pub mod list_rules;
pub mod output;
pub mod preview;
pub mod restore;

use anyhow::{Context, Result};
use normfix::{classify_all, parse_report, Analysis, FileReport};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Reads captured linter output from `path`, or stdin when it is `-`.
pub fn read_report(path: &Path) -> Result<Vec<FileReport>> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read report from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report: {}", path.display()))?
    };
    let reports = parse_report(&text);
    tracing::debug!(files = reports.len(), "report loaded");
    Ok(reports)
}

/// Classified violations of one reported file.
pub struct FileAnalyses {
    /// File path as printed by the linter.
    pub path: PathBuf,
    /// Whether the linter accepted the file.
    pub linter_ok: bool,
    /// One analysis per violation, in report order.
    pub analyses: Vec<Analysis>,
}

/// Classifies every violation of every report.
#[must_use]
pub fn analyze(reports: &[FileReport]) -> Vec<FileAnalyses> {
    reports
        .iter()
        .map(|report| FileAnalyses {
            path: report.path.clone(),
            linter_ok: report.is_ok(),
            analyses: classify_all(&report.violations),
        })
        .collect()
}
