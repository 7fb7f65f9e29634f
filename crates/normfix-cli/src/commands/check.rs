//! Check command implementation.

use anyhow::Result;
use normfix::{FileFilter, FileStatus, ProjectReport};
use std::path::Path;

use super::output::CheckedFile;
use crate::OutputFormat;

/// Runs the check command. The filter narrows what is printed; the project
/// section and the exit code always cover every reported file.
pub fn run(report: &Path, format: OutputFormat, filter: &FileFilter) -> Result<()> {
    let reports = super::read_report(report)?;
    let files: Vec<CheckedFile> = super::analyze(&reports)
        .into_iter()
        .map(CheckedFile::load)
        .collect();
    let project: ProjectReport = files.iter().map(|f| f.info.clone()).collect();

    let shown: Vec<&CheckedFile> = files.iter().filter(|f| filter.matches(&f.info)).collect();
    tracing::info!(
        "Classified {} file(s), showing {}",
        files.len(),
        shown.len()
    );

    super::output::print(&shown, &project, format)?;

    if files.iter().any(|f| f.info.status != FileStatus::Ok) {
        std::process::exit(1);
    }

    Ok(())
}
