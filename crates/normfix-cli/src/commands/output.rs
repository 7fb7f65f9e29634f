//! Shared output formatting for check results.

use anyhow::Result;
use miette::{NamedSource, Report};
use normfix::{
    count_lines_of_code, prioritize, summarize, Analysis, AnalysisDiagnostic, FileInfo,
    FileStatus, ProjectReport, ProjectSummary, Summary,
};
use serde::Serialize;
use std::path::Path;

use super::FileAnalyses;
use crate::OutputFormat;

/// Files listed under "most problematic" and "easiest fixes".
const RANKING_LIMIT: usize = 10;

/// Files listed under "most problematic" in text output.
const TEXT_RANKING_LIMIT: usize = 5;

/// A classified file together with its source, when it could be read.
pub struct CheckedFile {
    /// Classified violations.
    pub file: FileAnalyses,
    /// Current file contents.
    pub source: Option<String>,
    /// Per-file statistics.
    pub info: FileInfo,
}

impl CheckedFile {
    /// Reads the source of `file` and computes its statistics.
    pub fn load(file: FileAnalyses) -> Self {
        // Snippets and line counts need the source; both degrade when it is gone.
        let source = std::fs::read_to_string(&file.path).ok();
        let lines_of_code = source.as_deref().map_or(0, count_lines_of_code);
        let info = FileInfo::new(
            file.path.clone(),
            file.linter_ok,
            &file.analyses,
            lines_of_code,
        );
        Self { file, source, info }
    }
}

#[derive(Serialize)]
struct FileEntry<'a> {
    path: &'a Path,
    status: FileStatus,
    lines_of_code: usize,
    analyses: Vec<Analysis>,
    summary: Summary,
}

#[derive(Serialize)]
struct ProblemEntry<'a> {
    filename: &'a str,
    error_count: usize,
    status: FileStatus,
}

#[derive(Serialize)]
struct FixEntry<'a> {
    filename: &'a str,
    auto_fixable_count: usize,
    total_errors: usize,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    files: Vec<FileEntry<'a>>,
    summary: Summary,
    project: ProjectSummary,
    recommendations: Vec<String>,
    most_problematic_files: Vec<ProblemEntry<'a>>,
    easiest_fixes: Vec<FixEntry<'a>>,
}

/// Prints check results in the specified format.
pub fn print(files: &[&CheckedFile], project: &ProjectReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(files, project),
        OutputFormat::Json => return print_json(files, project),
        OutputFormat::Compact => print_compact(files),
    }
    Ok(())
}

fn status_color(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Ok => "\x1b[32m",
        FileStatus::Warning => "\x1b[33m",
        FileStatus::Error | FileStatus::Critical => "\x1b[31m",
    }
}

fn print_text(files: &[&CheckedFile], project: &ProjectReport) {
    let mut worst = FileStatus::Ok;
    for checked in files {
        let file = &checked.file;
        let status = checked.info.status;
        worst = worst.max(status);
        println!(
            "{}{}: {status}\x1b[0m",
            status_color(status),
            file.path.display()
        );

        for analysis in prioritize(&file.analyses) {
            match &checked.source {
                Some(text) => {
                    let report = Report::new(AnalysisDiagnostic::new(&analysis, text))
                        .with_source_code(NamedSource::new(
                            file.path.display().to_string(),
                            text.clone(),
                        ));
                    println!("{report:?}");
                }
                None => print!("{}", analysis.format()),
            }
        }
        if !file.analyses.is_empty() {
            println!();
        }
    }

    let summary = summarize(&shown_analyses(files));
    let fixable = summary.details.as_ref().map_or(0, |d| d.auto_fixable_count);
    println!(
        "{}Found {} violation(s) in {} file(s), {} auto-fixable\x1b[0m",
        status_color(worst),
        summary.total_errors,
        files.len(),
        fixable
    );
    if let Some(details) = &summary.details {
        if !details.detected_patterns.is_empty() {
            println!("Patterns: {}", details.detected_patterns.join(", "));
        }
    }

    println!();
    for line in project_lines(project) {
        println!("{line}");
    }
}

/// The project section of text output.
fn project_lines(project: &ProjectReport) -> Vec<String> {
    let summary = project.summary();
    let mut lines = vec![format!(
        "Project: {} file(s), {} ok, {} warning, {} error, {} critical ({:.1}% passing)",
        summary.total_files,
        summary.ok_files,
        summary.warning_files,
        summary.error_files,
        summary.critical_files,
        summary.success_rate
    )];

    let problematic: Vec<&FileInfo> = project
        .most_problematic(TEXT_RANKING_LIMIT)
        .into_iter()
        .filter(|f| f.status != FileStatus::Ok)
        .collect();
    if !problematic.is_empty() {
        lines.push("Most problematic:".to_string());
        for file in problematic {
            lines.push(format!(
                "  {:<24} {:<8} {} violation(s)",
                file.filename,
                file.status.to_string(),
                file.error_count
            ));
        }
    }

    let advice = project.recommendations();
    if !advice.is_empty() {
        lines.push("Recommendations:".to_string());
        lines.extend(advice.iter().map(|r| format!("  - {r}")));
    }
    lines
}

fn shown_analyses(files: &[&CheckedFile]) -> Vec<Analysis> {
    files
        .iter()
        .flat_map(|f| f.file.analyses.iter().cloned())
        .collect()
}

fn check_output<'a>(files: &[&'a CheckedFile], project: &'a ProjectReport) -> CheckOutput<'a> {
    CheckOutput {
        files: files
            .iter()
            .map(|checked| FileEntry {
                path: &checked.file.path,
                status: checked.info.status,
                lines_of_code: checked.info.lines_of_code,
                analyses: prioritize(&checked.file.analyses),
                summary: summarize(&checked.file.analyses),
            })
            .collect(),
        summary: summarize(&shown_analyses(files)),
        project: project.summary(),
        recommendations: project
            .recommendations()
            .iter()
            .map(ToString::to_string)
            .collect(),
        most_problematic_files: project
            .most_problematic(RANKING_LIMIT)
            .into_iter()
            .map(|f| ProblemEntry {
                filename: &f.filename,
                error_count: f.error_count,
                status: f.status,
            })
            .collect(),
        easiest_fixes: project
            .easiest_fixes(RANKING_LIMIT)
            .into_iter()
            .map(|f| FixEntry {
                filename: &f.filename,
                auto_fixable_count: f.auto_fixable_count,
                total_errors: f.error_count,
            })
            .collect(),
    }
}

fn print_json(files: &[&CheckedFile], project: &ProjectReport) -> Result<()> {
    let json = serde_json::to_string_pretty(&check_output(files, project))?;
    println!("{json}");
    Ok(())
}

fn print_compact(files: &[&CheckedFile]) {
    for checked in files {
        for analysis in &checked.file.analyses {
            println!("{}:{analysis}", checked.file.path.display());
        }
    }
}
