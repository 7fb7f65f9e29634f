//! Project-wide view over the files of one linter run.
//!
//! [`ProjectReport`] collects one [`FileInfo`] per file and answers the
//! questions asked across files: how compliant the project is, which files
//! need the most work, where the quick wins are.

use crate::aggregate::{file_status, FileStatus};
use crate::types::{Analysis, Severity};
use crate::utils::{mask_lines, FileText};
use glob::{MatchOptions, Pattern};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Score weight per severity when ranking problematic files.
const SEVERITY_WEIGHTS: [(Severity, f64); 4] = [
    (Severity::Critical, 10.0),
    (Severity::High, 5.0),
    (Severity::Medium, 2.0),
    (Severity::Low, 1.0),
];

/// Score weight of errors per line of code.
const DENSITY_WEIGHT: f64 = 50.0;

/// Length of [`ProjectSummary::most_common_errors`].
const MOST_COMMON_LIMIT: usize = 10;

/// Lines holding something other than whitespace and comments.
#[must_use]
pub fn count_lines_of_code(text: &str) -> usize {
    mask_lines(&FileText::split(text).lines)
        .iter()
        .filter(|line| line.has_code())
        .count()
}

/// Per-file statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    /// Path as reported.
    pub path: PathBuf,
    /// Final path component.
    pub filename: String,
    /// Derived status.
    pub status: FileStatus,
    /// Number of analyses.
    pub error_count: usize,
    /// Number of auto-fixable analyses.
    pub auto_fixable_count: usize,
    /// Count per severity; every severity is present.
    pub severity_counts: BTreeMap<Severity, usize>,
    /// Coarse categories that occur in the file.
    pub error_types: BTreeSet<String>,
    /// Non-blank, non-comment lines, 0 when the source was not available.
    pub lines_of_code: usize,
}

impl FileInfo {
    /// Builds the statistics of one file.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        linter_ok: bool,
        analyses: &[Analysis],
        lines_of_code: usize,
    ) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy())
            .into_owned();
        let mut severity_counts: BTreeMap<Severity, usize> =
            Severity::ALL.into_iter().map(|s| (s, 0)).collect();
        for analysis in analyses {
            *severity_counts.entry(analysis.severity).or_default() += 1;
        }
        Self {
            filename,
            status: file_status(analyses, linter_ok),
            error_count: analyses.len(),
            auto_fixable_count: analyses.iter().filter(|a| a.auto_fixable).count(),
            severity_counts,
            error_types: analyses.iter().map(|a| a.coarse_category.clone()).collect(),
            lines_of_code,
            path,
        }
    }

    /// Number of analyses with `severity`.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.severity_counts.get(&severity).copied().unwrap_or(0)
    }

    /// Severity-weighted error count plus an error density bonus.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn problem_score(&self) -> f64 {
        let weighted: f64 = SEVERITY_WEIGHTS
            .iter()
            .map(|(severity, weight)| self.count(*severity) as f64 * weight)
            .sum();
        if self.lines_of_code == 0 {
            return weighted;
        }
        weighted + self.error_count as f64 / self.lines_of_code as f64 * DENSITY_WEIGHT
    }

    /// Auto-fixable share times the auto-fixable count. Higher is easier.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fix_score(&self) -> f64 {
        if self.error_count == 0 {
            return 0.0;
        }
        let ratio = self.auto_fixable_count as f64 / self.error_count as f64;
        ratio * self.auto_fixable_count as f64
    }
}

/// Criteria for [`ProjectReport::filter`]. Unset criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    status: Option<FileStatus>,
    error_type: Option<String>,
    min_errors: Option<usize>,
    max_errors: Option<usize>,
    auto_fixable_only: bool,
    filename: Option<Pattern>,
}

impl FileFilter {
    /// A filter matching every file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only files with this status.
    #[must_use]
    pub fn status(mut self, status: FileStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Only files with at least one analysis in this coarse category.
    #[must_use]
    pub fn error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    /// Only files with at least `min` analyses.
    #[must_use]
    pub fn min_errors(mut self, min: usize) -> Self {
        self.min_errors = Some(min);
        self
    }

    /// Only files with at most `max` analyses.
    #[must_use]
    pub fn max_errors(mut self, max: usize) -> Self {
        self.max_errors = Some(max);
        self
    }

    /// Only files with something auto-fixable.
    #[must_use]
    pub fn auto_fixable_only(mut self) -> Self {
        self.auto_fixable_only = true;
        self
    }

    /// Only files whose name matches a case-insensitive glob.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid glob.
    pub fn filename(mut self, pattern: &str) -> Result<Self, glob::PatternError> {
        self.filename = Some(Pattern::new(pattern)?);
        Ok(self)
    }

    /// Whether `file` meets every criterion.
    #[must_use]
    pub fn matches(&self, file: &FileInfo) -> bool {
        let options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::default()
        };
        self.status.map_or(true, |s| file.status == s)
            && self
                .error_type
                .as_ref()
                .map_or(true, |t| file.error_types.contains(t))
            && self.min_errors.map_or(true, |min| file.error_count >= min)
            && self.max_errors.map_or(true, |max| file.error_count <= max)
            && (!self.auto_fixable_only || file.auto_fixable_count > 0)
            && self
                .filename
                .as_ref()
                .map_or(true, |p| p.matches_with(&file.filename, options))
    }
}

/// Project-wide totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    /// Number of files.
    pub total_files: usize,
    /// Files with status OK.
    pub ok_files: usize,
    /// Files with status Warning.
    pub warning_files: usize,
    /// Files with status Error.
    pub error_files: usize,
    /// Files with status Critical.
    pub critical_files: usize,
    /// Analyses across all files.
    pub total_errors: usize,
    /// Auto-fixable analyses across all files.
    pub auto_fixable_errors: usize,
    /// Lines of code across all files.
    pub total_lines_of_code: usize,
    /// Share of OK files, 0 to 100. 0 for an empty project.
    pub success_rate: f64,
    /// Up to ten coarse categories with the number of files they occur in,
    /// most widespread first.
    pub most_common_errors: Vec<(String, usize)>,
    /// Number of files each coarse category occurs in.
    pub error_distribution: BTreeMap<String, usize>,
    /// Analyses per severity; every severity is present.
    pub severity_distribution: BTreeMap<Severity, usize>,
}

impl ProjectSummary {
    /// Share of auto-fixable analyses, 0 to 100.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn auto_fixable_percentage(&self) -> f64 {
        if self.total_errors == 0 {
            return 0.0;
        }
        self.auto_fixable_errors as f64 / self.total_errors as f64 * 100.0
    }

    /// Mean analyses per file.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_errors_per_file(&self) -> f64 {
        if self.total_files == 0 {
            return 0.0;
        }
        self.total_errors as f64 / self.total_files as f64
    }

    /// Analyses per line of code.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn error_density(&self) -> f64 {
        if self.total_lines_of_code == 0 {
            return 0.0;
        }
        self.total_errors as f64 / self.total_lines_of_code as f64
    }
}

/// Advice derived from a [`ProjectReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// Under half of the files pass.
    LowCompliance,
    /// Under 80% of the files pass.
    NeedsImprovement,
    /// At least 80% of the files pass.
    GoodCompliance,
    /// Some analyses can be fixed automatically.
    AutoFixable {
        /// Auto-fixable analyses.
        count: usize,
        /// Their share of all analyses.
        percentage: f64,
    },
    /// Some files have critical violations.
    CriticalFiles {
        /// Files with status Critical.
        count: usize,
    },
    /// The most widespread coarse category.
    MostCommonError {
        /// Coarse category.
        error_type: String,
        /// Files it occurs in.
        files: usize,
    },
    /// Files that need the most work.
    ProblematicFiles {
        /// File names.
        files: Vec<String>,
    },
    /// Files where auto-fixing removes most violations.
    QuickWins {
        /// File names.
        files: Vec<String>,
    },
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LowCompliance => write!(
                f,
                "Project has low norminette compliance (<50%). Consider running auto-fix on all files."
            ),
            Self::NeedsImprovement => write!(
                f,
                "Project needs improvement. Focus on files with the most errors first."
            ),
            Self::GoodCompliance => write!(
                f,
                "Good norminette compliance! Focus on remaining critical errors."
            ),
            Self::AutoFixable { count, percentage } => {
                write!(f, "{count} errors ({percentage:.1}%) can be auto-fixed.")
            }
            Self::CriticalFiles { count } => write!(
                f,
                "{count} files have critical errors. Address these immediately."
            ),
            Self::MostCommonError { error_type, files } => write!(
                f,
                "Most common error: {error_type} (in {files} files). Consider project-wide fix."
            ),
            Self::ProblematicFiles { files } => {
                write!(f, "Focus on these problematic files: {}", files.join(", "))
            }
            Self::QuickWins { files } => {
                write!(f, "Quick wins available in: {}", files.join(", "))
            }
        }
    }
}

/// Statistics for every file of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectReport {
    files: Vec<FileInfo>,
}

impl ProjectReport {
    /// An empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `file`, replacing an earlier entry with the same path.
    pub fn add(&mut self, file: FileInfo) {
        match self.files.iter_mut().find(|f| f.path == file.path) {
            Some(existing) => *existing = file,
            None => self.files.push(file),
        }
    }

    /// Files in insertion order.
    #[must_use]
    pub fn files(&self) -> &[FileInfo] {
        &self.files
    }

    /// The entry for `path`.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&FileInfo> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Files meeting `filter`, in insertion order.
    #[must_use]
    pub fn filter(&self, filter: &FileFilter) -> Vec<&FileInfo> {
        self.files.iter().filter(|f| filter.matches(f)).collect()
    }

    /// Files grouped by status. Every status is present.
    #[must_use]
    pub fn by_status(&self) -> BTreeMap<FileStatus, Vec<&FileInfo>> {
        let mut groups: BTreeMap<FileStatus, Vec<&FileInfo>> = [
            FileStatus::Ok,
            FileStatus::Warning,
            FileStatus::Error,
            FileStatus::Critical,
        ]
        .into_iter()
        .map(|s| (s, Vec::new()))
        .collect();
        for file in &self.files {
            groups.entry(file.status).or_default().push(file);
        }
        groups
    }

    /// Files grouped by the coarse categories they contain. A file appears
    /// under each of its categories.
    #[must_use]
    pub fn by_error_type(&self) -> BTreeMap<String, Vec<&FileInfo>> {
        let mut groups: BTreeMap<String, Vec<&FileInfo>> = BTreeMap::new();
        for file in &self.files {
            for error_type in &file.error_types {
                groups.entry(error_type.clone()).or_default().push(file);
            }
        }
        groups
    }

    /// Up to `limit` files by descending [`FileInfo::problem_score`]. Ties
    /// keep insertion order.
    #[must_use]
    pub fn most_problematic(&self, limit: usize) -> Vec<&FileInfo> {
        let mut ranked: Vec<&FileInfo> = self.files.iter().collect();
        ranked.sort_by(|a, b| b.problem_score().total_cmp(&a.problem_score()));
        ranked.truncate(limit);
        ranked
    }

    /// Up to `limit` files with something auto-fixable, by descending
    /// [`FileInfo::fix_score`]. Ties keep insertion order.
    #[must_use]
    pub fn easiest_fixes(&self, limit: usize) -> Vec<&FileInfo> {
        let mut ranked: Vec<&FileInfo> = self
            .files
            .iter()
            .filter(|f| f.auto_fixable_count > 0)
            .collect();
        ranked.sort_by(|a, b| b.fix_score().total_cmp(&a.fix_score()));
        ranked.truncate(limit);
        ranked
    }

    /// Files whose name, path or one of whose categories contains `query`,
    /// ignoring case.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&FileInfo> {
        let query = query.to_lowercase();
        self.files
            .iter()
            .filter(|f| {
                f.filename.to_lowercase().contains(&query)
                    || f.path.to_string_lossy().to_lowercase().contains(&query)
                    || f.error_types.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Project-wide totals.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn summary(&self) -> ProjectSummary {
        let by_status = self.by_status();
        let count = |status: FileStatus| by_status.get(&status).map_or(0, Vec::len);

        let error_distribution: BTreeMap<String, usize> = self
            .by_error_type()
            .into_iter()
            .map(|(error_type, files)| (error_type, files.len()))
            .collect();
        let mut most_common_errors: Vec<(String, usize)> = error_distribution
            .iter()
            .map(|(error_type, files)| (error_type.clone(), *files))
            .collect();
        most_common_errors.sort_by(|a, b| b.1.cmp(&a.1));
        most_common_errors.truncate(MOST_COMMON_LIMIT);

        let severity_distribution = Severity::ALL
            .into_iter()
            .map(|s| (s, self.files.iter().map(|f| f.count(s)).sum::<usize>()))
            .collect();

        let total_files = self.files.len();
        let success_rate = if total_files == 0 {
            0.0
        } else {
            count(FileStatus::Ok) as f64 / total_files as f64 * 100.0
        };

        ProjectSummary {
            total_files,
            ok_files: count(FileStatus::Ok),
            warning_files: count(FileStatus::Warning),
            error_files: count(FileStatus::Error),
            critical_files: count(FileStatus::Critical),
            total_errors: self.files.iter().map(|f| f.error_count).sum(),
            auto_fixable_errors: self.files.iter().map(|f| f.auto_fixable_count).sum(),
            total_lines_of_code: self.files.iter().map(|f| f.lines_of_code).sum(),
            success_rate,
            most_common_errors,
            error_distribution,
            severity_distribution,
        }
    }

    /// Advice in a fixed order: compliance level, auto-fixable share,
    /// critical files, most common category, problematic files, quick wins.
    /// Files with status OK are never listed. Empty for an empty report.
    #[must_use]
    pub fn recommendations(&self) -> Vec<Recommendation> {
        if self.files.is_empty() {
            return Vec::new();
        }
        let summary = self.summary();
        let mut advice = Vec::new();

        advice.push(if summary.success_rate < 50.0 {
            Recommendation::LowCompliance
        } else if summary.success_rate < 80.0 {
            Recommendation::NeedsImprovement
        } else {
            Recommendation::GoodCompliance
        });
        if summary.auto_fixable_errors > 0 {
            advice.push(Recommendation::AutoFixable {
                count: summary.auto_fixable_errors,
                percentage: summary.auto_fixable_percentage(),
            });
        }
        if summary.critical_files > 0 {
            advice.push(Recommendation::CriticalFiles {
                count: summary.critical_files,
            });
        }
        if let Some((error_type, files)) = summary.most_common_errors.first() {
            advice.push(Recommendation::MostCommonError {
                error_type: error_type.clone(),
                files: *files,
            });
        }
        let names = |files: Vec<&FileInfo>| -> Vec<String> {
            files.into_iter().map(|f| f.filename.clone()).collect()
        };
        let problematic: Vec<&FileInfo> = self
            .most_problematic(3)
            .into_iter()
            .filter(|f| f.status != FileStatus::Ok)
            .collect();
        if !problematic.is_empty() {
            advice.push(Recommendation::ProblematicFiles {
                files: names(problematic),
            });
        }
        let quick = names(self.easiest_fixes(3));
        if !quick.is_empty() {
            advice.push(Recommendation::QuickWins { files: quick });
        }
        advice
    }
}

impl FromIterator<FileInfo> for ProjectReport {
    fn from_iter<I: IntoIterator<Item = FileInfo>>(iter: I) -> Self {
        let mut report = Self::new();
        for file in iter {
            report.add(file);
        }
        report
    }
}
