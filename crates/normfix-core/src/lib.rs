//! # normfix-core
//!
//! Core model for classifying norminette violations and rewriting C sources.
//!
//! This crate provides:
//!
//! - [`RuleCode`] and the static rule catalog
//! - [`classify`] turning a [`ViolationRecord`] into an [`Analysis`]
//! - Aggregation helpers ([`prioritize`], [`detect_patterns`], [`summarize`])
//! - [`parse_report`] for captured linter output
//! - [`ProjectReport`] for statistics and advice across files
//! - The [`Pass`] trait and its trigger table ([`PassId::triggers`])
//! - Text utilities shared by passes (lexical mask, layout tracker)
//!
//! ## Example
//!
//! ```
//! use normfix_core::{classify, ViolationRecord};
//!
//! let record = ViolationRecord::new("TOO_LONG_LINE", 12, 81, "line too long (95/80)");
//! let analysis = classify(&record);
//! assert_eq!(analysis.excess(), Some(15));
//! assert!(analysis.auto_fixable);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod catalog;
mod classify;
mod config;
mod pass;
mod project;
mod report;
mod types;

/// Text utilities for pass implementations.
pub mod utils;

pub use aggregate::{
    auto_fixable, detect_patterns, file_status, group_by_category, group_by_severity, prioritize,
    summarize, FileStatus, Pattern, PriorityEntry, Summary, SummaryDetails,
};
pub use catalog::{category_for, profile_for, RuleCode, RuleProfile, FALLBACK_PROFILE, MANUAL_FIX};
pub use classify::{classify, classify_all, extract_context};
pub use config::{BackupConfig, Config, ConfigError, HeaderConfig, DEFAULT_BACKUP_DIR};
pub use pass::{Pass, PassBox, PassContext, PassId, PassOutcome};
pub use project::{
    count_lines_of_code, FileFilter, FileInfo, ProjectReport, ProjectSummary, Recommendation,
};
pub use report::{
    parse_error_line, parse_report, FileReport, LinterStatus, UNKNOWN_CATEGORY, UNKNOWN_RULE,
};
pub use types::{
    Analysis, AnalysisDiagnostic, FixComplexity, Severity, ViolationRecord, CURRENT_VALUE, EXCESS,
    LIMIT,
};
