//! Format orchestration: read, run the triggered passes, back up, write.
//!
//! Formatting a file is all-or-nothing. The file is only written after the
//! whole pipeline has run and, when backups are enabled, after a backup copy
//! was made.

use crate::backup::BackupStore;
use crate::error::FormatError;
use normfix_core::{Analysis, Config, PassContext};
use normfix_passes::{triggered_passes, Pipeline, PipelineOutcome};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

/// Message for files with no auto-fixable analysis.
pub const NOTHING_TO_FIX: &str = "No auto-fixable errors found";

/// Message for files the pipeline left unchanged.
pub const NO_CHANGES: &str = "No changes needed";

/// Outcome of formatting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatResult {
    /// Whether the file was processed without error.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Number of edits written.
    pub changes_made: usize,
    /// Text before formatting (empty if the file could not be read).
    pub original_text: String,
    /// Text after formatting.
    pub final_text: String,
}

impl FormatResult {
    fn failure(err: &FormatError, original_text: String) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            changes_made: 0,
            final_text: original_text.clone(),
            original_text,
        }
    }

    fn unchanged(message: &str, text: String) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            changes_made: 0,
            final_text: text.clone(),
            original_text: text,
        }
    }
}

/// Applies the auto-fix pipeline to files on disk.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    config: Config,
}

impl Formatter {
    /// A formatter using `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Enables or disables backups.
    #[must_use]
    pub fn with_backups(mut self, enabled: bool) -> Self {
        self.config.backup.enabled = enabled;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The backup store for this configuration.
    #[must_use]
    pub fn backups(&self) -> BackupStore {
        BackupStore::from_config(&self.config.backup)
    }

    fn context(&self, path: &Path) -> PassContext {
        let filename = path
            .file_name()
            .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy())
            .into_owned();
        PassContext::new(filename).with_header(&self.config.header)
    }

    /// Runs the passes triggered by `analyses` over `text` without any I/O.
    #[must_use]
    pub fn format_text(&self, path: &Path, text: &str, analyses: &[Analysis]) -> PipelineOutcome {
        let pipeline = Pipeline::for_analyses(analyses);
        debug!(file = %path.display(), passes = ?pipeline.ids(), "running pipeline");
        pipeline.run(&self.context(path), text)
    }

    /// The text `format_file` would write, without writing or backing up.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Read`] if the file cannot be read.
    pub fn preview(&self, path: &Path, analyses: &[Analysis]) -> Result<String, FormatError> {
        let original = read(path)?;
        Ok(self.format_text(path, &original, analyses).text)
    }

    /// Formats one file in place.
    ///
    /// Never panics and never returns an error: failures are reported in
    /// the result and leave the file untouched.
    #[must_use]
    pub fn format_file(&self, path: &Path, analyses: &[Analysis]) -> FormatResult {
        let original = match read(path) {
            Ok(text) => text,
            Err(err) => {
                error!(file = %path.display(), error = %err, "format failed");
                return FormatResult::failure(&err, String::new());
            }
        };

        if triggered_passes(analyses).is_empty() {
            debug!(file = %path.display(), "no pass triggered");
            return FormatResult::unchanged(NOTHING_TO_FIX, original);
        }

        let outcome = self.format_text(path, &original, analyses);
        if outcome.changes == 0 || outcome.text == original {
            info!(file = %path.display(), "no changes needed");
            return FormatResult::unchanged(NO_CHANGES, original);
        }

        if let Err(err) = self.write_with_backup(path, &outcome.text) {
            error!(file = %path.display(), error = %err, "format failed");
            return FormatResult::failure(&err, original);
        }

        info!(file = %path.display(), changes = outcome.changes, "formatted");
        FormatResult {
            success: true,
            message: format!("Successfully formatted file with {} changes", outcome.changes),
            changes_made: outcome.changes,
            original_text: original,
            final_text: outcome.text,
        }
    }

    fn write_with_backup(&self, path: &Path, text: &str) -> Result<(), FormatError> {
        if self.config.backup.enabled {
            self.backups().create(path)?;
        }
        replace(path, text).map_err(|source| FormatError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Formats several files, one result per distinct path.
    ///
    /// Analyses given for the same path are merged, so each file is read and
    /// written once.
    #[must_use]
    pub fn format_many<P, I>(&self, jobs: I) -> BTreeMap<PathBuf, FormatResult>
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = (P, Vec<Analysis>)>,
    {
        let mut merged: BTreeMap<PathBuf, Vec<Analysis>> = BTreeMap::new();
        for (path, analyses) in jobs {
            merged.entry(path.into()).or_default().extend(analyses);
        }

        merged
            .into_iter()
            .map(|(path, analyses)| {
                info!(file = %path.display(), "formatting file");
                let result = self.format_file(&path, &analyses);
                (path, result)
            })
            .collect()
    }

    /// Restores `path` from its most recent backup.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::NoBackup`] or [`FormatError::Restore`].
    pub fn restore(&self, path: &Path) -> Result<PathBuf, FormatError> {
        self.backups().restore(path)
    }
}

/// Writes `text` to a sibling temp file and renames it over `path`, so the
/// file is either fully rewritten or left as it was.
fn replace(path: &Path, text: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(text.as_bytes())?;
    staged.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(path) {
        staged.as_file().set_permissions(metadata.permissions())?;
    }
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn read(path: &Path) -> Result<String, FormatError> {
    fs::read_to_string(path).map_err(|source| FormatError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use normfix_core::{classify, ViolationRecord, DEFAULT_BACKUP_DIR};

    fn analyses(codes: &[&str]) -> Vec<Analysis> {
        codes
            .iter()
            .map(|code| classify(&ViolationRecord::new(*code, 1, 1, "x")))
            .collect()
    }

    fn write_file(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_format_writes_and_backs_up() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "main.c", "int f(void)\n{\n\tif(x)\n\t\treturn (1);\n}\n");

        let result = Formatter::default().format_file(&path, &analyses(&["SPACE_AFTER_KW"]));
        assert!(result.success);
        assert_eq!(result.changes_made, 1);
        assert_eq!(result.message, "Successfully formatted file with 1 changes");
        assert_eq!(fs::read_to_string(&path).unwrap(), result.final_text);
        assert!(result.final_text.contains("if (x)"));
        assert_eq!(Formatter::default().backups().list(&path).len(), 1);
    }

    #[test]
    fn test_nothing_fixable_short_circuits() {
        let tmp = tempfile::tempdir().unwrap();
        let text = "int  f (void);\n";
        let path = write_file(tmp.path(), "a.c", text);

        let result = Formatter::default().format_file(&path, &analyses(&["TOO_MANY_FUNCS"]));
        assert!(result.success);
        assert_eq!(result.message, NOTHING_TO_FIX);
        assert_eq!(result.changes_made, 0);
        assert_eq!(result.final_text, text);
        assert!(!tmp.path().join(DEFAULT_BACKUP_DIR).exists());
    }

    #[test]
    fn test_fixable_code_without_pass_short_circuits() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "a.c", "/* bad header 42 */\nint x;\n");
        let found = analyses(&["INVALID_HEADER"]);
        assert!(found[0].auto_fixable);

        let result = Formatter::default().format_file(&path, &found);
        assert!(result.success);
        assert_eq!(result.message, NOTHING_TO_FIX);
        assert!(!tmp.path().join(DEFAULT_BACKUP_DIR).exists());
    }

    #[test]
    fn test_clean_file_not_written() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "a.c", "int f(void);\n");
        let result = Formatter::default().format_file(&path, &analyses(&["SPACE_BEFORE_FUNC"]));
        assert!(result.success);
        assert_eq!(result.message, NO_CHANGES);
        assert!(!tmp.path().join(DEFAULT_BACKUP_DIR).exists());
    }

    #[test]
    fn test_missing_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let result = Formatter::default()
            .format_file(&tmp.path().join("missing.c"), &analyses(&["SPACE_AFTER_KW"]));
        assert!(!result.success);
        assert!(result.message.starts_with("Failed to read file"));
    }

    #[test]
    fn test_backup_failure_leaves_file_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let text = "if(x)\n";
        let path = write_file(tmp.path(), "a.c", text);
        // A regular file where the backup directory should be.
        fs::write(tmp.path().join(DEFAULT_BACKUP_DIR), "").unwrap();

        let result = Formatter::default().format_file(&path, &analyses(&["SPACE_AFTER_KW"]));
        assert!(!result.success);
        assert!(result.message.starts_with("Failed to create backup"));
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
    }

    #[test]
    fn test_write_without_backup_leaves_no_stray_files() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "a.c", "if(x)\n");
        let result = Formatter::default()
            .with_backups(false)
            .format_file(&path, &analyses(&["SPACE_AFTER_KW"]));
        assert!(result.success);
        assert_eq!(fs::read_to_string(&path).unwrap(), "if (x)\n");

        let entries: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("a.c")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "a.c", "if(x)\n");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        replace(&path, "if (x)\n").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn test_preview_does_not_write() {
        let tmp = tempfile::tempdir().unwrap();
        let text = "x = 1; // one\n";
        let path = write_file(tmp.path(), "a.c", text);
        let preview = Formatter::default()
            .preview(&path, &analyses(&["WRONG_SCOPE_COMMENT"]))
            .unwrap();
        assert_eq!(preview, "x = 1; /* one */\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
        assert!(!tmp.path().join(DEFAULT_BACKUP_DIR).exists());
    }

    #[test]
    fn test_format_many_dedups_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "a.c", "if(x)\ny; // c\n");
        let formatter = Formatter::default().with_backups(false);
        let results = formatter.format_many(vec![
            (path.clone(), analyses(&["SPACE_AFTER_KW"])),
            (path.clone(), analyses(&["WRONG_SCOPE_COMMENT"])),
        ]);
        assert_eq!(results.len(), 1);
        let result = &results[&path];
        assert_eq!(result.changes_made, 2);
        assert_eq!(result.final_text, "if (x)\ny; /* c */\n");
    }

    #[test]
    fn test_restore_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let text = "if(x)\n";
        let path = write_file(tmp.path(), "a.c", text);
        let formatter = Formatter::default();
        assert!(formatter.format_file(&path, &analyses(&["SPACE_AFTER_KW"])).success);
        assert_ne!(fs::read_to_string(&path).unwrap(), text);

        formatter.restore(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
    }
}
