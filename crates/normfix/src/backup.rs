//! Timestamped copies of files taken before they are rewritten.
//!
//! A backup of `dir/main.c` made at 2024-03-05 14:07:09 is stored as
//! `dir/.norminette_backups/main.c.20240305_140709.backup`. Backups are never
//! pruned. Two backups of the same file within one second share a name and
//! the later one wins.

use crate::error::FormatError;
use chrono::Local;
use glob::Pattern;
use normfix_core::BackupConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const SUFFIX: &str = "backup";

/// Locates, creates and restores backups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupStore {
    dir: PathBuf,
}

impl BackupStore {
    /// A store rooted at `dir`. Relative directories are resolved against
    /// the directory of each backed-up file.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// A store using the configured directory.
    #[must_use]
    pub fn from_config(config: &BackupConfig) -> Self {
        Self::new(config.dir.clone())
    }

    /// Backup directory used for `file`.
    #[must_use]
    pub fn dir_for(&self, file: &Path) -> PathBuf {
        if self.dir.is_absolute() {
            return self.dir.clone();
        }
        match file.parent() {
            Some(parent) => parent.join(&self.dir),
            None => self.dir.clone(),
        }
    }

    /// Copies `file` into the backup directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Backup`] if the directory cannot be created or
    /// the copy fails.
    pub fn create(&self, file: &Path) -> Result<PathBuf, FormatError> {
        let to_error = |source| FormatError::Backup {
            path: file.to_path_buf(),
            source,
        };
        let dir = self.dir_for(file);
        fs::create_dir_all(&dir).map_err(to_error)?;

        let stamp = Local::now().format(STAMP_FORMAT);
        let target = dir.join(format!("{}.{stamp}.{SUFFIX}", file_name(file)));
        fs::copy(file, &target).map_err(to_error)?;
        info!(backup = %target.display(), "created backup");
        Ok(target)
    }

    /// All backups of `file`, in no particular order.
    #[must_use]
    pub fn list(&self, file: &Path) -> Vec<PathBuf> {
        let dir = self.dir_for(file);
        let pattern = format!(
            "{}/{}.{}.{SUFFIX}",
            Pattern::escape(&dir.to_string_lossy()),
            Pattern::escape(&file_name(file)),
            stamp_pattern()
        );
        match glob::glob(&pattern) {
            Ok(paths) => paths
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(e) => {
                        warn!(error = %e, "skipping unreadable backup entry");
                        None
                    }
                })
                .collect(),
            Err(e) => {
                warn!(pattern, error = %e, "invalid backup pattern");
                Vec::new()
            }
        }
    }

    /// The most recently modified backup of `file`.
    #[must_use]
    pub fn latest(&self, file: &Path) -> Option<PathBuf> {
        self.list(file).into_iter().max_by_key(|path| {
            let modified = fs::metadata(path)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path.clone())
        })
    }

    /// Overwrites `file` with its most recent backup.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::NoBackup`] when no backup exists, or
    /// [`FormatError::Restore`] when the copy fails.
    pub fn restore(&self, file: &Path) -> Result<PathBuf, FormatError> {
        let Some(backup) = self.latest(file) else {
            return Err(FormatError::NoBackup {
                path: file.to_path_buf(),
            });
        };
        debug!(backup = %backup.display(), "restoring");
        fs::copy(&backup, file).map_err(|source| FormatError::Restore {
            path: file.to_path_buf(),
            backup: backup.clone(),
            source,
        })?;
        info!(file = %file.display(), backup = %backup.display(), "restored from backup");
        Ok(backup)
    }
}

impl Default for BackupStore {
    fn default() -> Self {
        Self::from_config(&BackupConfig::default())
    }
}

/// Glob matching a `STAMP_FORMAT` stamp: `YYYYMMDD_HHMMSS`.
fn stamp_pattern() -> String {
    format!("{}_{}", "[0-9]".repeat(8), "[0-9]".repeat(6))
}

fn file_name(file: &Path) -> String {
    file.file_name()
        .map_or_else(|| file.to_string_lossy(), |name| name.to_string_lossy())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use normfix_core::DEFAULT_BACKUP_DIR;

    #[test]
    fn test_relative_dir_resolves_next_to_file() {
        let store = BackupStore::default();
        assert_eq!(
            store.dir_for(Path::new("src/main.c")),
            PathBuf::from("src").join(DEFAULT_BACKUP_DIR)
        );
    }

    #[test]
    fn test_create_and_restore() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("main.c");
        fs::write(&file, "original\n").unwrap();

        let store = BackupStore::default();
        let backup = store.create(&file).unwrap();
        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("main.c."));
        assert!(name.ends_with(".backup"));
        assert_eq!(store.list(&file), vec![backup.clone()]);

        fs::write(&file, "changed\n").unwrap();
        assert_eq!(store.restore(&file).unwrap(), backup);
        assert_eq!(fs::read_to_string(&file).unwrap(), "original\n");
    }

    #[test]
    fn test_restore_without_backup() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("lonely.c");
        fs::write(&file, "x\n").unwrap();
        let err = BackupStore::default().restore(&file).unwrap_err();
        assert!(matches!(err, FormatError::NoBackup { .. }));
    }

    #[test]
    fn test_other_files_backups_not_listed() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(DEFAULT_BACKUP_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("main.c.20240101_000000.backup"), "a").unwrap();
        fs::write(dir.join("other.c.20240101_000000.backup"), "b").unwrap();
        let listed = BackupStore::default().list(&tmp.path().join("main.c"));
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_longer_names_sharing_prefix_not_listed() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(DEFAULT_BACKUP_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("main.c.old.20240101_000000.backup"), "old").unwrap();
        fs::write(dir.join("main.c.notes.backup"), "notes").unwrap();
        let own = dir.join("main.c.20240101_000000.backup");
        fs::write(&own, "mine").unwrap();

        let file = tmp.path().join("main.c");
        fs::write(&file, "changed").unwrap();
        let store = BackupStore::default();
        assert_eq!(store.list(&file), vec![own.clone()]);
        assert_eq!(store.restore(&file).unwrap(), own);
        assert_eq!(fs::read_to_string(&file).unwrap(), "mine");
    }

    #[test]
    fn test_absolute_dir_used_as_is() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BackupStore::new(tmp.path());
        assert_eq!(store.dir_for(Path::new("a/b.c")), tmp.path());
    }
}
