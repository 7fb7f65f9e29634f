//! Errors raised while formatting files.

use std::path::PathBuf;

/// Failure of a file-level operation.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The source file could not be read.
    #[error("Failed to read file {path}: {source}")]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The backup copy could not be made.
    #[error("Failed to create backup for {path}: {source}")]
    Backup {
        /// File being backed up.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The rewritten text could not be written.
    #[error("Failed to write formatted content to {path}: {source}")]
    Write {
        /// File being written.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A backup exists but could not be copied back.
    #[error("Failed to restore {path} from {backup}: {source}")]
    Restore {
        /// File being restored.
        path: PathBuf,
        /// Backup it was restored from.
        backup: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// No backup matches the file.
    #[error("No backup found for {path}")]
    NoBackup {
        /// File with no backup.
        path: PathBuf,
    },
}
