//! Configuration types for normfix.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default directory for backups, relative to the formatted file.
pub const DEFAULT_BACKUP_DIR: &str = ".norminette_backups";

/// Top-level configuration, read from `normfix.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Values written into inserted 42 headers.
    #[serde(default)]
    pub header: HeaderConfig,

    /// Backup behavior of the formatter.
    #[serde(default)]
    pub backup: BackupConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }
}

/// Author identity for the 42 header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderConfig {
    /// Login shown in the `By:`, `Created:` and `Updated:` rows.
    #[serde(default = "default_author")]
    pub author: String,

    /// Email shown next to the login.
    #[serde(default = "default_email")]
    pub email: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            author: default_author(),
            email: default_email(),
        }
    }
}

fn default_author() -> String {
    "student".to_string()
}

fn default_email() -> String {
    "student@student.42.fr".to_string()
}

/// Where and whether to back files up before writing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Copy each file before it is rewritten.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Backup directory. Relative paths resolve against the file's directory.
    #[serde(default = "default_backup_dir")]
    pub dir: PathBuf,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_backup_dir(),
        }
    }
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from(DEFAULT_BACKUP_DIR)
}

fn default_true() -> bool {
    true
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}
