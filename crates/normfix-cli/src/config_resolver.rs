//! Locating and loading `normfix.toml`.
//!
//! Resolution order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `normfix.toml` or `.normfix.toml` in the working directory or the
//!    nearest ancestor that has one
//! 3. `~/.normfix/config.toml` (global fallback)
//! 4. Built-in defaults

use anyhow::{Context, Result};
use normfix::Config;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found next to the sources.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// The resolved file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid TOML.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            tracing::debug!("no config file, using defaults");
            return Ok(Config::default());
        };
        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        }
        Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["normfix.toml", ".normfix.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration source for a run started in `start_dir`.
#[must_use]
pub fn resolve(start_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(start_dir, explicit, global_config_dir())
}

fn resolve_inner(
    start_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_project_config(start_dir) {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, |candidate| {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        })
}

fn find_project_config(start_dir: &Path) -> Option<PathBuf> {
    let start = start_dir
        .canonicalize()
        .unwrap_or_else(|_| start_dir.to_path_buf());
    start.ancestors().find_map(|dir| {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// The global config directory: `$NORMFIX_CONFIG_DIR`, else `~/.normfix/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("NORMFIX_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".normfix"))
}
