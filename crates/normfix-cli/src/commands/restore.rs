//! Restore command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config_resolver::ConfigSource;

/// Restores `file` from its most recent backup.
pub fn run(file: &Path, source: &ConfigSource) -> Result<()> {
    let formatter = normfix::Formatter::new(source.load()?);
    let backup = formatter
        .restore(file)
        .with_context(|| format!("Failed to restore {}", file.display()))?;
    println!("Restored {} from {}", file.display(), backup.display());
    Ok(())
}
