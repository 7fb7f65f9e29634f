//! Preview command implementation.

use anyhow::{Context, Result};
use normfix::Analysis;
use std::path::Path;

use crate::config_resolver::ConfigSource;

/// Prints the text `format` would write for `file`.
pub fn run(file: &Path, report: &Path, source: &ConfigSource) -> Result<()> {
    let reports = super::read_report(report)?;
    let analyses: Vec<Analysis> = super::analyze(&reports)
        .into_iter()
        .filter(|entry| same_file(&entry.path, file))
        .flat_map(|entry| entry.analyses)
        .collect();

    if analyses.is_empty() {
        tracing::info!("No violations reported for {}", file.display());
    }

    let formatter = normfix::Formatter::new(source.load()?);
    let text = formatter
        .preview(file, &analyses)
        .with_context(|| format!("Failed to preview {}", file.display()))?;
    print!("{text}");
    Ok(())
}

fn same_file(reported: &Path, wanted: &Path) -> bool {
    if reported == wanted {
        return true;
    }
    match (reported.canonicalize(), wanted.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_file_matches_equivalent_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.c");
        std::fs::write(&path, "").unwrap();
        assert!(same_file(&path, &tmp.path().join(".").join("a.c")));
        assert!(!same_file(&path, &tmp.path().join("b.c")));
    }
}
