//! Format command implementation.

use anyhow::Result;
use normfix::Formatter;
use std::path::Path;

use crate::config_resolver::ConfigSource;

/// Runs the format command.
pub fn run(report: &Path, dry_run: bool, no_backup: bool, source: &ConfigSource) -> Result<()> {
    let mut formatter = Formatter::new(source.load()?);
    if no_backup {
        formatter = formatter.with_backups(false);
    }

    let files: Vec<_> = super::analyze(&super::read_report(report)?)
        .into_iter()
        .filter(|file| {
            if file.path.as_os_str().is_empty() {
                tracing::warn!("Skipping violations reported before any file header");
                return false;
            }
            true
        })
        .collect();

    if dry_run {
        for file in &files {
            let text = formatter.preview(&file.path, &file.analyses)?;
            println!("==> {} <==", file.path.display());
            print!("{text}");
        }
        return Ok(());
    }

    let results = formatter.format_many(files.into_iter().map(|f| (f.path, f.analyses)));

    let mut failed = 0;
    let mut changed = 0;
    for (path, result) in &results {
        if result.success {
            if result.changes_made > 0 {
                changed += 1;
            }
            println!("\x1b[32mok\x1b[0m {}: {}", path.display(), result.message);
        } else {
            failed += 1;
            println!("\x1b[31mfailed\x1b[0m {}: {}", path.display(), result.message);
        }
    }
    println!(
        "Formatted {changed} of {} file(s), {failed} failure(s)",
        results.len()
    );

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
