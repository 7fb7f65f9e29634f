//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# normfix configuration

[header]
# Login and email written into inserted 42 headers
author = "student"
email = "student@student.42.fr"

[backup]
# Copy each file before it is rewritten
enabled = true
# Relative paths resolve against the directory of the formatted file
dir = ".norminette_backups"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("normfix.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created normfix.toml");
    println!("\nNext steps:");
    println!("  1. Set your login and email under [header]");
    println!("  2. Run: norminette > report.txt && normfix format report.txt");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use normfix::{Config, DEFAULT_BACKUP_DIR};

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.backup.dir, Path::new(DEFAULT_BACKUP_DIR));
    }
}
