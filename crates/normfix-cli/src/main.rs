//! normfix CLI tool.
//!
//! Usage:
//! ```bash
//! norminette src/*.c > report.txt
//! normfix check report.txt
//! normfix format report.txt
//! normfix restore src/main.c
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Classify norminette violations and auto-fix C sources
#[derive(Parser)]
#[command(name = "normfix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the violations of a captured norminette report
    Check {
        /// Report file, or "-" for stdin
        report: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only show files with this status
        #[arg(long)]
        status: Option<StatusArg>,

        /// Only show files with a violation in this category (e.g. spacing)
        #[arg(long)]
        error_type: Option<String>,

        /// Only show files with auto-fixable violations
        #[arg(long)]
        auto_fixable: bool,
    },

    /// Fix the auto-fixable violations of a report in place
    Format {
        /// Report file, or "-" for stdin
        report: PathBuf,

        /// Print the fixed text instead of writing it
        #[arg(long)]
        dry_run: bool,

        /// Do not back files up before writing
        #[arg(long)]
        no_backup: bool,
    },

    /// Print what `format` would write for one file
    Preview {
        /// Source file
        file: PathBuf,

        /// Report file, or "-" for stdin
        #[arg(short, long)]
        report: PathBuf,
    },

    /// Restore a file from its most recent backup
    Restore {
        /// Source file
        file: PathBuf,
    },

    /// List known rules and the passes that fix them
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

/// File status accepted by `check --status`.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StatusArg {
    /// No violations.
    Ok,
    /// Only low or medium severity violations.
    Warning,
    /// At least one high severity violation.
    Error,
    /// At least one critical violation.
    Critical,
}

impl From<StatusArg> for normfix::FileStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Ok => Self::Ok,
            StatusArg::Warning => Self::Warning,
            StatusArg::Error => Self::Error,
            StatusArg::Critical => Self::Critical,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let source = config_resolver::resolve(Path::new("."), cli.config.as_deref());

    match cli.command {
        Commands::Check {
            report,
            format,
            status,
            error_type,
            auto_fixable,
        } => {
            let mut filter = normfix::FileFilter::new();
            if let Some(status) = status {
                filter = filter.status(status.into());
            }
            if let Some(error_type) = error_type {
                filter = filter.error_type(error_type);
            }
            if auto_fixable {
                filter = filter.auto_fixable_only();
            }
            commands::check::run(&report, format, &filter)
        }
        Commands::Format {
            report,
            dry_run,
            no_backup,
        } => commands::format::run(&report, dry_run, no_backup, &source),
        Commands::Preview { file, report } => commands::preview::run(&file, &report, &source),
        Commands::Restore { file } => commands::restore::run(&file, &source),
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
