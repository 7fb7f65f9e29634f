//! # normfix
//!
//! Classifies norminette violations and auto-fixes 42-style C sources.
//!
//! This is the facade crate: it re-exports the core model and the built-in
//! passes, and owns the only code that touches the filesystem (the
//! [`Formatter`] and its [`BackupStore`]).
//!
//! ## Example
//!
//! ```no_run
//! use normfix::{classify_all, parse_report, Config, Formatter};
//!
//! let report = std::fs::read_to_string("norminette.log")?;
//! let formatter = Formatter::new(Config::default());
//! for file in parse_report(&report) {
//!     let analyses = classify_all(&file.violations);
//!     let result = formatter.format_file(&file.path, &analyses);
//!     println!("{}: {}", file.path.display(), result.message);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

#![forbid(unsafe_code)]

// Re-export core types and functions
pub use normfix_core::*;

/// Built-in passes and the pipeline.
pub mod passes {
    pub use normfix_passes::*;
}

mod backup;
mod error;
mod formatter;

pub use backup::BackupStore;
pub use error::FormatError;
pub use formatter::{FormatResult, Formatter, NOTHING_TO_FIX, NO_CHANGES};
