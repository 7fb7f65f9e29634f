//! # normfix-passes
//!
//! Built-in text transformation passes for normfix.
//!
//! Every pass rewrites a whole C source file and reports how many edits it
//! made. Passes only look at code characters: string and char literals and
//! comments are skipped.
//!
//! ## Available Passes
//!
//! | Order | Name | Triggered by |
//! |-------|------|--------------|
//! | 1 | `header` | `HEADER_MISSING` |
//! | 2 | `spacing` | `SPACE_BEFORE_FUNC`, `SPACE_AFTER_KW` |
//! | 3 | `indentation` | `INDENT_BRANCH`, `INDENT_MULT_BRANCH` |
//! | 4 | `braces` | `BRACE_NEWLINE`, `BRACE_SHOULD_EOL`, `BRACE_SHOULD_NEWLINE` |
//! | 5 | `tabs` | `SPACE_REPLACE_TAB`, `TAB_REPLACE_SPACE` |
//! | 6 | `comments` | `WRONG_SCOPE_COMMENT` |
//! | 7 | `blank-lines` | `EMPTY_LINE_FUNCTION`, `EMPTY_LINE_EOF`, `CONSECUTIVE_NEWLINES` |
//! | 8 | `function-spacing` | `NEWLINE_PRECEDES_FUNC` |
//! | 9 | `long-lines` | `TOO_LONG_LINE` |
//!
//! ## Usage
//!
//! ```
//! use normfix_core::{PassContext, PassId};
//! use normfix_passes::Pipeline;
//!
//! let pipeline = Pipeline::select(&[PassId::Spacing]);
//! let outcome = pipeline.run(&PassContext::new("main.c"), "\tif(x == 1)\n");
//! assert_eq!(outcome.text, "\tif (x == 1)\n");
//! assert_eq!(outcome.changes, 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blank_lines;
mod braces;
mod comments;
mod function_spacing;
mod header;
mod indentation;
mod long_lines;
mod pipeline;
mod spacing;
mod tabs;

pub use blank_lines::BlankLinesPass;
pub use braces::BracesPass;
pub use comments::CommentsPass;
pub use function_spacing::FunctionSpacingPass;
pub use header::{has_header, render_header, HeaderPass};
pub use indentation::{required_indent, IndentationPass};
pub use long_lines::{LongLinesPass, MAX_LINE};
pub use pipeline::{
    all_passes, pass_for, triggered_passes, PassStep, Pipeline, PipelineOutcome,
};
pub use spacing::SpacingPass;
pub use tabs::{repair as repair_indent, TabsPass};

/// Re-export core types for convenience.
pub use normfix_core::{Pass, PassBox, PassContext, PassId, PassOutcome};
