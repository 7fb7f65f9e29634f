//! Text utilities shared by the passes.

pub mod layout;
pub mod lexer;
pub mod lines;

#[doc(inline)]
pub use layout::{tabs, LayoutTracker, LineLayout};
#[doc(inline)]
pub use lexer::{mask_lines, CharClass, LexState, MaskedLine};
#[doc(inline)]
pub use lines::{char_len, is_blank, leading_whitespace, FileText};
