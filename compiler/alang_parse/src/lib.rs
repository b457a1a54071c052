//! Alang Parse - reader for alang source text.
//!
//! Two stages:
//! - [`lex`]: `logos` tokenizer, interning identifiers and string literals
//! - [`parse`]: recursive-descent reader building a flat [`Program`]
//!
//! The reader only checks the grammar (balanced lists, well-shaped `let` and
//! `quote`). Special-form shapes are validated by the backends.

mod error;
mod lexer;
mod parser;

pub use error::ParseError;
pub use lexer::{lex, Token, TokenKind};
pub use parser::parse;

// Re-export so callers do not need a direct `alang_ir` dependency for the
// common read-then-run path.
pub use alang_ir::Program;
