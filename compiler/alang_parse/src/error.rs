//! Reader errors.

use alang_ir::Span;

/// Error produced while reading source text.
///
/// The reader stops at the first error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected `)`")]
    UnexpectedCloseParen { span: Span },

    #[error("unclosed `(`")]
    UnclosedList { span: Span },

    #[error("unexpected end of input")]
    UnexpectedEof { span: Span },

    #[error("integer literal out of range: {text}")]
    IntegerOverflow { text: String, span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("unrecognized input")]
    InvalidToken { span: Span },

    #[error("malformed let form: {reason}")]
    MalformedLet { reason: &'static str, span: Span },

    #[error("malformed quote form: expected exactly one datum")]
    MalformedQuote { span: Span },
}

impl ParseError {
    /// Source location of the error.
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedCloseParen { span }
            | ParseError::UnclosedList { span }
            | ParseError::UnexpectedEof { span }
            | ParseError::IntegerOverflow { span, .. }
            | ParseError::UnterminatedString { span }
            | ParseError::InvalidToken { span }
            | ParseError::MalformedLet { span, .. }
            | ParseError::MalformedQuote { span } => *span,
        }
    }
}
