//! Tokenizer using logos with string interning.

use alang_ir::{Name, Span, StringInterner};
use logos::Logos;

use crate::ParseError;

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r";[^\n]*")]
enum RawToken {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("'")]
    Quote,

    #[regex(r"-?[0-9]+", priority = 3)]
    Int,

    #[regex(r#""[^"]*""#)]
    Str,
    /// Opening quote with no closing quote before end of input.
    #[regex(r#""[^"]*"#)]
    UnterminatedStr,

    #[regex(r#"[^\s()';"]+"#)]
    Ident,
}

/// Token kind with literal payloads already decoded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    LParen,
    RParen,
    Quote,
    Int(i64),
    Str(Name),
    Ident(Name),
}

/// A token with its source location.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Tokenize source text.
pub fn lex(source: &str, interner: &StringInterner) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(raw) = lexer.next() {
        let span = Span::from_range(lexer.span());
        let text = lexer.slice();
        let kind = match raw {
            Ok(RawToken::LParen) => TokenKind::LParen,
            Ok(RawToken::RParen) => TokenKind::RParen,
            Ok(RawToken::Quote) => TokenKind::Quote,
            Ok(RawToken::Int) => {
                let value = text.parse::<i64>().map_err(|_| ParseError::IntegerOverflow {
                    text: text.to_string(),
                    span,
                })?;
                TokenKind::Int(value)
            }
            Ok(RawToken::Str) => {
                let inner = &text[1..text.len() - 1];
                TokenKind::Str(interner.intern(inner))
            }
            Ok(RawToken::UnterminatedStr) => return Err(ParseError::UnterminatedString { span }),
            Ok(RawToken::Ident) => TokenKind::Ident(interner.intern(text)),
            Err(()) => return Err(ParseError::InvalidToken { span }),
        };
        tokens.push(Token { kind, span });
    }

    Ok(tokens)
}
