//! Recursive-descent reader.
//!
//! Grammar:
//!
//! ```text
//! program := expr*
//! expr    := INT | STR | IDENT | "'" datum | list
//! list    := "(" "let" "(" binding* ")" expr+ ")"
//!          | "(" "quote" datum ")"
//!          | "(" expr* ")"
//! binding := "(" IDENT expr ")"
//! datum   := INT | STR | IDENT | "'" datum | "(" datum* ")"
//! ```

use alang_ir::{
    ensure_sufficient_stack, Expr, ExprArena, ExprId, ExprKind, LetBinding, Name, Program, QuoteForm, Span,
    StringInterner,
};

use crate::lexer::{lex, Token, TokenKind};
use crate::ParseError;

/// Whether `let`/`quote` heads are recognised.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mode {
    Code,
    Datum,
}

/// Read a whole source file into a [`Program`].
pub fn parse(source: &str, interner: &StringInterner) -> Result<Program, ParseError> {
    let tokens = lex(source, interner)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        arena: ExprArena::new(),
        kw_let: interner.intern("let"),
        kw_quote: interner.intern("quote"),
        eof: Span::from_range(source.len()..source.len()),
    };

    let mut roots = Vec::new();
    while !parser.at_end() {
        roots.push(parser.expr(Mode::Code)?);
    }

    Ok(Program {
        arena: parser.arena,
        roots,
    })
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    arena: ExprArena,
    kw_let: Name,
    kw_quote: Name,
    eof: Span,
}

impl Parser<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc(Expr::new(kind, span))
    }

    fn expr(&mut self, mode: Mode) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.expr_inner(mode))
    }

    fn expr_inner(&mut self, mode: Mode) -> Result<ExprId, ParseError> {
        let Some(token) = self.advance() else {
            return Err(ParseError::UnexpectedEof { span: self.eof });
        };
        match token.kind {
            TokenKind::Int(value) => Ok(self.alloc(ExprKind::Int(value), token.span)),
            TokenKind::Str(text) => Ok(self.alloc(ExprKind::Str(text), token.span)),
            TokenKind::Ident(name) => Ok(self.alloc(ExprKind::Ident(name), token.span)),
            TokenKind::Quote => {
                let datum = self.expr(Mode::Datum)?;
                let span = token.span.merge(self.arena.span(datum));
                Ok(self.alloc(
                    ExprKind::Quote {
                        datum,
                        form: QuoteForm::Short,
                    },
                    span,
                ))
            }
            TokenKind::LParen => self.list(token.span, mode),
            TokenKind::RParen => Err(ParseError::UnexpectedCloseParen { span: token.span }),
        }
    }

    /// Parse the rest of a list whose `(` has been consumed.
    fn list(&mut self, open: Span, mode: Mode) -> Result<ExprId, ParseError> {
        if mode == Mode::Code {
            match self.peek_kind() {
                Some(TokenKind::Ident(head)) if head == self.kw_let => {
                    self.advance();
                    return self.let_form(open);
                }
                Some(TokenKind::Ident(head)) if head == self.kw_quote => {
                    self.advance();
                    return self.long_quote(open);
                }
                _ => {}
            }
        }

        let mut elements = Vec::new();
        let close = loop {
            match self.peek() {
                None => return Err(ParseError::UnclosedList { span: open }),
                Some(Token {
                    kind: TokenKind::RParen,
                    span,
                }) => {
                    self.advance();
                    break span;
                }
                Some(_) => elements.push(self.expr(mode)?),
            }
        };

        let range = self.arena.alloc_expr_list(&elements);
        Ok(self.alloc(ExprKind::List(range), open.merge(close)))
    }

    /// `(quote datum)` after the `quote` head.
    fn long_quote(&mut self, open: Span) -> Result<ExprId, ParseError> {
        match self.peek_kind() {
            None => return Err(ParseError::UnclosedList { span: open }),
            Some(TokenKind::RParen) => return Err(ParseError::MalformedQuote { span: open }),
            Some(_) => {}
        }
        let datum = self.expr(Mode::Datum)?;
        let close = self.expect_close(open, || ParseError::MalformedQuote { span: open })?;
        Ok(self.alloc(
            ExprKind::Quote {
                datum,
                form: QuoteForm::Long,
            },
            open.merge(close),
        ))
    }

    /// `(let ((name init)*) body+)` after the `let` head.
    fn let_form(&mut self, open: Span) -> Result<ExprId, ParseError> {
        let malformed = |reason| ParseError::MalformedLet { reason, span: open };

        match self.advance() {
            Some(Token {
                kind: TokenKind::LParen,
                ..
            }) => {}
            None => return Err(ParseError::UnclosedList { span: open }),
            Some(_) => return Err(malformed("expected a binding list")),
        }

        let mut bindings = Vec::new();
        loop {
            let Some(token) = self.advance() else {
                return Err(ParseError::UnclosedList { span: open });
            };
            match token.kind {
                TokenKind::RParen => break,
                TokenKind::LParen => {
                    let name = match self.advance() {
                        Some(Token {
                            kind: TokenKind::Ident(name),
                            ..
                        }) => name,
                        None => return Err(ParseError::UnclosedList { span: token.span }),
                        Some(_) => return Err(malformed("binding name must be an identifier")),
                    };
                    if self.peek_kind() == Some(TokenKind::RParen) {
                        return Err(malformed("binding is missing its initializer"));
                    }
                    let init = self.expr(Mode::Code)?;
                    let close = self.expect_close(token.span, || {
                        malformed("binding must be exactly (name expr)")
                    })?;
                    bindings.push(LetBinding {
                        name,
                        init,
                        span: token.span.merge(close),
                    });
                }
                _ => return Err(malformed("expected a (name expr) binding")),
            }
        }

        let mut body = Vec::new();
        let close = loop {
            match self.peek() {
                None => return Err(ParseError::UnclosedList { span: open }),
                Some(Token {
                    kind: TokenKind::RParen,
                    span,
                }) => {
                    self.advance();
                    break span;
                }
                Some(_) => body.push(self.expr(Mode::Code)?),
            }
        };
        if body.is_empty() {
            return Err(malformed("body must contain at least one expression"));
        }

        let bindings = self.arena.alloc_bindings(&bindings);
        let body = self.arena.alloc_expr_list(&body);
        Ok(self.alloc(ExprKind::Let { bindings, body }, open.merge(close)))
    }

    /// Consume a `)`. A missing token is an unclosed list; anything else
    /// is reported with `wrong`.
    fn expect_close(
        &mut self,
        open: Span,
        wrong: impl FnOnce() -> ParseError,
    ) -> Result<Span, ParseError> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::RParen,
                span,
            }) => {
                self.advance();
                Ok(span)
            }
            None => Err(ParseError::UnclosedList { span: open }),
            Some(_) => Err(wrong()),
        }
    }
}
