//! Source-annotated error reports.
//!
//! Every pipeline stage reports its first error through [`Diagnose`], which
//! is rendered with `ariadne` against the file that produced it.

use std::io::{IsTerminal, Write};

use alang_eval::EvalError;
use alang_graph::LowerError;
use alang_ir::Span;
use alang_parse::ParseError;
use ariadne::{Config, Label, Report, ReportKind, Source};

/// An error that can be pointed at in source text.
pub trait Diagnose {
    fn message(&self) -> String;

    fn span(&self) -> Option<Span>;

    /// Text attached to the highlighted span.
    fn label(&self) -> &'static str;
}

impl Diagnose for ParseError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn span(&self) -> Option<Span> {
        Some(ParseError::span(self))
    }

    fn label(&self) -> &'static str {
        "while reading this"
    }
}

impl Diagnose for EvalError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn span(&self) -> Option<Span> {
        self.span
    }

    fn label(&self) -> &'static str {
        "while evaluating this"
    }
}

impl Diagnose for LowerError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn span(&self) -> Option<Span> {
        LowerError::span(self)
    }

    fn label(&self) -> &'static str {
        "while lowering this"
    }
}

/// Render `error` as a report over `source`.
///
/// Errors without a span render as a single `Error:` line.
pub fn render(path: &str, source: &str, error: &dyn Diagnose, color: bool) -> String {
    let message = error.message();
    let mut out = Vec::new();
    let written = match error.span() {
        Some(span) => {
            let range = clamp(span, source.len());
            Report::build(ReportKind::Error, path, range.start)
                .with_config(Config::default().with_color(color))
                .with_message(&message)
                .with_label(Label::new((path, range)).with_message(error.label()))
                .finish()
                .write((path, Source::from(source)), &mut out)
        }
        None => writeln!(out, "Error: {message}"),
    };
    if written.is_err() {
        return format!("Error: {message}\n");
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Render to stderr, colored when stderr is a terminal.
pub fn emit(path: &str, source: &str, error: &dyn Diagnose) {
    let color = std::io::stderr().is_terminal();
    eprint!("{}", render(path, source, error, color));
}

/// Keep a span inside the source so end-of-input errors still render.
fn clamp(span: Span, len: usize) -> std::ops::Range<usize> {
    let range = span.to_range();
    let end = range.end.min(len);
    range.start.min(end)..end
}
