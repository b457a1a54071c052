//! Read-and-run helpers for interpreter tests.

#![allow(clippy::unwrap_used)]

use alang_ir::StringInterner;

use crate::{buffer_handler, EvalConfig, EvalError, EvalErrorKind, InterpreterBuilder};

/// Result of running a program against a buffering sink.
pub struct Outcome {
    /// Rendered value of the last top-level expression.
    pub result: Result<String, EvalError>,
    /// Printed lines, including those printed before an error.
    pub output: Vec<String>,
}

pub fn run_with(source: &str, config: EvalConfig) -> Outcome {
    let interner = StringInterner::new();
    let program = alang_parse::parse(source, &interner).unwrap();
    let handler = buffer_handler();
    let mut interpreter = InterpreterBuilder::new(&interner, &program.arena)
        .print_handler(handler.clone())
        .config(config)
        .build();
    let result = interpreter
        .run(&program.roots)
        .map(|value| value.display(&interner).to_string());
    Outcome {
        result,
        output: handler.lines(),
    }
}

pub fn run(source: &str) -> Outcome {
    run_with(source, EvalConfig::default())
}

/// Printed lines of a program that must succeed.
pub fn output(source: &str) -> Vec<String> {
    let outcome = run(source);
    if let Err(err) = &outcome.result {
        panic!("{source}: unexpected error: {err}");
    }
    outcome.output
}

/// Rendered final value of a program that must succeed.
pub fn value(source: &str) -> String {
    run(source).result.unwrap()
}

/// Error kind of a program that must fail.
pub fn error(source: &str) -> EvalErrorKind {
    match run(source).result {
        Ok(value) => panic!("{source}: expected an error, got {value}"),
        Err(err) => err.kind,
    }
}
