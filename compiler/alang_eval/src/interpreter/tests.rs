#![allow(clippy::unwrap_used)]

use alang_ir::StringInterner;
use pretty_assertions::assert_eq;

use crate::{buffer_handler, EvalErrorKind, InterpreterBuilder, Value};

#[test]
fn failed_call_restores_scope_depth() {
    let interner = StringInterner::new();
    let program =
        alang_parse::parse("(defun boom (n) (let ((x n)) (/ x 0))) (boom 1)", &interner).unwrap();
    let mut interp = InterpreterBuilder::new(&interner, &program.arena)
        .print_handler(buffer_handler())
        .build();

    let err = interp.run(&program.roots).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(interp.env.depth(), 1);
}

#[test]
fn interpreter_state_persists_across_runs() {
    let interner = StringInterner::new();
    let program = alang_parse::parse("(set total (+ total 1))", &interner).unwrap();
    let mut interp = InterpreterBuilder::new(&interner, &program.arena)
        .print_handler(buffer_handler())
        .build();

    interp
        .env
        .assign(interner.intern("total"), Value::Int(10))
        .unwrap();
    interp.run(&program.roots).unwrap();
    let result = interp.run(&program.roots).unwrap();
    assert_eq!(result, Value::Int(12));
}

#[test]
fn caller_locals_are_visible_below_the_call_frames() {
    // Invocation stacks the closure frames on top of the caller's scopes.
    let interner = StringInterner::new();
    let source = "(defun peek () hidden) (let ((hidden 5)) (peek))";
    let program = alang_parse::parse(source, &interner).unwrap();
    let mut interp = InterpreterBuilder::new(&interner, &program.arena)
        .print_handler(buffer_handler())
        .build();
    assert_eq!(interp.run(&program.roots).unwrap(), Value::Int(5));
}

#[test]
fn to_int_coercions() {
    let interner = StringInterner::new();
    let program = alang_parse::parse("", &interner).unwrap();
    let interp = InterpreterBuilder::new(&interner, &program.arena).build();

    assert_eq!(interp.to_int(&Value::Int(-4)).unwrap(), -4);
    assert_eq!(
        interp.to_int(&Value::Str(interner.intern("-17"))).unwrap(),
        -17
    );
    assert_eq!(
        interp
            .to_int(&Value::Str(interner.intern("1.5")))
            .unwrap_err()
            .kind,
        EvalErrorKind::NotNumeric {
            text: "1.5".to_string()
        }
    );
    assert_eq!(
        interp.to_int(&Value::nil()).unwrap_err().kind,
        EvalErrorKind::NotAnInteger { type_name: "list" }
    );
}

#[test]
fn print_goes_to_configured_sink() {
    let interner = StringInterner::new();
    let program = alang_parse::parse("(print 1) (print 2)", &interner).unwrap();
    let handler = buffer_handler();
    let mut interp = InterpreterBuilder::new(&interner, &program.arena)
        .print_handler(handler.clone())
        .build();
    interp.run(&program.roots).unwrap();
    assert_eq!(handler.get_output(), "1\n2\n");
    assert_eq!(interp.print_handler().lines().len(), 2);
}

#[test]
fn builder_loop_limit_override() {
    let interner = StringInterner::new();
    let program = alang_parse::parse("(while 1 0)", &interner).unwrap();
    let mut interp = InterpreterBuilder::new(&interner, &program.arena)
        .loop_limit(Some(3))
        .build();
    assert_eq!(interp.config().loop_limit, Some(3));
    assert_eq!(
        interp.run(&program.roots).unwrap_err().kind,
        EvalErrorKind::LoopLimitExceeded { limit: 3 }
    );
}
