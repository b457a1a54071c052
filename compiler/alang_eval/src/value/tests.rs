use alang_ir::{ExprRange, StringInterner};
use pretty_assertions::assert_eq;

use super::*;
use crate::environment::Captures;

fn lambda() -> Value {
    Value::function(FunctionValue {
        name: None,
        params: Vec::new(),
        body: ExprRange::EMPTY,
        captures: Captures::default(),
    })
}

#[test]
fn test_truthiness_table() {
    let interner = StringInterner::new();
    let empty = interner.intern("");
    let text = interner.intern("a");

    assert!(!Value::Int(0).is_truthy());
    assert!(Value::Int(-3).is_truthy());
    assert!(!Value::Str(empty).is_truthy());
    assert!(Value::Str(text).is_truthy());
    assert!(!Value::Symbol(empty).is_truthy());
    assert!(Value::Symbol(text).is_truthy());
    assert!(!Value::nil().is_truthy());
    assert!(Value::list(vec![Value::Int(0)]).is_truthy());
    assert!(lambda().is_truthy());
}

#[test]
fn test_render_nested_list() {
    let interner = StringInterner::new();
    let value = Value::list(vec![
        Value::Int(1),
        Value::Symbol(interner.intern("a")),
        Value::list(vec![Value::Str(interner.intern("hi")), Value::nil()]),
    ]);
    assert_eq!(value.display(&interner).to_string(), "(1 a (hi ()))");
}

#[test]
fn test_render_function_placeholder() {
    let interner = StringInterner::new();
    assert_eq!(lambda().display(&interner).to_string(), "#<function>");
}

#[test]
fn test_functions_compare_by_identity() {
    let f = lambda();
    let g = lambda();
    assert_eq!(f, f.clone());
    assert_ne!(f, g);
}

#[test]
fn test_from_bool() {
    assert_eq!(Value::from(true), Value::Int(1));
    assert_eq!(Value::from(false), Value::Int(0));
}
