#![allow(clippy::unwrap_used)]

use alang_ir::StringInterner;
use pretty_assertions::assert_eq;

use super::*;
use crate::FunctionValue;

fn setup() -> (StringInterner, Environment) {
    let interner = StringInterner::new();
    let env = Environment::new(interner.intern("nil"));
    (interner, env)
}

#[test]
fn test_global_scope_binds_nil() {
    let (interner, env) = setup();
    assert_eq!(env.depth(), 1);
    assert_eq!(env.lookup(interner.intern("nil")), Some(Value::nil()));
}

#[test]
fn test_inner_scope_shadows_outer() {
    let (interner, mut env) = setup();
    let x = interner.intern("x");
    env.define(x, Value::Int(1), Mutability::Mutable);
    env.push_scope();
    env.define(x, Value::Int(2), Mutability::Mutable);
    assert_eq!(env.lookup(x), Some(Value::Int(2)));
    env.pop_scope();
    assert_eq!(env.lookup(x), Some(Value::Int(1)));
}

#[test]
fn test_assign_updates_nearest_scope() {
    let (interner, mut env) = setup();
    let x = interner.intern("x");
    env.define(x, Value::Int(1), Mutability::Mutable);
    env.push_scope();
    env.assign(x, Value::Int(5)).unwrap();
    env.pop_scope();
    assert_eq!(env.lookup(x), Some(Value::Int(5)));
}

#[test]
fn test_assign_unknown_name_creates_global() {
    let (interner, mut env) = setup();
    let y = interner.intern("y");
    env.push_scope();
    env.push_scope();
    env.assign(y, Value::Int(3)).unwrap();
    env.truncate(1);
    assert_eq!(env.lookup(y), Some(Value::Int(3)));
}

#[test]
fn test_assign_frozen_fails_in_any_scope() {
    let (interner, mut env) = setup();
    let pi = interner.intern("PI");
    env.define_const(pi, Value::Int(314)).unwrap();
    env.push_scope();
    assert_eq!(env.assign(pi, Value::Int(1)), Err(AssignError::Frozen));
    assert_eq!(env.lookup(pi), Some(Value::Int(314)));
}

#[test]
fn test_define_const_twice_fails() {
    let (interner, mut env) = setup();
    let pi = interner.intern("PI");
    env.define_const(pi, Value::Int(314)).unwrap();
    assert_eq!(
        env.define_const(pi, Value::Int(3)),
        Err(AssignError::AlreadyConst)
    );
}

#[test]
fn test_const_is_scope_local() {
    let (interner, mut env) = setup();
    let x = interner.intern("x");
    env.define(x, Value::Int(1), Mutability::Mutable);
    env.push_scope();
    env.define_const(x, Value::Int(2)).unwrap();
    env.pop_scope();
    assert_eq!(env.assign(x, Value::Int(9)), Ok(()));
    assert_eq!(env.lookup(x), Some(Value::Int(9)));
}

#[test]
fn test_snapshot_innermost_wins() {
    let (interner, mut env) = setup();
    let x = interner.intern("x");
    let y = interner.intern("y");
    env.define(x, Value::Int(1), Mutability::Mutable);
    env.define(y, Value::Int(10), Mutability::Mutable);
    env.push_scope();
    env.define(x, Value::Int(2), Mutability::Frozen);

    let snapshot = env.snapshot();
    assert_eq!(snapshot[&x].value, Value::Int(2));
    assert_eq!(snapshot[&x].mutability, Mutability::Frozen);
    assert_eq!(snapshot[&y].value, Value::Int(10));
    assert!(snapshot.contains_key(&interner.intern("nil")));
}

#[test]
fn test_snapshot_is_a_copy() {
    let (interner, mut env) = setup();
    let x = interner.intern("x");
    env.define(x, Value::Int(1), Mutability::Mutable);
    let snapshot = env.snapshot();
    env.assign(x, Value::Int(2)).unwrap();
    assert_eq!(snapshot[&x].value, Value::Int(1));
}

#[test]
fn test_push_captures_and_truncate() {
    let (interner, mut env) = setup();
    let x = interner.intern("x");
    env.define(x, Value::Int(1), Mutability::Mutable);
    let snapshot = env.snapshot();
    env.assign(x, Value::Int(2)).unwrap();

    env.push_captures(&snapshot);
    env.push_scope();
    assert_eq!(env.lookup(x), Some(Value::Int(1)));
    env.truncate(1);
    assert_eq!(env.depth(), 1);
    assert_eq!(env.lookup(x), Some(Value::Int(2)));
}

#[test]
fn test_truncate_never_drops_global() {
    let (_, mut env) = setup();
    env.truncate(0);
    assert_eq!(env.depth(), 1);
}

#[test]
fn test_define_function_updates_global_and_live_copies() {
    let (interner, mut env) = setup();
    let (g, x) = (interner.intern("g"), interner.intern("x"));
    let old = Value::function(FunctionValue {
        name: Some(g),
        params: Vec::new(),
        body: alang_ir::ExprRange::EMPTY,
        captures: Captures::default(),
    });
    env.define(g, old.clone(), Mutability::Mutable);
    let captures = env.snapshot();
    env.push_captures(&captures);
    env.push_scope();
    env.define(x, Value::Int(1), Mutability::Mutable);

    let new = Value::function(FunctionValue {
        name: Some(g),
        params: vec![x],
        body: alang_ir::ExprRange::EMPTY,
        captures: Captures::default(),
    });
    env.define_function(g, new.clone()).unwrap();
    assert_eq!(env.lookup(g), Some(new.clone()));

    env.truncate(1);
    assert_eq!(env.lookup(g), Some(new));
    assert_ne!(env.lookup(g), Some(old));
}

#[test]
fn test_define_function_leaves_shadowing_values_alone() {
    let (interner, mut env) = setup();
    let f = interner.intern("f");
    env.push_scope();
    env.define(f, Value::Int(2), Mutability::Mutable);
    env.define_function(f, Value::nil()).unwrap();
    assert_eq!(env.lookup(f), Some(Value::Int(2)));
    env.pop_scope();
    assert_eq!(env.lookup(f), Some(Value::nil()));
}

#[test]
fn test_define_function_over_const_fails() {
    let (interner, mut env) = setup();
    let pi = interner.intern("PI");
    env.define_const(pi, Value::Int(314)).unwrap();
    assert_eq!(env.define_function(pi, Value::Int(0)), Err(AssignError::Frozen));
}
