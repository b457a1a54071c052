use alang_ir::{ExprArena, StringInterner};

use super::*;
use crate::{Captures, Mutability, Value};

#[test]
fn test_scoped_interpreter_drops_on_normal_exit() {
    let interner = StringInterner::new();
    let arena = ExprArena::new();
    let mut interp = Interpreter::new(&interner, &arena);

    assert_eq!(interp.env.depth(), 1);
    {
        let scoped = interp.scoped();
        assert_eq!(scoped.env.depth(), 2);
    }
    assert_eq!(interp.env.depth(), 1);
}

#[test]
fn test_scoped_interpreter_drops_on_panic() {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    let interner = StringInterner::new();
    let arena = ExprArena::new();
    let mut interp = Interpreter::new(&interner, &arena);

    let result = catch_unwind(AssertUnwindSafe(|| {
        interp.with_env_scope(|scoped| {
            scoped.with_env_scope(|inner| {
                assert_eq!(inner.env.depth(), 3);
                panic!("deep panic");
            });
        });
    }));

    assert!(result.is_err());
    assert_eq!(interp.env.depth(), 1);
}

#[test]
fn test_call_scope_pops_both_frames() {
    let interner = StringInterner::new();
    let arena = ExprArena::new();
    let mut interp = Interpreter::new(&interner, &arena);
    let x = interner.intern("x");

    let mut captures = Captures::default();
    captures.insert(
        x,
        crate::Binding {
            value: Value::Int(1),
            mutability: Mutability::Mutable,
        },
    );

    let seen = interp.with_call_scope(&captures, |scoped| {
        assert_eq!(scoped.env.depth(), 3);
        scoped.env.lookup(x)
    });
    assert_eq!(seen, Some(Value::Int(1)));
    assert_eq!(interp.env.depth(), 1);
    assert_eq!(interp.env.lookup(x), None);
}
