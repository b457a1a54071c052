//! Quote builder: syntax to literal data, without evaluation.
//!
//! `'x` and `(quote x)` produce the same value. A quote nested inside a datum
//! becomes the list `(quote x)`. The reader keeps `let` inside a datum as a
//! plain list, but a `Let` node handed in directly is rebuilt as the list it
//! would have been read from.

use alang_ir::{ensure_sufficient_stack, ExprArena, ExprId, ExprKind, FormTable};

use crate::Value;

/// Build the data value for the datum `id`.
pub fn quote(arena: &ExprArena, forms: &FormTable, id: ExprId) -> Value {
    ensure_sufficient_stack(|| quote_inner(arena, forms, id))
}

fn quote_inner(arena: &ExprArena, forms: &FormTable, id: ExprId) -> Value {
    match arena.kind(id) {
        ExprKind::Int(n) => Value::Int(n),
        ExprKind::Str(text) => Value::Str(text),
        ExprKind::Ident(name) => Value::Symbol(name),
        ExprKind::List(range) => Value::list(
            arena
                .get_expr_list(range)
                .iter()
                .map(|&e| quote(arena, forms, e))
                .collect(),
        ),
        ExprKind::Quote { datum, .. } => Value::list(vec![
            Value::Symbol(forms.quote),
            quote(arena, forms, datum),
        ]),
        ExprKind::Let { bindings, body } => {
            let bindings = arena
                .get_bindings(bindings)
                .iter()
                .map(|b| Value::list(vec![Value::Symbol(b.name), quote(arena, forms, b.init)]))
                .collect();
            let mut items = vec![Value::Symbol(forms.let_), Value::list(bindings)];
            items.extend(
                arena
                    .get_expr_list(body)
                    .iter()
                    .map(|&e| quote(arena, forms, e)),
            );
            Value::list(items)
        }
    }
}
