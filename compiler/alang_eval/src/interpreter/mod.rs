//! Tree-walking interpreter.
//!
//! Walks the syntax tree left to right, depth first. Special forms are
//! recognised by classifying the head identifier of a list through the shared
//! [`FormTable`]; every other list is a call.

mod builder;
mod call;
mod forms;
mod scope_guard;

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

use alang_ir::{
    ensure_sufficient_stack, ExprArena, ExprId, ExprKind, ExprRange, FormTable, Name, Span,
    StringInterner,
};

use crate::errors::{not_callable, undefined_variable, unknown_form};
use crate::print_handler::SharedPrintHandler;
use crate::quote::quote;
use crate::{EvalConfig, EvalResult, Environment, Mutability, Value};

/// Interpreter state for one program.
pub struct Interpreter<'a> {
    pub(crate) interner: &'a StringInterner,
    pub(crate) arena: &'a ExprArena,
    pub(crate) forms: FormTable,
    pub env: Environment,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) config: EvalConfig,
}

impl<'a> Interpreter<'a> {
    /// Interpreter with default configuration, printing to stdout.
    pub fn new(interner: &'a StringInterner, arena: &'a ExprArena) -> Self {
        InterpreterBuilder::new(interner, arena).build()
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    /// Evaluate top-level expressions in order.
    ///
    /// Returns the value of the last one; an empty program yields `nil`.
    pub fn run(&mut self, roots: &[ExprId]) -> EvalResult {
        tracing::debug!(expressions = roots.len(), "interpreting program");
        let mut last = Value::nil();
        for &root in roots {
            last = self.eval(root)?;
        }
        Ok(last)
    }

    /// Evaluate one expression in the current scope.
    pub fn eval(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(id))
    }

    fn eval_inner(&mut self, id: ExprId) -> EvalResult {
        let expr = *self.arena.get(id);
        match expr.kind {
            ExprKind::Int(n) => Ok(Value::Int(n)),
            ExprKind::Str(text) => Ok(Value::Str(text)),
            ExprKind::Ident(name) => self
                .env
                .lookup(name)
                .ok_or_else(|| undefined_variable(self.name(name)).with_span(expr.span)),
            ExprKind::Quote { datum, .. } => Ok(quote(self.arena, &self.forms, datum)),
            ExprKind::Let { bindings, body } => {
                let arena = self.arena;
                let mut values = Vec::with_capacity(bindings.len());
                // All initializers see the enclosing scope only.
                for binding in arena.get_bindings(bindings) {
                    values.push((binding.name, self.eval(binding.init)?));
                }
                self.with_env_scope(|scoped| {
                    for (name, value) in values {
                        scoped.env.define(name, value, Mutability::Mutable);
                    }
                    scoped.eval_body(body)
                })
            }
            ExprKind::List(range) => self.eval_list(range, expr.span),
        }
    }

    fn eval_list(&mut self, range: ExprRange, span: Span) -> EvalResult {
        let arena = self.arena;
        let Some((&head, args)) = arena.get_expr_list(range).split_first() else {
            return Err(unknown_form("()").with_span(span));
        };

        if let Some(name) = arena.as_ident(head) {
            if let Some(form) = self.forms.classify(name) {
                return self
                    .eval_form(form, range, args)
                    .map_err(|e| e.with_span(span));
            }
            return self.eval_named_call(name, args, span);
        }

        match self.eval(head)? {
            Value::Function(function) => self.invoke(&function, args, span),
            other => Err(not_callable(other.type_name()).with_span(span)),
        }
    }

    /// Evaluate a sequence, returning the last value (`nil` if empty).
    pub(crate) fn eval_body(&mut self, body: ExprRange) -> EvalResult {
        let arena = self.arena;
        let mut last = Value::nil();
        for &expr in arena.get_expr_list(body) {
            last = self.eval(expr)?;
        }
        Ok(last)
    }

    #[inline]
    pub(crate) fn name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }
}

#[cfg(test)]
mod tests;
