//! Function invocation.

use alang_ir::{ExprId, Name, Span};

use super::Interpreter;
use crate::errors::{arity_mismatch, not_callable, undefined_function};
use crate::{EvalResult, FunctionValue, Mutability, Value};

impl Interpreter<'_> {
    /// `(name args...)`: resolve `name` through the scope chain.
    pub(super) fn eval_named_call(&mut self, name: Name, args: &[ExprId], span: Span) -> EvalResult {
        match self.env.lookup(name) {
            Some(Value::Function(function)) => self.invoke(&function, args, span),
            Some(other) => Err(not_callable(other.type_name()).with_span(span)),
            None => Err(undefined_function(self.name(name)).with_span(span)),
        }
    }

    /// Call `function` with arguments evaluated in the caller's scope.
    ///
    /// The body runs with the closure snapshot pushed on top of the current
    /// stack and a fresh frame binding the parameters above that. Both frames
    /// are popped on return, including error returns.
    pub(crate) fn invoke(
        &mut self,
        function: &FunctionValue,
        args: &[ExprId],
        span: Span,
    ) -> EvalResult {
        let mut values = Vec::with_capacity(args.len());
        for &arg in args {
            values.push(self.eval(arg)?);
        }

        let display_name = function.name.map_or("<lambda>", |n| self.name(n));
        if values.len() != function.arity() {
            return Err(arity_mismatch(display_name, function.arity(), values.len()).with_span(span));
        }

        tracing::trace!(
            function = display_name,
            depth = self.env.depth(),
            "invoking function"
        );

        self.with_call_scope(&function.captures, |scoped| {
            for (&param, value) in function.params.iter().zip(values) {
                scoped.env.define(param, value, Mutability::Mutable);
            }
            scoped.eval_body(function.body)
        })
    }
}
