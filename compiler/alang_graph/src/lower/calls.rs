//! Function definitions, call sites and the signature pre-pass.

use alang_ir::{ExprId, ExprRange, Form, Name, Span};

use super::{Lowerer, UnitState};
use crate::errors::LowerError;
use crate::ir::{Operand, UnitId};

impl Lowerer<'_> {
    /// Register every well-formed top-level `defun` before lowering.
    pub(super) fn presolve(&mut self, roots: &[ExprId]) {
        let arena = self.arena;
        for &root in roots {
            let Some([head, name, params, _, ..]) = arena.as_list(root) else {
                continue;
            };
            if arena.as_ident(*head).and_then(|n| self.forms.classify(n)) != Some(Form::Defun) {
                continue;
            }
            let (Some(name), Some(params)) = (arena.as_ident(*name), arena.as_list(*params))
            else {
                continue;
            };
            if self.registry.get(name).is_some() {
                continue;
            }
            let unit = self.module.declare_unit(name, params.len());
            self.registry.declare(name, unit, params.len());
            tracing::trace!(
                function = self.interner.lookup(name),
                arity = params.len(),
                "signature registered ahead of lowering"
            );
        }
    }

    /// `defun`: lower the body into its own unit and yield 0.
    pub(super) fn lower_defun(
        &mut self,
        range: ExprRange,
        args: &[ExprId],
        span: Span,
    ) -> Result<Operand, LowerError> {
        let [name, params, _, ..] = args else {
            return Err(LowerError::MalformedForm {
                form: "defun",
                reason: "expects a name, a parameter list and a body",
                span,
            });
        };
        let name = self.binding_target("defun", *name)?;
        let params = self.params(*params)?;
        let arity = params.len();
        let unit = self.define_unit(name, arity, span)?;

        let outer = std::mem::replace(&mut self.current, UnitState::new(unit, arity));
        self.in_progress.push(unit);
        let lowered = self.lower_function_body(&params, range.skip(3));
        self.in_progress.pop();
        let inner = std::mem::replace(&mut self.current, outer);
        let result = lowered?;

        let mut builder = inner.builder;
        builder.terminate_ret(result);
        let body = builder.finish();
        tracing::debug!(
            function = self.interner.lookup(name),
            arity,
            blocks = body.blocks.len(),
            slots = body.slots.len(),
            "lowered unit"
        );
        if let Some(unit) = self.module.unit_mut(unit) {
            unit.body = Some(body);
        }
        Ok(Operand::Const(0))
    }

    /// Find or create the unit for a definition of `name`.
    ///
    /// A unit created by the pre-pass or by an earlier call site is reused,
    /// taking the definition's arity. Call sites already lowered against an
    /// inferred arity keep theirs; the verifier reports any disagreement.
    fn define_unit(&mut self, name: Name, arity: usize, span: Span) -> Result<UnitId, LowerError> {
        let unit = match self.registry.get(name) {
            Some(signature) => {
                let defined = self
                    .module
                    .unit(signature.unit)
                    .is_some_and(|u| u.body.is_some());
                if defined || self.in_progress.contains(&signature.unit) {
                    return Err(LowerError::Redefinition {
                        name: self.name(name),
                        span,
                    });
                }
                if signature.arity != arity {
                    tracing::debug!(
                        function = self.interner.lookup(name),
                        inferred = signature.arity,
                        declared = arity,
                        "definition arity differs from inferred signature"
                    );
                }
                if let Some(unit) = self.module.unit_mut(signature.unit) {
                    unit.arity = arity;
                }
                signature.unit
            }
            None => self.module.declare_unit(name, arity),
        };
        self.registry.declare(name, unit, arity);
        Ok(unit)
    }

    /// Store each parameter into its own slot, then lower the body.
    fn lower_function_body(
        &mut self,
        params: &[Name],
        body: ExprRange,
    ) -> Result<Operand, LowerError> {
        let values = self.current.builder.params().to_vec();
        for (&name, value) in params.iter().zip(values) {
            let slot = self.fb().alloca(name, false);
            self.current.bind_inner(name, slot);
            self.fb().emit_store(slot, Operand::Value(value));
        }
        self.lower_body(body)
    }

    /// Named call. Arguments are lowered first, left to right.
    ///
    /// An unknown callee is registered speculatively with the call's
    /// argument count so forward references lower in a single pass.
    pub(super) fn lower_call(
        &mut self,
        name: Name,
        args: &[ExprId],
        span: Span,
    ) -> Result<Operand, LowerError> {
        // A local slot shadows any function of the same name.
        if self.current.lookup(name).is_some() {
            return Err(LowerError::Unsupported {
                construct: "a call through a variable",
                span,
            });
        }
        let mut operands = Vec::with_capacity(args.len());
        for &arg in args {
            operands.push(self.lower_expr(arg)?);
        }

        let callee = match self.registry.get(name) {
            Some(signature) if signature.arity == operands.len() => signature.unit,
            Some(signature) => {
                return Err(LowerError::ArityMismatch {
                    name: self.name(name),
                    expected: signature.arity,
                    got: operands.len(),
                    span,
                });
            }
            None => {
                let unit = self.module.declare_unit(name, operands.len());
                self.registry.infer(name, unit, operands.len());
                tracing::debug!(
                    function = self.interner.lookup(name),
                    arity = operands.len(),
                    "forward reference registered from call site"
                );
                unit
            }
        };
        Ok(Operand::Value(self.fb().emit_call(callee, operands)))
    }

    fn params(&self, id: ExprId) -> Result<Vec<Name>, LowerError> {
        let malformed = || LowerError::MalformedForm {
            form: "defun",
            reason: "parameters must be a list of identifiers",
            span: self.arena.span(id),
        };
        let items = self.arena.as_list(id).ok_or_else(malformed)?;
        items
            .iter()
            .map(|&item| self.arena.as_ident(item).ok_or_else(malformed))
            .collect()
    }
}
