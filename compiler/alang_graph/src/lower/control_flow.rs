//! Branching forms: `if`, `not`, `and`, `or`, `while` and conditions.

use alang_ir::{CmpOp, ExprId, Form, Span};
use smallvec::smallvec;

use super::Lowerer;
use crate::errors::LowerError;
use crate::ir::{Operand, PhiIncoming, ValueId};

impl Lowerer<'_> {
    /// `if` as an expression: both arms jump to a merge block whose phi
    /// selects the arm's value by predecessor.
    pub(super) fn lower_if(&mut self, args: &[ExprId], span: Span) -> Result<Operand, LowerError> {
        let [cond, then_branch, else_branch] = args else {
            return Err(LowerError::MalformedForm {
                form: "if",
                reason: "expects a condition, a then branch and an else branch",
                span,
            });
        };
        let cond = self.lower_condition(*cond)?;

        let fb = self.fb();
        let then_block = fb.new_block();
        let else_block = fb.new_block();
        let merge_block = fb.new_block();
        fb.terminate_cond_br(cond, then_block, else_block);

        self.fb().position_at(then_block);
        let then_value = self.lower_expr(*then_branch)?;
        // The arm may have split blocks; the edge leaves from where it ended.
        let then_exit = self.fb().current_block();
        self.fb().terminate_br(merge_block);

        self.fb().position_at(else_block);
        let else_value = self.lower_expr(*else_branch)?;
        let else_exit = self.fb().current_block();
        self.fb().terminate_br(merge_block);

        self.fb().position_at(merge_block);
        let phi = self
            .fb()
            .emit_phi(smallvec![(then_exit, then_value), (else_exit, else_value)]);
        Ok(Operand::Value(phi))
    }

    pub(super) fn lower_not(&mut self, args: &[ExprId], span: Span) -> Result<Operand, LowerError> {
        let [operand] = args else {
            return Err(LowerError::MalformedForm {
                form: "not",
                reason: "expects exactly one operand",
                span,
            });
        };
        let value = self.lower_expr(*operand)?;
        let is_zero = self.fb().emit_cmp(CmpOp::Eq, value, Operand::Const(0));
        Ok(Operand::Value(self.fb().emit_zext(is_zero)))
    }

    /// Short-circuit `and` (`is_and`) or `or`.
    ///
    /// Each operand is tested in its own block; a deciding operand jumps
    /// straight to the merge block with the short-circuit result, and the
    /// fall-through after the last operand carries the other result.
    pub(super) fn lower_logic(
        &mut self,
        args: &[ExprId],
        is_and: bool,
    ) -> Result<Operand, LowerError> {
        let (short_circuit, fall_through) = if is_and { (0, 1) } else { (1, 0) };
        if args.is_empty() {
            return Ok(Operand::Const(fall_through));
        }

        let merge_block = self.fb().new_block();
        let mut incoming = PhiIncoming::new();
        for &arg in args {
            let value = self.lower_expr(arg)?;
            let truthy = self.fb().emit_cmp(CmpOp::Ne, value, Operand::Const(0));
            let next = self.fb().new_block();
            let from = self.fb().current_block();
            if is_and {
                self.fb().terminate_cond_br(truthy, next, merge_block);
            } else {
                self.fb().terminate_cond_br(truthy, merge_block, next);
            }
            incoming.push((from, Operand::Const(short_circuit)));
            self.fb().position_at(next);
        }
        let from = self.fb().current_block();
        self.fb().terminate_br(merge_block);
        incoming.push((from, Operand::Const(fall_through)));

        self.fb().position_at(merge_block);
        Ok(Operand::Value(self.fb().emit_phi(incoming)))
    }

    /// `while`: condition block, body block with a back edge, exit block.
    /// Yields 0. There is no iteration guard in compiled code.
    pub(super) fn lower_while(
        &mut self,
        args: &[ExprId],
        span: Span,
    ) -> Result<Operand, LowerError> {
        let Some((&cond, body)) = args.split_first().filter(|(_, body)| !body.is_empty()) else {
            return Err(LowerError::MalformedForm {
                form: "while",
                reason: "expects a condition and at least one body expression",
                span,
            });
        };

        let fb = self.fb();
        let cond_block = fb.new_block();
        let body_block = fb.new_block();
        let after_block = fb.new_block();
        fb.terminate_br(cond_block);

        self.fb().position_at(cond_block);
        let cond = self.lower_condition(cond)?;
        self.fb().terminate_cond_br(cond, body_block, after_block);

        self.fb().position_at(body_block);
        for &expr in body {
            self.lower_expr(expr)?;
        }
        self.fb().terminate_br(cond_block);

        self.fb().position_at(after_block);
        Ok(Operand::Const(0))
    }

    /// Lower an `if`/`while` condition to an `i1`.
    ///
    /// A comparison form becomes one `Cmp`; any other expression is tested
    /// against zero.
    pub(super) fn lower_condition(&mut self, id: ExprId) -> Result<ValueId, LowerError> {
        let arena = self.arena;
        if let Some((&head, operands)) = arena.as_list(id).and_then(<[ExprId]>::split_first) {
            if let Some(Form::Compare(op)) = arena.as_ident(head).and_then(|n| self.forms.classify(n))
            {
                let [left, right] = operands else {
                    return Err(LowerError::OperatorArity {
                        op: op.as_symbol(),
                        expected: "exactly 2",
                        got: operands.len(),
                        span: arena.span(id),
                    });
                };
                let left = self.lower_expr(*left)?;
                let right = self.lower_expr(*right)?;
                return Ok(self.fb().emit_cmp(op, left, right));
            }
        }
        let value = self.lower_expr(id)?;
        Ok(self.fb().emit_cmp(CmpOp::Ne, value, Operand::Const(0)))
    }
}
