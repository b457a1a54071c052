//! Special forms, arithmetic and conditions.

use alang_ir::{ArithOp, CmpOp, ExprId, ExprRange, Form, Name};

use super::Interpreter;
use crate::errors::{
    cannot_assign_immutable, division_by_zero, duplicate_const, loop_limit_exceeded,
    malformed_form, not_an_integer, not_numeric, operator_arity, unknown_operator, EvalError,
};
use crate::quote::quote;
use crate::{AssignError, EvalResult, FunctionValue, Value};

/// Apply one step of a left fold.
pub(crate) fn apply_arith(op: ArithOp, acc: i64, operand: i64) -> Result<i64, EvalError> {
    Ok(match op {
        ArithOp::Add => acc.wrapping_add(operand),
        ArithOp::Sub => acc.wrapping_sub(operand),
        ArithOp::Mul => acc.wrapping_mul(operand),
        ArithOp::Div => {
            if operand == 0 {
                return Err(division_by_zero());
            }
            acc.wrapping_div(operand)
        }
    })
}

impl Interpreter<'_> {
    /// Evaluate a list whose head is a keyword. `range` covers the whole
    /// list including the head; `args` is everything after it.
    pub(super) fn eval_form(&mut self, form: Form, range: ExprRange, args: &[ExprId]) -> EvalResult {
        match form {
            Form::Print => self.eval_print(args),
            Form::Set => {
                let [target, init] = args else {
                    return Err(malformed_form("set", "expects a name and a value"));
                };
                let name = self.binding_target("set", *target)?;
                let value = self.eval(*init)?;
                self.assign(name, value.clone())?;
                Ok(value)
            }
            Form::Const => {
                let [target, init] = args else {
                    return Err(malformed_form("const", "expects a name and a value"));
                };
                let name = self.binding_target("const", *target)?;
                let value = self.eval(*init)?;
                match self.env.define_const(name, value.clone()) {
                    Ok(()) => Ok(value),
                    Err(_) => Err(duplicate_const(self.name(name))),
                }
            }
            Form::If => {
                let [cond, then_branch, else_branch] = args else {
                    return Err(malformed_form(
                        "if",
                        "expects a condition, a then branch and an else branch",
                    ));
                };
                if self.eval_condition(*cond)? {
                    self.eval(*then_branch)
                } else {
                    self.eval(*else_branch)
                }
            }
            Form::Not => {
                let [operand] = args else {
                    return Err(malformed_form("not", "expects exactly one operand"));
                };
                Ok(Value::from(!self.eval(*operand)?.is_truthy()))
            }
            Form::And => {
                for &operand in args {
                    if !self.eval(operand)?.is_truthy() {
                        return Ok(Value::Int(0));
                    }
                }
                Ok(Value::Int(1))
            }
            Form::Or => {
                for &operand in args {
                    if self.eval(operand)?.is_truthy() {
                        return Ok(Value::Int(1));
                    }
                }
                Ok(Value::Int(0))
            }
            Form::While => self.eval_while(args),
            Form::Defun => {
                let [name, params, _, ..] = args else {
                    return Err(malformed_form(
                        "defun",
                        "expects a name, a parameter list and a body",
                    ));
                };
                let name = self.binding_target("defun", *name)?;
                let params = self.params("defun", *params)?;
                tracing::debug!(function = self.name(name), arity = params.len(), "defun");
                let function = Value::function(FunctionValue {
                    name: Some(name),
                    params,
                    body: range.skip(3),
                    captures: self.env.snapshot(),
                });
                self.env
                    .define_function(name, function)
                    .map_err(|_| cannot_assign_immutable(self.name(name)))?;
                Ok(Value::Int(0))
            }
            Form::Lambda => {
                let [params, _, ..] = args else {
                    return Err(malformed_form("lambda", "expects a parameter list and a body"));
                };
                let params = self.params("lambda", *params)?;
                Ok(Value::function(FunctionValue {
                    name: None,
                    params,
                    body: range.skip(2),
                    captures: self.env.snapshot(),
                }))
            }
            Form::Quote => {
                let [datum] = args else {
                    return Err(malformed_form("quote", "expects exactly one datum"));
                };
                Ok(quote(self.arena, &self.forms, *datum))
            }
            Form::Arith(op) => self.eval_arith(op, args),
            Form::Compare(op) => Err(unknown_operator(op.as_symbol())),
        }
    }

    fn eval_print(&mut self, args: &[ExprId]) -> EvalResult {
        if args.is_empty() {
            return Err(malformed_form("print", "expects at least one argument"));
        }
        for &arg in args {
            let value = self.eval(arg)?;
            let line = value.display(self.interner).to_string();
            self.print_handler.println(&line);
        }
        Ok(Value::Int(0))
    }

    fn eval_while(&mut self, args: &[ExprId]) -> EvalResult {
        let Some((&cond, body)) = args.split_first().filter(|(_, body)| !body.is_empty()) else {
            return Err(malformed_form(
                "while",
                "expects a condition and at least one body expression",
            ));
        };

        let mut iterations: u64 = 0;
        while self.eval_condition(cond)? {
            for &expr in body {
                self.eval(expr)?;
            }
            iterations += 1;
            if let Some(limit) = self.config.loop_limit {
                if iterations >= limit {
                    tracing::debug!(limit, "while loop guard tripped");
                    return Err(loop_limit_exceeded(limit));
                }
            }
        }
        Ok(Value::Int(0))
    }

    fn eval_arith(&mut self, op: ArithOp, operands: &[ExprId]) -> EvalResult {
        let expected = match op.min_operands() {
            1 => "at least 1",
            _ => "at least 2",
        };
        let Some((&first, rest)) = operands
            .split_first()
            .filter(|_| operands.len() >= op.min_operands())
        else {
            return Err(operator_arity(op.as_symbol(), expected, operands.len()));
        };

        let mut acc = self.eval_int(first)?;
        if rest.is_empty() {
            // Only `-` accepts a single operand.
            return Ok(Value::Int(acc.wrapping_neg()));
        }
        for &operand in rest {
            let value = self.eval_int(operand)?;
            acc = apply_arith(op, acc, value).map_err(|e| e.with_span(self.arena.span(operand)))?;
        }
        Ok(Value::Int(acc))
    }

    /// Evaluate an `if`/`while` condition.
    ///
    /// A comparison form compares two integers; anything else is evaluated
    /// and tested for truthiness.
    pub(crate) fn eval_condition(&mut self, id: ExprId) -> Result<bool, EvalError> {
        let arena = self.arena;
        if let Some((&head, operands)) = arena.as_list(id).and_then(<[ExprId]>::split_first) {
            if let Some(Form::Compare(op)) = arena.as_ident(head).and_then(|n| self.forms.classify(n))
            {
                return self
                    .eval_comparison(op, operands)
                    .map_err(|e| e.with_span(arena.span(id)));
            }
        }
        Ok(self.eval(id)?.is_truthy())
    }

    fn eval_comparison(&mut self, op: CmpOp, operands: &[ExprId]) -> Result<bool, EvalError> {
        let [left, right] = operands else {
            return Err(operator_arity(op.as_symbol(), "exactly 2", operands.len()));
        };
        let left = self.eval_int(*left)?;
        let right = self.eval_int(*right)?;
        Ok(op.apply(left, right))
    }

    /// Evaluate and coerce to an integer.
    fn eval_int(&mut self, id: ExprId) -> Result<i64, EvalError> {
        let value = self.eval(id)?;
        self.to_int(&value)
            .map_err(|e| e.with_span(self.arena.span(id)))
    }

    /// Integers pass through; strings must parse as a decimal integer.
    pub(crate) fn to_int(&self, value: &Value) -> Result<i64, EvalError> {
        match value {
            Value::Int(n) => Ok(*n),
            Value::Str(text) => {
                let text = self.name(*text);
                text.parse::<i64>().map_err(|_| not_numeric(text))
            }
            other => Err(not_an_integer(other.type_name())),
        }
    }

    fn assign(&mut self, name: Name, value: Value) -> Result<(), EvalError> {
        self.env.assign(name, value).map_err(|err| match err {
            AssignError::Frozen | AssignError::AlreadyConst => {
                cannot_assign_immutable(self.name(name))
            }
        })
    }

    fn binding_target(&self, form: &'static str, id: ExprId) -> Result<Name, EvalError> {
        self.arena
            .as_ident(id)
            .ok_or_else(|| malformed_form(form, "target must be an identifier"))
    }

    fn params(&self, form: &'static str, id: ExprId) -> Result<Vec<Name>, EvalError> {
        let malformed = || malformed_form(form, "parameters must be a list of identifiers");
        let items = self.arena.as_list(id).ok_or_else(malformed)?;
        items
            .iter()
            .map(|&item| self.arena.as_ident(item).ok_or_else(malformed))
            .collect()
    }
}
