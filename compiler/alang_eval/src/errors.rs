//! Runtime error types for the interpreter.
//!
//! `EvalErrorKind` gives every failure a typed category. Factory functions
//! (e.g. `division_by_zero()`) are the construction API; evaluation code
//! attaches the span of the offending expression with [`EvalError::with_span`].

use alang_ir::Span;

use crate::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    // Access
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },
    #[error("undefined function: {name}")]
    UndefinedFunction { name: String },

    // Coercion
    #[error("expected an integer, got {type_name}")]
    NotAnInteger { type_name: &'static str },
    #[error("string is not a number: \"{text}\"")]
    NotNumeric { text: String },

    // Calls and operators
    #[error("{name} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("operator `{op}` expects {expected} operand(s), got {got}")]
    OperatorArity {
        op: &'static str,
        expected: &'static str,
        got: usize,
    },
    #[error("value of type {type_name} is not callable")]
    NotCallable { type_name: &'static str },
    #[error("comparison `{op}` is only valid in a condition")]
    UnknownOperator { op: &'static str },
    #[error("unknown form: {form}")]
    UnknownForm { form: String },
    #[error("malformed `{form}`: {reason}")]
    MalformedForm {
        form: &'static str,
        reason: &'static str,
    },

    // Arithmetic
    #[error("division by zero")]
    DivisionByZero,

    // Bindings
    #[error("cannot assign to constant `{name}`")]
    ImmutableBinding { name: String },
    #[error("constant `{name}` is already defined")]
    DuplicateConst { name: String },

    // Resources
    #[error("loop reached the limit of {limit} iterations")]
    LoopLimitExceeded { limit: u64 },
}

impl EvalErrorKind {
    /// Both ways of touching a frozen binding: `set` on it, or `const` again.
    pub fn is_frozen_binding(&self) -> bool {
        matches!(
            self,
            EvalErrorKind::ImmutableBinding { .. } | EvalErrorKind::DuplicateConst { .. }
        )
    }
}

/// Evaluation error.
///
/// Evaluation is fail-fast: the first error aborts the run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Innermost expression that failed, when known.
    pub span: Option<Span>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError { kind, span: None }
    }

    /// Attach a source span unless a more precise one is already present.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::from_kind(kind)
    }
}

// Factory functions

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedFunction {
        name: name.to_string(),
    })
}

#[cold]
pub fn not_an_integer(type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotAnInteger { type_name })
}

#[cold]
pub fn not_numeric(text: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotNumeric {
        text: text.to_string(),
    })
}

#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn operator_arity(op: &'static str, expected: &'static str, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::OperatorArity { op, expected, got })
}

#[cold]
pub fn not_callable(type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable { type_name })
}

#[cold]
pub fn unknown_operator(op: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownOperator { op })
}

#[cold]
pub fn unknown_form(form: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownForm {
        form: form.to_string(),
    })
}

#[cold]
pub fn malformed_form(form: &'static str, reason: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MalformedForm { form, reason })
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn cannot_assign_immutable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ImmutableBinding {
        name: name.to_string(),
    })
}

#[cold]
pub fn duplicate_const(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateConst {
        name: name.to_string(),
    })
}

#[cold]
pub fn loop_limit_exceeded(limit: u64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::LoopLimitExceeded { limit })
}
