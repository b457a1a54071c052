//! Lowering and verification errors.

use alang_ir::Span;

use crate::ir::{BlockId, SlotId, StrId, Type, UnitId, ValueId};

/// Error produced while lowering a program. The first error aborts lowering.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    #[error("unknown form: {form}")]
    UnknownForm { form: String, span: Span },

    #[error("comparison `{op}` is only valid in a condition")]
    UnknownOperator { op: &'static str, span: Span },

    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String, span: Span },

    #[error("malformed `{form}`: {reason}")]
    MalformedForm {
        form: &'static str,
        reason: &'static str,
        span: Span,
    },

    #[error("operator `{op}` expects {expected} operand(s), got {got}")]
    OperatorArity {
        op: &'static str,
        expected: &'static str,
        got: usize,
        span: Span,
    },

    #[error("{name} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("cannot assign to constant `{name}`")]
    ImmutableBinding { name: String, span: Span },

    #[error("constant `{name}` is already defined")]
    DuplicateConst { name: String, span: Span },

    #[error("division by zero")]
    DivisionByZero { span: Span },

    #[error("function `{name}` is defined more than once")]
    Redefinition { name: String, span: Span },

    #[error("{construct} is not supported by the compiled backend")]
    Unsupported { construct: &'static str, span: Span },

    #[error("module verification failed: {0}")]
    Verify(#[from] VerifyError),
}

impl LowerError {
    /// Source location, if the error has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            LowerError::UnknownForm { span, .. }
            | LowerError::UnknownOperator { span, .. }
            | LowerError::UndefinedVariable { span, .. }
            | LowerError::MalformedForm { span, .. }
            | LowerError::OperatorArity { span, .. }
            | LowerError::ArityMismatch { span, .. }
            | LowerError::ImmutableBinding { span, .. }
            | LowerError::DuplicateConst { span, .. }
            | LowerError::DivisionByZero { span }
            | LowerError::Redefinition { span, .. }
            | LowerError::Unsupported { span, .. } => Some(*span),
            LowerError::Verify(_) => None,
        }
    }
}

/// Structural defect found by the module verifier.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("module has no entry unit {main}")]
    MissingMain { main: UnitId },

    #[error("unit `{name}` is defined more than once")]
    DuplicateUnit { name: String },

    #[error("unit `{unit}` is declared but never defined")]
    MissingBody { unit: String },

    #[error("unit `{unit}` has an empty body")]
    NoBlocks { unit: String },

    #[error("unit `{unit}` declares {expected} parameter(s) but its body has {got}")]
    ParamCount {
        unit: String,
        expected: usize,
        got: usize,
    },

    #[error("{unit}/{block}: block id does not match its position")]
    BlockIdMismatch { unit: String, block: BlockId },

    #[error("{unit}/{block}: missing terminator")]
    MissingTerminator { unit: String, block: BlockId },

    #[error("{unit}/{block}: alloca outside the entry block")]
    AllocaOutsideEntry { unit: String, block: BlockId },

    #[error("{unit}/{block}: {value} is used but never defined")]
    UndefinedValue {
        unit: String,
        block: BlockId,
        value: ValueId,
    },

    #[error("{unit}/{block}: {value} is used before its definition")]
    UseBeforeDef {
        unit: String,
        block: BlockId,
        value: ValueId,
    },

    #[error("{unit}/{block}: {value} is defined more than once")]
    Redefined {
        unit: String,
        block: BlockId,
        value: ValueId,
    },

    #[error("{unit}/{block}: {value} has type {found:?}, expected {expected:?}")]
    TypeMismatch {
        unit: String,
        block: BlockId,
        value: ValueId,
        expected: Type,
        found: Type,
    },

    #[error("{unit}/{block}: branch to nonexistent {target}")]
    InvalidTarget {
        unit: String,
        block: BlockId,
        target: BlockId,
    },

    #[error("{unit}/{block}: phi after a non-phi instruction")]
    MisplacedPhi { unit: String, block: BlockId },

    #[error("{unit}/{block}: phi incoming edges do not match predecessors: {reason}")]
    PhiIncoming {
        unit: String,
        block: BlockId,
        reason: &'static str,
    },

    #[error("{unit}/{block}: call to nonexistent unit {callee}")]
    InvalidCallee {
        unit: String,
        block: BlockId,
        callee: UnitId,
    },

    #[error("{unit}/{block}: call to `{callee}` passes {got} argument(s), expected {expected}")]
    CallArity {
        unit: String,
        block: BlockId,
        callee: String,
        expected: usize,
        got: usize,
    },

    #[error("{unit}/{block}: reference to nonexistent slot {slot}")]
    InvalidSlot {
        unit: String,
        block: BlockId,
        slot: SlotId,
    },

    #[error("{unit}/{block}: slot {slot} is allocated more than once")]
    DuplicateAlloca {
        unit: String,
        block: BlockId,
        slot: SlotId,
    },

    #[error("{unit}/{block}: reference to nonexistent string {string}")]
    InvalidString {
        unit: String,
        block: BlockId,
        string: StrId,
    },
}
