//! Special-form and operator classification for list heads.
//!
//! Keywords are pre-interned once so classifying a list head is a single
//! hash lookup on a `Name` instead of a string comparison chain.

use rustc_hash::FxHashMap;

use crate::{ArithOp, CmpOp, Name, StringInterner};

/// What a list head identifier denotes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Form {
    Print,
    Set,
    Const,
    If,
    Not,
    And,
    Or,
    While,
    Defun,
    Lambda,
    Quote,
    Arith(ArithOp),
    Compare(CmpOp),
}

impl Form {
    /// Source keyword for this form.
    pub fn keyword(self) -> &'static str {
        match self {
            Form::Print => "print",
            Form::Set => "set",
            Form::Const => "const",
            Form::If => "if",
            Form::Not => "not",
            Form::And => "and",
            Form::Or => "or",
            Form::While => "while",
            Form::Defun => "defun",
            Form::Lambda => "lambda",
            Form::Quote => "quote",
            Form::Arith(op) => op.as_symbol(),
            Form::Compare(op) => op.as_symbol(),
        }
    }
}

const KEYWORD_FORMS: [Form; 11] = [
    Form::Print,
    Form::Set,
    Form::Const,
    Form::If,
    Form::Not,
    Form::And,
    Form::Or,
    Form::While,
    Form::Defun,
    Form::Lambda,
    Form::Quote,
];

const ARITH_OPS: [ArithOp; 4] = [ArithOp::Add, ArithOp::Sub, ArithOp::Mul, ArithOp::Div];

const CMP_OPS: [CmpOp; 6] = [
    CmpOp::Lt,
    CmpOp::Gt,
    CmpOp::Eq,
    CmpOp::Ne,
    CmpOp::Le,
    CmpOp::Ge,
];

/// Pre-interned keyword table.
#[derive(Clone, Debug)]
pub struct FormTable {
    forms: FxHashMap<Name, Form>,
    /// `nil`, bound to the empty list by the interpreter.
    pub nil: Name,
    /// `quote`, used by the quote builder for nested short quotes.
    pub quote: Name,
    /// `let`, used by the quote builder to rebuild quoted `let` forms.
    pub let_: Name,
}

impl FormTable {
    pub fn new(interner: &StringInterner) -> Self {
        let mut forms = FxHashMap::default();
        let all = KEYWORD_FORMS
            .into_iter()
            .chain(ARITH_OPS.into_iter().map(Form::Arith))
            .chain(CMP_OPS.into_iter().map(Form::Compare));
        for form in all {
            forms.insert(interner.intern(form.keyword()), form);
        }
        FormTable {
            forms,
            nil: interner.intern("nil"),
            quote: interner.intern("quote"),
            let_: interner.intern("let"),
        }
    }

    /// Classify a list head identifier.
    #[inline]
    pub fn classify(&self, head: Name) -> Option<Form> {
        self.forms.get(&head).copied()
    }
}
