//! Runtime values.
//!
//! Strings and symbols are interned `Name`s: the language has no string
//! operations, so every string value originates from a literal. Lists and
//! functions are reference counted and never mutated after construction.

use std::fmt;
use std::rc::Rc;

use alang_ir::{ExprRange, Name, StringInterner};

use crate::environment::Captures;

/// A runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// 64-bit signed integer.
    Int(i64),
    /// String literal contents.
    Str(Name),
    /// Identifier as data, produced only by quoting.
    Symbol(Name),
    /// Quoted compound data, and the empty list bound to `nil`.
    List(Rc<[Value]>),
    /// Closure created by `defun` or `lambda`.
    Function(Rc<FunctionValue>),
}

/// A function value with its definition-time closure snapshot.
#[derive(Clone, Debug)]
pub struct FunctionValue {
    /// `Some` for `defun`, `None` for `lambda`.
    pub name: Option<Name>,
    pub params: Vec<Name>,
    /// Body expressions, evaluated in order.
    pub body: ExprRange,
    /// Flattened copy of every binding visible at creation.
    pub captures: Captures,
}

impl FunctionValue {
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl PartialEq for FunctionValue {
    /// Function values compare by identity.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Value {
    /// The empty list.
    pub fn nil() -> Self {
        Value::List(Rc::from(Vec::new()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::from(items))
    }

    pub fn function(function: FunctionValue) -> Self {
        Value::Function(Rc::new(function))
    }

    /// Truthiness: zero, empty text and the empty list are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Str(text) | Value::Symbol(text) => *text != Name::EMPTY,
            Value::List(items) => !items.is_empty(),
            Value::Function(_) => true,
        }
    }

    /// Type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Function(_) => "function",
        }
    }

    /// Render with the `print` rules.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> ValueDisplay<'a> {
        ValueDisplay {
            value: self,
            interner,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Int(i64::from(b))
    }
}

/// [`Value`] paired with the interner needed to render names.
pub struct ValueDisplay<'a> {
    value: &'a Value,
    interner: &'a StringInterner,
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(name) | Value::Symbol(name) => f.write_str(self.interner.lookup(*name)),
            Value::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item.display(self.interner))?;
                }
                f.write_str(")")
            }
            Value::Function(_) => f.write_str("#<function>"),
        }
    }
}

#[cfg(test)]
mod tests;
