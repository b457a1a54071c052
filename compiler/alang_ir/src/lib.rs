//! Alang IR - syntax tree types shared by both execution backends.
//!
//! This crate contains the data structures every other alang crate consumes:
//! - Names for interned identifiers
//! - Spans for source locations
//! - The flat expression arena produced by the reader
//! - Operator and special-form classification
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers and string literals become `Name(u32)`
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId(u32)` indices
//!   and child lists are `ExprRange`s into a side table
//! - **One keyword table**: the interpreter and the lowering pass classify list
//!   heads through the same [`FormTable`], so the two backends cannot disagree
//!   on what counts as a special form

mod ast;
mod expr_id;
mod form;
mod interner;
mod name;
mod operators;
mod span;
mod stack;

pub use ast::{Expr, ExprArena, ExprKind, LetBinding, Program, QuoteForm};
pub use expr_id::{BindingRange, ExprId, ExprRange};
pub use form::{Form, FormTable};
pub use interner::StringInterner;
pub use name::Name;
pub use operators::{ArithOp, CmpOp};
pub use span::Span;
pub use stack::ensure_sufficient_stack;
