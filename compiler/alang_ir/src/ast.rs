//! Syntax tree nodes and the arena that owns them.
//!
//! The reader hands both backends a [`Program`]: one arena plus the ordered
//! top-level expressions. Node kinds are exactly what the grammar produces;
//! special forms are ordinary `List` nodes whose head identifier is looked up
//! in the [`FormTable`](crate::FormTable) by each backend.

use crate::{BindingRange, ExprId, ExprRange, Name, Span};

/// How a quoted datum was written.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum QuoteForm {
    /// `'datum`
    Short,
    /// `(quote datum)`
    Long,
}

/// Expression node kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExprKind {
    /// Integer literal.
    Int(i64),
    /// String literal, quote characters already stripped.
    Str(Name),
    /// Identifier / symbol reference.
    Ident(Name),
    /// Quoted datum (short or long form).
    Quote { datum: ExprId, form: QuoteForm },
    /// Parenthesized list: every special form and every call.
    List(ExprRange),
    /// `(let ((name init)*) body+)`
    Let { bindings: BindingRange, body: ExprRange },
}

/// Expression node: kind plus source location.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// One `(name init)` pair of a `let` form.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LetBinding {
    pub name: Name,
    pub init: ExprId,
    pub span: Span,
}

/// Flat storage for expression nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    bindings: Vec<LetBinding>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node and return its ID.
    ///
    /// # Panics
    /// Panics if the arena grows past `u32::MAX - 1` nodes.
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let index = u32::try_from(self.exprs.len())
            .ok()
            .filter(|&i| i != u32::MAX)
            .unwrap_or_else(|| panic!("expression arena exceeded u32::MAX nodes"));
        self.exprs.push(expr);
        ExprId::new(index)
    }

    /// Store a child list and return its range.
    pub fn alloc_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = Self::table_index(self.expr_lists.len());
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, Self::table_index(ids.len()))
    }

    /// Store a `let` binding group and return its range.
    pub fn alloc_bindings(&mut self, bindings: &[LetBinding]) -> BindingRange {
        let start = Self::table_index(self.bindings.len());
        self.bindings.extend_from_slice(bindings);
        BindingRange::new(start, Self::table_index(bindings.len()))
    }

    fn table_index(len: usize) -> u32 {
        u32::try_from(len).unwrap_or_else(|_| panic!("arena side table exceeded u32::MAX"))
    }

    /// Get an expression by ID.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: ExprId) -> ExprKind {
        self.exprs[id.index()].kind
    }

    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.exprs[id.index()].span
    }

    /// Resolve a child list.
    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Resolve a `let` binding group.
    #[inline]
    pub fn get_bindings(&self, range: BindingRange) -> &[LetBinding] {
        let start = range.start as usize;
        &self.bindings[start..start + range.len()]
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// If `id` is an identifier, return its name.
    #[inline]
    pub fn as_ident(&self, id: ExprId) -> Option<Name> {
        match self.kind(id) {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// If `id` is a list form, return its elements.
    #[inline]
    pub fn as_list(&self, id: ExprId) -> Option<&[ExprId]> {
        match self.kind(id) {
            ExprKind::List(range) => Some(self.get_expr_list(range)),
            _ => None,
        }
    }
}

/// A parsed program: the arena plus the ordered top-level expressions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    pub arena: ExprArena,
    pub roots: Vec<ExprId>,
}
