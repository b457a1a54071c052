//! Expression IDs and ranges for the flat syntax tree.
//!
//! - `ExprId(u32)` instead of `Box<Expr>`
//! - `ExprRange` for child lists (list forms, bodies)
//! - `BindingRange` for `let` binding groups

use std::fmt;

/// Index into an [`ExprArena`](crate::ExprArena).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    /// Create a new `ExprId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Range of expressions in the arena's flattened child-list table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ExprRange {
    pub start: u32,
    pub len: u32,
}

impl ExprRange {
    /// Empty range.
    pub const EMPTY: ExprRange = ExprRange { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        ExprRange { start, len }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// The sub-range after the first `n` entries (empty if `n >= len`).
    #[inline]
    #[must_use]
    pub const fn skip(self, n: u32) -> ExprRange {
        if n >= self.len {
            ExprRange::new(self.start + self.len, 0)
        } else {
            ExprRange::new(self.start + n, self.len - n)
        }
    }
}

/// Range of `let` bindings in the arena's binding table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct BindingRange {
    pub start: u32,
    pub len: u32,
}

impl BindingRange {
    pub const EMPTY: BindingRange = BindingRange { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        BindingRange { start, len }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}
