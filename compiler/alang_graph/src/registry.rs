//! Function registry: source name to compiled unit signature.
//!
//! Entries are created when a `defun` is seen (declared) or when a call to an
//! unknown name is lowered (inferred from the call's argument count). An
//! inferred entry is upgraded when its definition arrives; if the arities
//! disagree, the call sites already emitted keep the old argument count and
//! the module verifier reports the mismatch.

use rustc_hash::FxHashMap;

use alang_ir::Name;

use crate::ir::UnitId;

/// Where a signature's arity came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureOrigin {
    /// A `defun` (or the signature pre-pass).
    Declared,
    /// The first call site, before any definition was seen.
    Inferred,
}

/// Callable signature of a compiled unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    pub unit: UnitId,
    pub arity: usize,
    pub origin: SignatureOrigin,
}

#[derive(Debug, Default)]
pub struct FunctionRegistry {
    entries: FxHashMap<Name, Signature>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, name: Name) -> Option<Signature> {
        self.entries.get(&name).copied()
    }

    /// Record a definition's signature, replacing any inferred one.
    pub fn declare(&mut self, name: Name, unit: UnitId, arity: usize) {
        self.entries.insert(
            name,
            Signature {
                unit,
                arity,
                origin: SignatureOrigin::Declared,
            },
        );
    }

    /// Record a signature guessed from a call site.
    pub fn infer(&mut self, name: Name, unit: UnitId, arity: usize) {
        self.entries.insert(
            name,
            Signature {
                unit,
                arity,
                origin: SignatureOrigin::Inferred,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
