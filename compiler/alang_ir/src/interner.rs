//! String interner for identifiers and string literals.
//!
//! Provides O(1) interning and lookup. A single table is enough for this
//! language: everything runs on one thread, but the lock lets `intern` take
//! `&self` without `RefCell` borrow juggling.

use std::fmt;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

/// Backing storage for interned strings.
struct InternTable {
    /// Map from string content to its index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name::index()`.
    strings: Vec<&'static str>,
}

impl InternTable {
    fn with_empty() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, 0);
        Self {
            map,
            strings: vec![empty],
        }
    }
}

/// String interner.
///
/// Strings are leaked to obtain `'static` lifetimes; the interner lives for
/// the whole compilation session, so nothing is ever freed early.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned as [`Name::EMPTY`].
    pub fn new() -> Self {
        Self {
            table: RwLock::new(InternTable::with_empty()),
        }
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&self, s: &str) -> Name {
        {
            let guard = self.table.read();
            if let Some(&index) = guard.map.get(s) {
                return Name::from_raw(index);
            }
        }

        let mut guard = self.table.write();
        // Double-check after acquiring write lock
        if let Some(&index) = guard.map.get(s) {
            return Name::from_raw(index);
        }

        let index = u32::try_from(guard.strings.len())
            .unwrap_or_else(|_| panic!("interner exceeded u32::MAX strings"));
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        guard.strings.push(leaked);
        guard.map.insert(leaked, index);
        Name::from_raw(index)
    }

    /// Look up the string for a Name.
    ///
    /// Names from a different interner resolve to the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Always false: the empty string is interned on construction.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}
