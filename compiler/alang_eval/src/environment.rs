//! Environment for variable scoping in the interpreter.
//!
//! An index stack of frames: frame 0 is the global scope, the last frame is
//! the innermost. Lookup scans innermost to outermost. Closure snapshots
//! flatten the stack outermost first, so an inner binding overwrites any
//! outer binding of the same name.

use rustc_hash::FxHashMap;

use alang_ir::Name;

use crate::Value;

/// Whether a binding can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// Ordinary variable (`set`, `let`, parameters, `defun`).
    Mutable,
    /// Frozen by `const`.
    Frozen,
}

impl Mutability {
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

/// Why a binding operation was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// `set` on a frozen binding.
    Frozen,
    /// `const` on a name whose visible binding is already frozen.
    AlreadyConst,
}

/// A variable binding.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub value: Value,
    pub mutability: Mutability,
}

/// Flattened name to binding map captured by a closure.
pub type Captures = FxHashMap<Name, Binding>;

/// A single scope.
#[derive(Clone, Debug, Default)]
struct Frame {
    bindings: FxHashMap<Name, Binding>,
}

/// Scope stack with a persistent global frame.
#[derive(Debug)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Environment {
    /// Create an environment whose global scope binds `nil` to the empty list.
    pub fn new(nil: Name) -> Self {
        let mut global = Frame::default();
        global.bindings.insert(
            nil,
            Binding {
                value: Value::nil(),
                mutability: Mutability::Mutable,
            },
        );
        Environment {
            frames: vec![global],
        }
    }

    /// Number of frames, including the global one.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn push_scope(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Push a frame pre-populated from a closure snapshot.
    pub fn push_captures(&mut self, captures: &Captures) {
        self.frames.push(Frame {
            bindings: captures.clone(),
        });
    }

    /// Pop the innermost scope. The global scope is never popped.
    #[inline]
    pub fn pop_scope(&mut self) {
        debug_assert!(self.frames.len() > 1, "attempted to pop the global scope");
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Pop frames until `depth` remain (at least the global one).
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth.max(1));
    }

    /// Bind a name in the innermost scope, shadowing any outer binding.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value, mutability: Mutability) {
        self.innermost().bindings.insert(name, Binding { value, mutability });
    }

    /// Look up a name, innermost scope first.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.binding(name).map(|b| b.value.clone())
    }

    fn binding(&self, name: Name) -> Option<&Binding> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.bindings.get(&name))
    }

    /// `set`: overwrite the nearest binding of `name`, or create it in the
    /// global scope if no scope has it.
    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        let nearest = self
            .frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.bindings.get_mut(&name));
        match nearest {
            Some(binding) if !binding.mutability.is_mutable() => Err(AssignError::Frozen),
            Some(binding) => {
                binding.value = value;
                Ok(())
            }
            None => {
                self.frames[0].bindings.insert(
                    name,
                    Binding {
                        value,
                        mutability: Mutability::Mutable,
                    },
                );
                Ok(())
            }
        }
    }

    /// `defun`: bind `name` globally and refresh every live frame that holds
    /// a function under it, so closure-snapshot frames of callers in
    /// progress see the new definition too.
    ///
    /// Fails if the nearest binding of `name` is frozen.
    pub fn define_function(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        if self
            .binding(name)
            .is_some_and(|b| !b.mutability.is_mutable())
        {
            return Err(AssignError::Frozen);
        }
        for frame in self.frames.iter_mut().skip(1) {
            if let Some(binding) = frame.bindings.get_mut(&name) {
                if matches!(binding.value, Value::Function(_)) && binding.mutability.is_mutable() {
                    binding.value = value.clone();
                }
            }
        }
        self.frames[0].bindings.insert(
            name,
            Binding {
                value,
                mutability: Mutability::Mutable,
            },
        );
        Ok(())
    }

    /// `const`: bind and freeze `name` in the innermost scope.
    ///
    /// Freezing is scope-local: a frozen inner binding leaves a same-named
    /// outer binding assignable once the inner scope is gone.
    pub fn define_const(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        if self
            .binding(name)
            .is_some_and(|b| !b.mutability.is_mutable())
        {
            return Err(AssignError::AlreadyConst);
        }
        self.define(name, value, Mutability::Frozen);
        Ok(())
    }

    /// Flatten every visible binding into one map, outermost first so the
    /// innermost binding of each name wins.
    pub fn snapshot(&self) -> Captures {
        let mut captures = Captures::default();
        for frame in &self.frames {
            for (&name, binding) in &frame.bindings {
                captures.insert(name, binding.clone());
            }
        }
        captures
    }

    fn innermost(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

#[cfg(test)]
mod tests;
