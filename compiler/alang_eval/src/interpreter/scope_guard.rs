//! RAII scope guards for the interpreter's environment.
//!
//! A guard records the environment depth on entry and truncates back to it
//! on drop, so every early `?` return and every unwind leaves the scope stack
//! as it was. Calls push two frames (closure snapshot, then parameters) under
//! a single guard.

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::environment::Captures;

/// Guard that restores the environment depth on drop.
///
/// Derefs to the interpreter, so evaluation continues through the guard.
pub struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
    depth: usize,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.env.truncate(self.depth);
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Push one empty scope, popped when the guard drops.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_, 'a> {
        let depth = self.env.depth();
        self.env.push_scope();
        ScopedInterpreter {
            interpreter: self,
            depth,
        }
    }

    /// Run `f` inside a fresh scope.
    pub fn with_env_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }

    /// Run `f` with a closure snapshot frame and an empty parameter frame on
    /// top of the current stack.
    pub(crate) fn with_call_scope<T, F>(&mut self, captures: &Captures, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
    {
        let depth = self.env.depth();
        self.env.push_captures(captures);
        self.env.push_scope();
        let mut scoped = ScopedInterpreter {
            interpreter: self,
            depth,
        };
        f(&mut scoped)
    }
}

#[cfg(test)]
mod tests;
