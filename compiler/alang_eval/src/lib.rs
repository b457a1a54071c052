//! Alang Eval - tree-walking interpreter for alang programs.
//!
//! - [`Value`]: integers, strings, symbols, lists and closures
//! - [`Environment`]: index stack of scopes with per-binding mutability and
//!   by-value closure snapshots
//! - [`Interpreter`]: special forms, arithmetic, conditions and calls
//! - [`quote()`]: syntax to data conversion for `'x` / `(quote x)`
//!
//! Functions live in ordinary variable bindings; `defun` is `set` of a
//! closure, and a named call resolves its head through the scope chain.

mod config;
mod environment;
mod errors;
mod interpreter;
mod print_handler;
mod quote;
mod value;

pub use config::{EvalConfig, DEFAULT_LOOP_LIMIT};
pub use environment::{AssignError, Binding, Captures, Environment, Mutability};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{Interpreter, InterpreterBuilder, ScopedInterpreter};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler,
};
pub use quote::quote;
pub use value::{FunctionValue, Value, ValueDisplay};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
