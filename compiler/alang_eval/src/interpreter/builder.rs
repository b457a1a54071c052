//! `InterpreterBuilder` for creating configured interpreters.

use alang_ir::{ExprArena, FormTable, StringInterner};

use super::Interpreter;
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::{EvalConfig, Environment};

/// Builder for [`Interpreter`].
///
/// Defaults: stdout print sink, [`EvalConfig::default`].
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    arena: &'a ExprArena,
    print_handler: Option<SharedPrintHandler>,
    config: EvalConfig,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(interner: &'a StringInterner, arena: &'a ExprArena) -> Self {
        Self {
            interner,
            arena,
            print_handler: None,
            config: EvalConfig::default(),
        }
    }

    /// Set the sink for `print` output.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the `while` iteration guard (`None` disables it).
    #[must_use]
    pub fn loop_limit(mut self, limit: Option<u64>) -> Self {
        self.config.loop_limit = limit;
        self
    }

    pub fn build(self) -> Interpreter<'a> {
        let forms = FormTable::new(self.interner);
        let env = Environment::new(forms.nil);
        Interpreter {
            interner: self.interner,
            arena: self.arena,
            forms,
            env,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            config: self.config,
        }
    }
}
