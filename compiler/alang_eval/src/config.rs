//! Interpreter configuration.

/// Default runaway-loop guard for `while`.
pub const DEFAULT_LOOP_LIMIT: u64 = 1_000_000;

/// Evaluation policy knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Maximum number of body executions of a single `while` before the run
    /// is aborted. `None` disables the guard.
    pub loop_limit: Option<u64>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            loop_limit: Some(DEFAULT_LOOP_LIMIT),
        }
    }
}
