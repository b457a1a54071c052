//! The `run` command: read and interpret a source file.

use alang_eval::{EvalConfig, InterpreterBuilder};
use alang_ir::StringInterner;

use super::{parse_or_exit, read_file};
use crate::diagnostic::emit;

/// Options for `alang run`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub config: EvalConfig,
}

/// Parse `run` flags (everything except the file path).
pub fn parse_run_options(args: &[String]) -> Result<RunOptions, String> {
    let mut options = RunOptions::default();
    for arg in args {
        if let Some(limit) = arg.strip_prefix("--loop-limit=") {
            options.config.loop_limit = match limit {
                "none" => None,
                n => Some(
                    n.parse::<u64>()
                        .map_err(|_| format!("invalid loop limit '{n}' (expected a count or 'none')"))?,
                ),
            };
        } else {
            return Err(format!("unknown option '{arg}'"));
        }
    }
    Ok(options)
}

/// Interpret a source file. Output goes to stdout; the first error is
/// reported against the source and exits with status 1.
pub fn run_file(path: &str, options: &RunOptions) {
    let source = read_file(path);
    let interner = StringInterner::new();
    let program = parse_or_exit(path, &source, &interner);

    let mut interpreter = InterpreterBuilder::new(&interner, &program.arena)
        .config(options.config)
        .build();
    if let Err(err) = interpreter.run(&program.roots) {
        tracing::debug!(error = %err, "run failed");
        emit(path, &source, &err);
        std::process::exit(1);
    }
}
