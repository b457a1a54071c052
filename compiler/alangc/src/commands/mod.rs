//! Command handlers for the `alang` CLI.
//!
//! Shared utilities (`read_file`, `parse_or_exit`) live in the module root.

mod build;
mod run;

pub use build::{build_file, parse_build_options, BuildOptions, Emit};
pub use run::{parse_run_options, run_file, RunOptions};

use alang_ir::{Program, StringInterner};

use crate::diagnostic::emit;

/// Read a source file, exiting with a message if it cannot be read.
pub(crate) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Read `source` into a program, reporting the first syntax error and
/// exiting on failure.
pub(crate) fn parse_or_exit(path: &str, source: &str, interner: &StringInterner) -> Program {
    match alang_parse::parse(source, interner) {
        Ok(program) => program,
        Err(err) => {
            emit(path, source, &err);
            std::process::exit(1);
        }
    }
}
