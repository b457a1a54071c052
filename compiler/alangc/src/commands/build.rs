//! The `build` command: lower a source file to a verified graph.

use alang_graph::{lower_program, LowerConfig, ModuleDisplay};
use alang_ir::StringInterner;

use super::{parse_or_exit, read_file};
use crate::diagnostic::emit;

/// What `build` writes to stdout on success.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Emit {
    /// Textual module dump.
    #[default]
    Ir,
    /// Nothing; only lower and verify.
    None,
}

/// Options for `alang build`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub lower: LowerConfig,
    pub emit: Emit,
}

/// Parse `build` flags (everything except the file path).
pub fn parse_build_options(args: &[String]) -> Result<BuildOptions, String> {
    let mut options = BuildOptions::default();
    for arg in args {
        match arg.as_str() {
            "--no-presolve" => options.lower.resolve_signatures_first = false,
            "--emit=ir" => options.emit = Emit::Ir,
            "--emit=none" => options.emit = Emit::None,
            other => {
                if let Some(emit) = other.strip_prefix("--emit=") {
                    return Err(format!("invalid emit type '{emit}' (expected 'ir' or 'none')"));
                }
                return Err(format!("unknown option '{other}'"));
            }
        }
    }
    Ok(options)
}

/// Lower and verify a source file, printing the module dump on success.
pub fn build_file(path: &str, options: &BuildOptions) {
    let source = read_file(path);
    let interner = StringInterner::new();
    let program = parse_or_exit(path, &source, &interner);

    let mut lower = options.lower.clone();
    if let Some(stem) = std::path::Path::new(path).file_stem() {
        lower.module_name = stem.to_string_lossy().into_owned();
    }

    match lower_program(&program, &interner, &lower) {
        Ok(module) => {
            if options.emit == Emit::Ir {
                print!("{}", ModuleDisplay::new(&module, &interner));
            }
        }
        Err(err) => {
            emit(path, &source, &err);
            std::process::exit(1);
        }
    }
}
