//! Alang Graph - control-flow graph lowering for alang programs.
//!
//! The compiled backend. Consumes the same syntax tree as `alang_eval` but
//! shares no state with it:
//!
//! - [`lower_program`]: tree to [`Module`], one [`Unit`] per `defun` plus `main`
//! - [`FunctionBuilder`]: block/instruction emission with an entry-block
//!   alloca cursor
//! - [`FunctionRegistry`]: name to unit signature, declared or inferred
//! - [`verify_module`]: structural checks run once before hand-off
//! - [`ModuleDisplay`]: LLVM-syntax dump
//!
//! Closures, quoting and string values are interpreter-only. `lambda` lowers
//! to the constant 0; the others are [`LowerError::Unsupported`].

mod builder;
mod config;
mod display;
mod errors;
mod ir;
mod lower;
mod registry;
mod verify;

pub use builder::{EntryCursor, FunctionBuilder};
pub use config::LowerConfig;
pub use display::ModuleDisplay;
pub use errors::{LowerError, VerifyError};
pub use ir::{
    BinOp, Block, BlockId, Body, Instr, Module, Operand, PhiIncoming, PrintArg, Slot, SlotId,
    StrId, Terminator, Type, Unit, UnitId, ValueId,
};
pub use lower::lower_program;
pub use registry::{FunctionRegistry, Signature, SignatureOrigin};
pub use verify::verify_module;
