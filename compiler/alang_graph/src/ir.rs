//! Control-flow graph IR.
//!
//! Shaped after LLVM IR so handing a verified [`Module`] to a native code
//! generator is a one-to-one translation:
//!
//! - **[`Module`]**: compiled units plus a table of string constants
//! - **[`Unit`]**: one function; `body` is `None` while only declared
//! - **[`Body`]**: blocks, SSA value types, stack slots
//! - **[`Block`]**: instructions followed by one [`Terminator`]
//!
//! Variables live in stack slots (`Alloca` in the entry block, then
//! `Load`/`Store`). Only `if`/`and`/`or` merge points need a [`Instr::Phi`];
//! loops reload their slots after the back edge.

use alang_ir::{CmpOp, Name};
use smallvec::SmallVec;

// ID newtypes

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub fn new(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// SSA value within one unit.
    ValueId,
    "%v"
);
define_id!(
    /// Basic block within one unit. Block 0 is the entry block.
    BlockId,
    "bb"
);
define_id!(
    /// Stack slot within one unit.
    SlotId,
    "%s"
);
define_id!(
    /// Compiled unit within the module.
    UnitId,
    "u"
);
define_id!(
    /// String constant in the module's string table.
    StrId,
    "@.str."
);

/// Value type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// Comparison result.
    I1,
    /// Every integer value, parameter and return value.
    I64,
}

impl Type {
    pub fn as_str(self) -> &'static str {
        match self {
            Type::I1 => "i1",
            Type::I64 => "i64",
        }
    }
}

/// Instruction operand. Constants are always `i64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    Const(i64),
    Value(ValueId),
}

/// Integer binary operation (two's complement, wrapping).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    /// Signed division truncating toward zero.
    SDiv,
}

impl BinOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::SDiv => "sdiv",
        }
    }
}

/// Argument of the external formatted-output primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrintArg {
    /// `print_i64`: decimal integer plus newline.
    Int(Operand),
    /// `print_str`: string constant plus newline.
    Str(StrId),
}

/// Incoming edges of a phi: one `(predecessor, value)` per predecessor.
pub type PhiIncoming = SmallVec<[(BlockId, Operand); 2]>;

/// Non-terminating instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instr {
    /// Reserve an `i64` stack slot. Entry block only.
    Alloca { slot: SlotId },
    Load { dst: ValueId, slot: SlotId },
    Store { slot: SlotId, value: Operand },
    Binary {
        dst: ValueId,
        op: BinOp,
        lhs: Operand,
        rhs: Operand,
    },
    Neg { dst: ValueId, operand: Operand },
    /// Signed comparison producing `i1`.
    Cmp {
        dst: ValueId,
        pred: CmpOp,
        lhs: Operand,
        rhs: Operand,
    },
    /// Widen an `i1` to `i64` (0 or 1).
    ZExt { dst: ValueId, operand: ValueId },
    Call {
        dst: ValueId,
        callee: UnitId,
        args: Vec<Operand>,
    },
    Print(PrintArg),
    /// Select a value by predecessor. Must lead its block.
    Phi { dst: ValueId, incoming: PhiIncoming },
}

impl Instr {
    /// Value defined by this instruction, if any.
    pub fn dst(&self) -> Option<ValueId> {
        match self {
            Instr::Load { dst, .. }
            | Instr::Binary { dst, .. }
            | Instr::Neg { dst, .. }
            | Instr::Cmp { dst, .. }
            | Instr::ZExt { dst, .. }
            | Instr::Call { dst, .. }
            | Instr::Phi { dst, .. } => Some(*dst),
            Instr::Alloca { .. } | Instr::Store { .. } | Instr::Print(_) => None,
        }
    }

    #[inline]
    pub fn is_phi(&self) -> bool {
        matches!(self, Instr::Phi { .. })
    }
}

/// Block exit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Terminator {
    Ret(Operand),
    Br(BlockId),
    CondBr {
        cond: ValueId,
        then_block: BlockId,
        else_block: BlockId,
    },
}

impl Terminator {
    pub fn successors(&self) -> SmallVec<[BlockId; 2]> {
        match self {
            Terminator::Ret(_) => SmallVec::new(),
            Terminator::Br(target) => smallvec::smallvec![*target],
            Terminator::CondBr {
                then_block,
                else_block,
                ..
            } => smallvec::smallvec![*then_block, *else_block],
        }
    }
}

/// Basic block. `terminator` is `None` only in malformed graphs; the
/// verifier rejects those.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub instrs: Vec<Instr>,
    pub terminator: Option<Terminator>,
}

/// Stack slot metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    /// Source variable name.
    pub name: Name,
    /// Declared with `const`.
    pub frozen: bool,
}

/// A unit's code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Body {
    /// Parameter values, defined on entry, all `i64`.
    pub params: Vec<ValueId>,
    pub blocks: Vec<Block>,
    /// Type of every `ValueId`, indexed by `ValueId::index()`.
    pub value_types: Vec<Type>,
    pub slots: Vec<Slot>,
}

impl Body {
    #[inline]
    pub fn entry(&self) -> BlockId {
        BlockId::new(0)
    }

    #[inline]
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    #[inline]
    pub fn value_type(&self, id: ValueId) -> Option<Type> {
        self.value_types.get(id.index()).copied()
    }
}

/// A compiled function. Takes `arity` `i64` parameters, returns one `i64`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    pub name: Name,
    pub arity: usize,
    pub body: Option<Body>,
}

/// A whole program: the entry unit plus one unit per function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub units: Vec<Unit>,
    pub strings: Vec<String>,
    /// Entry unit.
    pub main: UnitId,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            units: Vec::new(),
            strings: Vec::new(),
            main: UnitId::new(0),
        }
    }

    #[inline]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.index())
    }

    #[inline]
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.index())
    }

    /// Unit whose body is the entry point.
    #[inline]
    pub fn main_unit(&self) -> Option<&Unit> {
        self.unit(self.main)
    }

    #[inline]
    pub fn string(&self, id: StrId) -> Option<&str> {
        self.strings.get(id.index()).map(String::as_str)
    }

    /// Append a declared (bodiless) unit.
    pub fn declare_unit(&mut self, name: Name, arity: usize) -> UnitId {
        let id = UnitId::new(to_u32(self.units.len()));
        self.units.push(Unit {
            name,
            arity,
            body: None,
        });
        id
    }

    /// Append a string constant.
    pub fn add_string(&mut self, text: &str) -> StrId {
        let id = StrId::new(to_u32(self.strings.len()));
        self.strings.push(text.to_string());
        id
    }
}

/// Index conversion for ID tables.
///
/// # Panics
/// Panics if a table grows past `u32::MAX` entries.
pub(crate) fn to_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("IR table exceeded u32::MAX entries"))
}
