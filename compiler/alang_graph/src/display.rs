//! Textual dump of a [`Module`] in LLVM assembly syntax.
//!
//! `print` lowers to calls of the two external primitives `print_i64` and
//! `print_str`, declared at the top of every dump.

use std::fmt;

use alang_ir::{CmpOp, Name, StringInterner};

use crate::ir::{Body, Instr, Module, Operand, PrintArg, Terminator, Unit};

/// Display adapter pairing a module with the interner its names live in.
pub struct ModuleDisplay<'a> {
    module: &'a Module,
    interner: &'a StringInterner,
}

impl<'a> ModuleDisplay<'a> {
    pub fn new(module: &'a Module, interner: &'a StringInterner) -> Self {
        Self { module, interner }
    }

    fn global(&self, name: Name) -> GlobalName<'static> {
        GlobalName(self.interner.lookup(name))
    }

    fn unit(&self, f: &mut fmt::Formatter<'_>, unit: &Unit) -> fmt::Result {
        let name = self.global(unit.name);
        let Some(body) = &unit.body else {
            let params = vec!["i64"; unit.arity].join(", ");
            return writeln!(f, "declare i64 {name}({params})");
        };

        let params = body
            .params
            .iter()
            .map(|p| format!("i64 {p}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "define i64 {name}({params}) {{")?;
        for block in &body.blocks {
            writeln!(f, "{}:", block.id)?;
            for instr in &block.instrs {
                write!(f, "  ")?;
                self.instr(f, body, instr)?;
                writeln!(f)?;
            }
            match &block.terminator {
                Some(Terminator::Ret(value)) => writeln!(f, "  ret i64 {}", OperandText(*value))?,
                Some(Terminator::Br(target)) => writeln!(f, "  br label %{target}")?,
                Some(Terminator::CondBr {
                    cond,
                    then_block,
                    else_block,
                }) => writeln!(
                    f,
                    "  br i1 {cond}, label %{then_block}, label %{else_block}"
                )?,
                None => writeln!(f, "  ; missing terminator")?,
            }
        }
        writeln!(f, "}}")
    }

    fn instr(&self, f: &mut fmt::Formatter<'_>, body: &Body, instr: &Instr) -> fmt::Result {
        match instr {
            Instr::Alloca { slot } => {
                let name = body
                    .slots
                    .get(slot.index())
                    .map_or("", |s| self.interner.lookup(s.name));
                write!(f, "{slot} = alloca i64 ; {name}")
            }
            Instr::Load { dst, slot } => write!(f, "{dst} = load i64, ptr {slot}"),
            Instr::Store { slot, value } => {
                write!(f, "store i64 {}, ptr {slot}", OperandText(*value))
            }
            Instr::Binary { dst, op, lhs, rhs } => write!(
                f,
                "{dst} = {} i64 {}, {}",
                op.mnemonic(),
                OperandText(*lhs),
                OperandText(*rhs)
            ),
            Instr::Neg { dst, operand } => {
                write!(f, "{dst} = sub i64 0, {}", OperandText(*operand))
            }
            Instr::Cmp {
                dst,
                pred,
                lhs,
                rhs,
            } => write!(
                f,
                "{dst} = icmp {} i64 {}, {}",
                predicate(*pred),
                OperandText(*lhs),
                OperandText(*rhs)
            ),
            Instr::ZExt { dst, operand } => write!(f, "{dst} = zext i1 {operand} to i64"),
            Instr::Call { dst, callee, args } => {
                let callee = self
                    .module
                    .unit(*callee)
                    .map_or(GlobalName("?"), |u| self.global(u.name));
                let args = args
                    .iter()
                    .map(|a| format!("i64 {}", OperandText(*a)))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{dst} = call i64 {callee}({args})")
            }
            Instr::Print(PrintArg::Int(value)) => {
                write!(f, "call void @print_i64(i64 {})", OperandText(*value))
            }
            Instr::Print(PrintArg::Str(string)) => write!(f, "call void @print_str(ptr {string})"),
            Instr::Phi { dst, incoming } => {
                let incoming = incoming
                    .iter()
                    .map(|(block, value)| format!("[ {}, %{block} ]", OperandText(*value)))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{dst} = phi i64 {incoming}")
            }
        }
    }
}

impl fmt::Display for ModuleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.module.name)?;
        for (index, text) in self.module.strings.iter().enumerate() {
            writeln!(
                f,
                "@.str.{index} = private constant [{} x i8] c\"{}\\00\"",
                text.len() + 1,
                EscapedBytes(text)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "declare void @print_i64(i64)")?;
        writeln!(f, "declare void @print_str(ptr)")?;
        for unit in &self.module.units {
            writeln!(f)?;
            self.unit(f, unit)?;
        }
        Ok(())
    }
}

fn predicate(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Lt => "slt",
        CmpOp::Gt => "sgt",
        CmpOp::Eq => "eq",
        CmpOp::Ne => "ne",
        CmpOp::Le => "sle",
        CmpOp::Ge => "sge",
    }
}

struct OperandText(Operand);

impl fmt::Display for OperandText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Operand::Const(n) => write!(f, "{n}"),
            Operand::Value(v) => write!(f, "{v}"),
        }
    }
}

/// `@name`, quoted when the name is not a plain identifier (`@"add-one"`).
#[derive(Clone, Copy)]
struct GlobalName<'a>(&'a str);

impl fmt::Display for GlobalName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plain = !self.0.is_empty()
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'$'));
        if plain {
            write!(f, "@{}", self.0)
        } else {
            write!(f, "@\"{}\"", EscapedBytes(self.0))
        }
    }
}

/// LLVM string escaping: printable ASCII except `"` and `\` as-is, the
/// rest as `\XX`.
struct EscapedBytes<'a>(&'a str);

impl fmt::Display for EscapedBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.bytes() {
            if byte == b' ' || (byte.is_ascii_graphic() && byte != b'"' && byte != b'\\') {
                write!(f, "{}", char::from(byte))?;
            } else {
                write!(f, "\\{byte:02X}")?;
            }
        }
        Ok(())
    }
}
