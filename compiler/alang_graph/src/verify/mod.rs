//! Module verifier.
//!
//! The single structural gate between lowering and code generation. Checks
//! each unit independently against the module's unit and string tables:
//!
//! - every block is terminated and every branch target exists
//! - allocas appear only in the entry block, once per slot
//! - every used value is defined exactly once, before use within a block
//! - operand types match (`i1` for conditions, `i64` elsewhere)
//! - phis lead their block with exactly one incoming per predecessor
//! - calls name an existing unit with a matching arity

use alang_ir::StringInterner;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::errors::VerifyError;
use crate::ir::{
    Block, BlockId, Body, Instr, Module, Operand, PhiIncoming, PrintArg, SlotId, Terminator, Type,
    Unit, ValueId,
};

/// Verify a whole module.
pub fn verify_module(module: &Module, interner: &StringInterner) -> Result<(), VerifyError> {
    if module.main_unit().is_none() {
        return Err(VerifyError::MissingMain { main: module.main });
    }

    let mut seen = FxHashSet::default();
    for unit in &module.units {
        if !seen.insert(unit.name) {
            return Err(VerifyError::DuplicateUnit {
                name: interner.lookup(unit.name).to_string(),
            });
        }
    }

    for unit in &module.units {
        let Some(body) = &unit.body else {
            return Err(VerifyError::MissingBody {
                unit: interner.lookup(unit.name).to_string(),
            });
        };
        UnitVerifier::new(module, interner, unit, body).verify()?;
    }
    Ok(())
}

/// Where a value is defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Def {
    Param,
    Instr { block: BlockId, index: usize },
}

struct UnitVerifier<'m> {
    module: &'m Module,
    interner: &'m StringInterner,
    unit: &'m Unit,
    body: &'m Body,
    name: &'m str,
    defs: Vec<Option<Def>>,
    preds: Vec<SmallVec<[BlockId; 2]>>,
    allocated: FxHashSet<SlotId>,
}

impl<'m> UnitVerifier<'m> {
    fn new(
        module: &'m Module,
        interner: &'m StringInterner,
        unit: &'m Unit,
        body: &'m Body,
    ) -> Self {
        Self {
            module,
            interner,
            unit,
            body,
            name: interner.lookup(unit.name),
            defs: vec![None; body.value_types.len()],
            preds: vec![SmallVec::new(); body.blocks.len()],
            allocated: FxHashSet::default(),
        }
    }

    fn verify(mut self) -> Result<(), VerifyError> {
        if self.body.blocks.is_empty() {
            return Err(VerifyError::NoBlocks {
                unit: self.name.to_string(),
            });
        }
        if self.body.params.len() != self.unit.arity {
            return Err(VerifyError::ParamCount {
                unit: self.name.to_string(),
                expected: self.unit.arity,
                got: self.body.params.len(),
            });
        }

        self.collect()?;
        for block in &self.body.blocks {
            self.check_block(block)?;
        }
        Ok(())
    }

    /// First pass: definitions, allocas and predecessor lists.
    fn collect(&mut self) -> Result<(), VerifyError> {
        let entry = self.body.entry();
        for &param in &self.body.params {
            self.define(param, Def::Param, entry)?;
        }

        for (position, block) in self.body.blocks.iter().enumerate() {
            if block.id.index() != position {
                return Err(VerifyError::BlockIdMismatch {
                    unit: self.name.to_string(),
                    block: block.id,
                });
            }
            let Some(terminator) = &block.terminator else {
                return Err(VerifyError::MissingTerminator {
                    unit: self.name.to_string(),
                    block: block.id,
                });
            };

            for (index, instr) in block.instrs.iter().enumerate() {
                if let Instr::Alloca { slot } = instr {
                    self.allocate(*slot, block.id)?;
                }
                if let Some(dst) = instr.dst() {
                    self.define(
                        dst,
                        Def::Instr {
                            block: block.id,
                            index,
                        },
                        block.id,
                    )?;
                }
            }

            for target in terminator.successors() {
                let Some(preds) = self.preds.get_mut(target.index()) else {
                    return Err(VerifyError::InvalidTarget {
                        unit: self.name.to_string(),
                        block: block.id,
                        target,
                    });
                };
                if !preds.contains(&block.id) {
                    preds.push(block.id);
                }
            }
        }
        Ok(())
    }

    fn define(&mut self, value: ValueId, def: Def, block: BlockId) -> Result<(), VerifyError> {
        let Some(entry) = self.defs.get_mut(value.index()) else {
            return Err(VerifyError::UndefinedValue {
                unit: self.name.to_string(),
                block,
                value,
            });
        };
        if entry.is_some() {
            return Err(VerifyError::Redefined {
                unit: self.name.to_string(),
                block,
                value,
            });
        }
        *entry = Some(def);
        Ok(())
    }

    fn allocate(&mut self, slot: SlotId, block: BlockId) -> Result<(), VerifyError> {
        if block != self.body.entry() {
            return Err(VerifyError::AllocaOutsideEntry {
                unit: self.name.to_string(),
                block,
            });
        }
        if slot.index() >= self.body.slots.len() {
            return Err(VerifyError::InvalidSlot {
                unit: self.name.to_string(),
                block,
                slot,
            });
        }
        if !self.allocated.insert(slot) {
            return Err(VerifyError::DuplicateAlloca {
                unit: self.name.to_string(),
                block,
                slot,
            });
        }
        Ok(())
    }

    /// Second pass: operands, types, phis, calls.
    fn check_block(&self, block: &Block) -> Result<(), VerifyError> {
        let mut in_phi_prefix = true;
        for (index, instr) in block.instrs.iter().enumerate() {
            if instr.is_phi() {
                if !in_phi_prefix {
                    return Err(VerifyError::MisplacedPhi {
                        unit: self.name.to_string(),
                        block: block.id,
                    });
                }
            } else {
                in_phi_prefix = false;
            }
            self.check_instr(block.id, index, instr)?;
        }

        // Everything defined in the block precedes its terminator.
        let end = block.instrs.len();
        match &block.terminator {
            Some(Terminator::Ret(value)) => self.check_operand(block.id, end, *value),
            Some(Terminator::CondBr { cond, .. }) => {
                self.check_value(block.id, end, *cond, Type::I1)
            }
            Some(Terminator::Br(_)) | None => Ok(()),
        }
    }

    fn check_instr(&self, block: BlockId, index: usize, instr: &Instr) -> Result<(), VerifyError> {
        if let Some(dst) = instr.dst() {
            let expected = match instr {
                Instr::Cmp { .. } => Type::I1,
                _ => Type::I64,
            };
            self.check_type(block, dst, expected)?;
        }

        match instr {
            Instr::Alloca { .. } => Ok(()),
            Instr::Load { slot, .. } => self.check_slot(block, *slot),
            Instr::Store { slot, value } => {
                self.check_slot(block, *slot)?;
                self.check_operand(block, index, *value)
            }
            Instr::Binary { lhs, rhs, .. } | Instr::Cmp { lhs, rhs, .. } => {
                self.check_operand(block, index, *lhs)?;
                self.check_operand(block, index, *rhs)
            }
            Instr::Neg { operand, .. } => self.check_operand(block, index, *operand),
            Instr::ZExt { operand, .. } => self.check_value(block, index, *operand, Type::I1),
            Instr::Call { callee, args, .. } => {
                let Some(target) = self.module.unit(*callee) else {
                    return Err(VerifyError::InvalidCallee {
                        unit: self.name.to_string(),
                        block,
                        callee: *callee,
                    });
                };
                if target.arity != args.len() {
                    return Err(VerifyError::CallArity {
                        unit: self.name.to_string(),
                        block,
                        callee: self.interner.lookup(target.name).to_string(),
                        expected: target.arity,
                        got: args.len(),
                    });
                }
                for &arg in args {
                    self.check_operand(block, index, arg)?;
                }
                Ok(())
            }
            Instr::Print(PrintArg::Int(value)) => {
                self.check_operand(block, index, *value)
            }
            Instr::Print(PrintArg::Str(string)) => {
                if self.module.string(*string).is_none() {
                    return Err(VerifyError::InvalidString {
                        unit: self.name.to_string(),
                        block,
                        string: *string,
                    });
                }
                Ok(())
            }
            Instr::Phi { incoming, .. } => self.check_phi(block, incoming),
        }
    }

    /// One incoming per predecessor, none from elsewhere. Incoming values
    /// flow along the edge, so only definedness and type are checked.
    fn check_phi(&self, block: BlockId, incoming: &PhiIncoming) -> Result<(), VerifyError> {
        let preds = &self.preds[block.index()];
        let mut covered: SmallVec<[BlockId; 2]> = SmallVec::new();
        for &(pred, value) in incoming {
            if !preds.contains(&pred) {
                return Err(self.phi_error(block, "incoming edge from a non-predecessor"));
            }
            if covered.contains(&pred) {
                return Err(self.phi_error(block, "duplicate incoming edge"));
            }
            covered.push(pred);
            if let Operand::Value(value) = value {
                self.check_defined(block, value)?;
                self.check_type(block, value, Type::I64)?;
            }
        }
        if covered.len() != preds.len() {
            return Err(self.phi_error(block, "a predecessor has no incoming value"));
        }
        Ok(())
    }

    fn phi_error(&self, block: BlockId, reason: &'static str) -> VerifyError {
        VerifyError::PhiIncoming {
            unit: self.name.to_string(),
            block,
            reason,
        }
    }

    fn check_slot(&self, block: BlockId, slot: SlotId) -> Result<(), VerifyError> {
        if self.allocated.contains(&slot) {
            Ok(())
        } else {
            Err(VerifyError::InvalidSlot {
                unit: self.name.to_string(),
                block,
                slot,
            })
        }
    }

    /// Constants are always `i64`.
    fn check_operand(
        &self,
        block: BlockId,
        index: usize,
        operand: Operand,
    ) -> Result<(), VerifyError> {
        match operand {
            Operand::Const(_) => Ok(()),
            Operand::Value(value) => self.check_value(block, index, value, Type::I64),
        }
    }

    /// `value` is defined, and if defined in `block`, before `index`.
    fn check_value(
        &self,
        block: BlockId,
        index: usize,
        value: ValueId,
        expected: Type,
    ) -> Result<(), VerifyError> {
        match self.check_defined(block, value)? {
            Def::Instr {
                block: def_block,
                index: def_index,
            } if def_block == block && def_index >= index => {
                return Err(VerifyError::UseBeforeDef {
                    unit: self.name.to_string(),
                    block,
                    value,
                });
            }
            _ => {}
        }
        self.check_type(block, value, expected)
    }

    fn check_defined(&self, block: BlockId, value: ValueId) -> Result<Def, VerifyError> {
        self.defs
            .get(value.index())
            .copied()
            .flatten()
            .ok_or_else(|| VerifyError::UndefinedValue {
                unit: self.name.to_string(),
                block,
                value,
            })
    }

    fn check_type(&self, block: BlockId, value: ValueId, expected: Type) -> Result<(), VerifyError> {
        match self.body.value_type(value) {
            Some(found) if found == expected => Ok(()),
            Some(found) => Err(VerifyError::TypeMismatch {
                unit: self.name.to_string(),
                block,
                value,
                expected,
                found,
            }),
            None => Err(VerifyError::UndefinedValue {
                unit: self.name.to_string(),
                block,
                value,
            }),
        }
    }
}

#[cfg(test)]
mod tests;

