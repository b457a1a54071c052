//! Builder for one unit's body.
//!
//! Follows the "position at a block, emit instructions, terminate" pattern
//! of LLVM's `IRBuilder`. Stack slots are allocated through a separate
//! [`EntryCursor`] that inserts into the entry block's alloca prefix without
//! moving the primary insertion point.

use alang_ir::{CmpOp, Name};

use crate::ir::{
    to_u32, BinOp, Block, BlockId, Body, Instr, Operand, PhiIncoming, PrintArg, Slot, SlotId,
    Terminator, Type, UnitId, ValueId,
};

/// In-progress basic block.
struct BlockBuilder {
    id: BlockId,
    instrs: Vec<Instr>,
    terminator: Option<Terminator>,
}

impl BlockBuilder {
    fn new(id: BlockId) -> Self {
        Self {
            id,
            instrs: Vec::new(),
            terminator: None,
        }
    }
}

/// Builder for an in-progress unit body.
///
/// Consumed by [`finish`](FunctionBuilder::finish) to produce the [`Body`].
pub struct FunctionBuilder {
    blocks: Vec<BlockBuilder>,
    current_block: BlockId,
    value_types: Vec<Type>,
    slots: Vec<Slot>,
    params: Vec<ValueId>,
    /// Number of allocas at the front of the entry block.
    alloca_count: usize,
}

impl FunctionBuilder {
    /// Create a builder with the entry block allocated and `arity` `i64`
    /// parameter values defined.
    pub fn new(arity: usize) -> Self {
        let mut builder = Self {
            blocks: vec![BlockBuilder::new(BlockId::new(0))],
            current_block: BlockId::new(0),
            value_types: Vec::new(),
            slots: Vec::new(),
            params: Vec::new(),
            alloca_count: 0,
        };
        let params = (0..arity).map(|_| builder.fresh_value(Type::I64)).collect();
        builder.params = params;
        builder
    }

    // Block management

    /// Allocate a new empty block.
    pub fn new_block(&mut self) -> BlockId {
        let id = BlockId::new(to_u32(self.blocks.len()));
        self.blocks.push(BlockBuilder::new(id));
        id
    }

    /// Move the insertion point to the end of `block`.
    pub fn position_at(&mut self, block: BlockId) {
        debug_assert!(
            block.index() < self.blocks.len(),
            "{block} out of bounds (have {} blocks)",
            self.blocks.len(),
        );
        self.current_block = block;
    }

    #[inline]
    pub fn current_block(&self) -> BlockId {
        self.current_block
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.blocks[self.current_block.index()].terminator.is_some()
    }

    #[inline]
    pub fn params(&self) -> &[ValueId] {
        &self.params
    }

    // Values and slots

    #[inline]
    pub fn slot(&self, slot: SlotId) -> Option<Slot> {
        self.slots.get(slot.index()).copied()
    }

    fn fresh_value(&mut self, ty: Type) -> ValueId {
        let id = ValueId::new(to_u32(self.value_types.len()));
        self.value_types.push(ty);
        id
    }

    /// Temporary cursor at the end of the entry block's alloca prefix.
    pub fn entry_cursor(&mut self) -> EntryCursor<'_> {
        EntryCursor { builder: self }
    }

    /// Allocate a stack slot for `name` in the entry block.
    pub fn alloca(&mut self, name: Name, frozen: bool) -> SlotId {
        self.entry_cursor().alloca(name, frozen)
    }

    // Instruction emission

    fn push(&mut self, instr: Instr) {
        let block = &mut self.blocks[self.current_block.index()];
        debug_assert!(
            block.terminator.is_none(),
            "emitting into terminated block {}",
            block.id
        );
        block.instrs.push(instr);
    }

    pub fn emit_load(&mut self, slot: SlotId) -> ValueId {
        let dst = self.fresh_value(Type::I64);
        self.push(Instr::Load { dst, slot });
        dst
    }

    pub fn emit_store(&mut self, slot: SlotId, value: Operand) {
        self.push(Instr::Store { slot, value });
    }

    pub fn emit_binary(&mut self, op: BinOp, lhs: Operand, rhs: Operand) -> ValueId {
        let dst = self.fresh_value(Type::I64);
        self.push(Instr::Binary { dst, op, lhs, rhs });
        dst
    }

    pub fn emit_neg(&mut self, operand: Operand) -> ValueId {
        let dst = self.fresh_value(Type::I64);
        self.push(Instr::Neg { dst, operand });
        dst
    }

    pub fn emit_cmp(&mut self, pred: CmpOp, lhs: Operand, rhs: Operand) -> ValueId {
        let dst = self.fresh_value(Type::I1);
        self.push(Instr::Cmp {
            dst,
            pred,
            lhs,
            rhs,
        });
        dst
    }

    pub fn emit_zext(&mut self, operand: ValueId) -> ValueId {
        let dst = self.fresh_value(Type::I64);
        self.push(Instr::ZExt { dst, operand });
        dst
    }

    pub fn emit_call(&mut self, callee: UnitId, args: Vec<Operand>) -> ValueId {
        let dst = self.fresh_value(Type::I64);
        self.push(Instr::Call { dst, callee, args });
        dst
    }

    pub fn emit_print(&mut self, arg: PrintArg) {
        self.push(Instr::Print(arg));
    }

    /// Emit a phi. Must be called right after positioning at a fresh merge
    /// block, before any other instruction.
    pub fn emit_phi(&mut self, incoming: PhiIncoming) -> ValueId {
        debug_assert!(
            self.blocks[self.current_block.index()]
                .instrs
                .iter()
                .all(Instr::is_phi),
            "phi emitted after a non-phi instruction"
        );
        let dst = self.fresh_value(Type::I64);
        self.push(Instr::Phi { dst, incoming });
        dst
    }

    // Terminators

    fn terminate(&mut self, terminator: Terminator) {
        debug_assert!(
            !self.is_terminated(),
            "block {} already terminated",
            self.current_block
        );
        self.blocks[self.current_block.index()].terminator = Some(terminator);
    }

    pub fn terminate_ret(&mut self, value: Operand) {
        self.terminate(Terminator::Ret(value));
    }

    pub fn terminate_br(&mut self, target: BlockId) {
        self.terminate(Terminator::Br(target));
    }

    pub fn terminate_cond_br(&mut self, cond: ValueId, then_block: BlockId, else_block: BlockId) {
        self.terminate(Terminator::CondBr {
            cond,
            then_block,
            else_block,
        });
    }

    // Finalization

    /// Consume the builder and produce the finished [`Body`].
    ///
    /// Unterminated blocks are kept as-is (with a warning) so the module
    /// verifier reports them.
    pub fn finish(self) -> Body {
        let blocks = self
            .blocks
            .into_iter()
            .map(|bb| {
                if bb.terminator.is_none() {
                    tracing::warn!(block = bb.id.raw(), "unterminated block in unit body");
                }
                Block {
                    id: bb.id,
                    instrs: bb.instrs,
                    terminator: bb.terminator,
                }
            })
            .collect();

        Body {
            params: self.params,
            blocks,
            value_types: self.value_types,
            slots: self.slots,
        }
    }
}

/// Insertion point for stack slot allocation.
///
/// Holds the builder exclusively, so the primary insertion point cannot be
/// used while it exists, and is consumed by inserting exactly one `Alloca`.
pub struct EntryCursor<'b> {
    builder: &'b mut FunctionBuilder,
}

impl EntryCursor<'_> {
    /// Insert an `Alloca` after the existing ones in the entry block.
    pub fn alloca(self, name: Name, frozen: bool) -> SlotId {
        let builder = self.builder;
        let slot = SlotId::new(to_u32(builder.slots.len()));
        builder.slots.push(Slot { name, frozen });
        let at = builder.alloca_count;
        builder.blocks[0].instrs.insert(at, Instr::Alloca { slot });
        builder.alloca_count += 1;
        slot
    }
}
