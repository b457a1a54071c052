#![allow(clippy::unwrap_used)]

use alang_ir::{CmpOp, StringInterner};
use pretty_assertions::assert_eq;
use smallvec::smallvec;

use super::verify_module;
use crate::{
    BinOp, Block, BlockId, Body, FunctionBuilder, Instr, Module, Operand, SlotId, Terminator,
    UnitId, ValueId, VerifyError,
};

fn module_with_main(interner: &StringInterner, body: Body) -> Module {
    let mut module = Module::new("test");
    let main = module.declare_unit(interner.intern("main"), 0);
    module.unit_mut(main).unwrap().body = Some(body);
    module
}

fn check(interner: &StringInterner, body: Body) -> Result<(), VerifyError> {
    verify_module(&module_with_main(interner, body), interner)
}

/// `x = 1; return x + 1`
fn straight_line(interner: &StringInterner) -> Body {
    let mut builder = FunctionBuilder::new(0);
    let x = builder.alloca(interner.intern("x"), false);
    builder.emit_store(x, Operand::Const(1));
    let loaded = builder.emit_load(x);
    let sum = builder.emit_binary(BinOp::Add, Operand::Value(loaded), Operand::Const(1));
    builder.terminate_ret(Operand::Value(sum));
    builder.finish()
}

/// Diamond: `if 1 < 2 then 10 else 20`.
fn diamond() -> Body {
    let mut builder = FunctionBuilder::new(0);
    let cond = builder.emit_cmp(CmpOp::Lt, Operand::Const(1), Operand::Const(2));
    let then_block = builder.new_block();
    let else_block = builder.new_block();
    let merge = builder.new_block();
    builder.terminate_cond_br(cond, then_block, else_block);
    builder.position_at(then_block);
    builder.terminate_br(merge);
    builder.position_at(else_block);
    builder.terminate_br(merge);
    builder.position_at(merge);
    let phi = builder.emit_phi(smallvec![
        (then_block, Operand::Const(10)),
        (else_block, Operand::Const(20))
    ]);
    builder.terminate_ret(Operand::Value(phi));
    builder.finish()
}

fn unit_name(error: &VerifyError) -> Option<&str> {
    match error {
        VerifyError::MissingTerminator { unit, .. }
        | VerifyError::UseBeforeDef { unit, .. }
        | VerifyError::PhiIncoming { unit, .. } => Some(unit.as_str()),
        _ => None,
    }
}

#[test]
fn test_well_formed_bodies_pass() {
    let interner = StringInterner::new();
    assert_eq!(check(&interner, straight_line(&interner)), Ok(()));
    assert_eq!(check(&interner, diamond()), Ok(()));
}

#[test]
fn test_missing_main() {
    let interner = StringInterner::new();
    let module = Module::new("empty");
    assert_eq!(
        verify_module(&module, &interner),
        Err(VerifyError::MissingMain {
            main: UnitId::new(0)
        })
    );
}

#[test]
fn test_duplicate_unit_names() {
    let interner = StringInterner::new();
    let mut module = module_with_main(&interner, straight_line(&interner));
    module.declare_unit(interner.intern("main"), 0);
    assert_eq!(
        verify_module(&module, &interner),
        Err(VerifyError::DuplicateUnit {
            name: "main".to_string()
        })
    );
}

#[test]
fn test_missing_terminator() {
    let interner = StringInterner::new();
    let mut body = straight_line(&interner);
    body.blocks[0].terminator = None;
    let err = check(&interner, body).unwrap_err();
    assert_eq!(unit_name(&err), Some("main"));
    assert!(matches!(err, VerifyError::MissingTerminator { .. }));
}

#[test]
fn test_use_before_def_in_block() {
    let interner = StringInterner::new();
    let mut body = straight_line(&interner);
    // Move the add above the load it reads.
    body.blocks[0].instrs.swap(2, 3);
    assert!(matches!(
        check(&interner, body),
        Err(VerifyError::UseBeforeDef { value, .. }) if value == ValueId::new(0)
    ));
}

#[test]
fn test_undefined_value() {
    let interner = StringInterner::new();
    let mut body = straight_line(&interner);
    body.blocks[0].terminator = Some(Terminator::Ret(Operand::Value(ValueId::new(42))));
    assert!(matches!(
        check(&interner, body),
        Err(VerifyError::UndefinedValue { .. })
    ));
}

#[test]
fn test_ret_of_comparison_is_type_mismatch() {
    let interner = StringInterner::new();
    let mut body = diamond();
    // Ret of the comparison itself: i1 where i64 is required.
    body.blocks[3].terminator = Some(Terminator::Ret(Operand::Value(ValueId::new(0))));
    assert!(matches!(
        check(&interner, body),
        Err(VerifyError::TypeMismatch { .. })
    ));
}

#[test]
fn test_alloca_outside_entry() {
    let interner = StringInterner::new();
    let mut body = diamond();
    body.slots.push(crate::Slot {
        name: interner.intern("late"),
        frozen: false,
    });
    body.blocks[1]
        .instrs
        .push(Instr::Alloca { slot: SlotId::new(0) });
    assert_eq!(
        check(&interner, body),
        Err(VerifyError::AllocaOutsideEntry {
            unit: "main".to_string(),
            block: BlockId::new(1),
        })
    );
}

#[test]
fn test_store_to_unallocated_slot() {
    let interner = StringInterner::new();
    let mut body = straight_line(&interner);
    body.blocks[0].instrs.insert(
        1,
        Instr::Store {
            slot: SlotId::new(9),
            value: Operand::Const(0),
        },
    );
    assert!(matches!(
        check(&interner, body),
        Err(VerifyError::InvalidSlot { slot, .. }) if slot == SlotId::new(9)
    ));
}

#[test]
fn test_invalid_branch_target() {
    let interner = StringInterner::new();
    let mut body = diamond();
    body.blocks[1].terminator = Some(Terminator::Br(BlockId::new(17)));
    assert!(matches!(
        check(&interner, body),
        Err(VerifyError::InvalidTarget { target, .. }) if target == BlockId::new(17)
    ));
}

#[test]
fn test_phi_must_cover_each_predecessor_once() {
    let interner = StringInterner::new();

    let mut missing = diamond();
    if let Instr::Phi { incoming, .. } = &mut missing.blocks[3].instrs[0] {
        incoming.pop();
    }
    let err = check(&interner, missing).unwrap_err();
    assert_eq!(unit_name(&err), Some("main"));
    assert!(matches!(
        err,
        VerifyError::PhiIncoming {
            reason: "a predecessor has no incoming value",
            ..
        }
    ));

    let mut stray = diamond();
    if let Instr::Phi { incoming, .. } = &mut stray.blocks[3].instrs[0] {
        incoming[1].0 = BlockId::new(0);
    }
    assert!(matches!(
        check(&interner, stray),
        Err(VerifyError::PhiIncoming {
            reason: "incoming edge from a non-predecessor",
            ..
        })
    ));
}

#[test]
fn test_phi_after_other_instruction() {
    let interner = StringInterner::new();
    let mut body = diamond();
    body.blocks[3]
        .instrs
        .insert(0, Instr::Print(crate::PrintArg::Int(Operand::Const(1))));
    assert!(matches!(
        check(&interner, body),
        Err(VerifyError::MisplacedPhi { .. })
    ));
}

#[test]
fn test_call_arity_and_callee() {
    let interner = StringInterner::new();
    let mut builder = FunctionBuilder::new(0);
    builder.emit_call(UnitId::new(1), vec![Operand::Const(1), Operand::Const(2)]);
    builder.terminate_ret(Operand::Const(0));
    let mut module = module_with_main(&interner, builder.finish());

    assert!(matches!(
        verify_module(&module, &interner),
        Err(VerifyError::InvalidCallee { .. })
    ));

    let callee = module.declare_unit(interner.intern("f"), 1);
    let mut f = FunctionBuilder::new(1);
    let param = Operand::Value(f.params()[0]);
    f.terminate_ret(param);
    module.unit_mut(callee).unwrap().body = Some(f.finish());

    assert_eq!(
        verify_module(&module, &interner),
        Err(VerifyError::CallArity {
            unit: "main".to_string(),
            block: BlockId::new(0),
            callee: "f".to_string(),
            expected: 1,
            got: 2,
        })
    );
}

#[test]
fn test_block_ids_follow_positions() {
    let interner = StringInterner::new();
    let mut body = diamond();
    body.blocks.swap(1, 2);
    assert!(matches!(
        check(&interner, body),
        Err(VerifyError::BlockIdMismatch { .. })
    ));

    let mut body = straight_line(&interner);
    body.blocks.push(Block {
        id: BlockId::new(1),
        instrs: Vec::new(),
        terminator: Some(Terminator::Ret(Operand::Const(0))),
    });
    assert_eq!(check(&interner, body), Ok(()));
}
