//! Lowering pass: syntax tree to control-flow graph.
//!
//! One left-to-right, depth-first walk over the same tree the interpreter
//! consumes. Every variable gets an `i64` stack slot in its unit's entry
//! block; reads are loads and `set` is a store. Only the merge blocks of
//! `if`/`and`/`or` carry a phi. Loops re-load their slots after the back
//! edge and need none.
//!
//! The first error aborts lowering. Structural checks of the finished graph
//! are left to the verifier, which runs once at the end.

mod calls;
mod control_flow;

use alang_ir::{
    ensure_sufficient_stack, ArithOp, ExprArena, ExprId, ExprKind, ExprRange, Form, FormTable,
    Name, Program, Span, StringInterner,
};
use rustc_hash::FxHashMap;

use crate::builder::FunctionBuilder;
use crate::errors::LowerError;
use crate::ir::{BinOp, Module, Operand, PrintArg, SlotId, StrId, UnitId};
use crate::registry::FunctionRegistry;
use crate::verify::verify_module;
use crate::LowerConfig;

/// Lower a parsed program into a verified [`Module`].
///
/// Top-level expressions go into the entry unit `main`, which returns 0.
/// Each `defun` becomes its own unit.
pub fn lower_program(
    program: &Program,
    interner: &StringInterner,
    config: &LowerConfig,
) -> Result<Module, LowerError> {
    let mut lowerer = Lowerer::new(&program.arena, interner, config);
    if config.resolve_signatures_first {
        lowerer.presolve(&program.roots);
    }
    let module = lowerer.lower_main(&program.roots)?;

    verify_module(&module, interner)?;
    tracing::debug!(
        module = %module.name,
        units = module.units.len(),
        strings = module.strings.len(),
        "module verified"
    );
    Ok(module)
}

/// Lowering state for the unit currently being built.
struct UnitState {
    unit: UnitId,
    builder: FunctionBuilder,
    /// Compile-time scopes, outermost first. Never empty.
    scopes: Vec<FxHashMap<Name, SlotId>>,
}

impl UnitState {
    fn new(unit: UnitId, arity: usize) -> Self {
        Self {
            unit,
            builder: FunctionBuilder::new(arity),
            scopes: vec![FxHashMap::default()],
        }
    }

    fn lookup(&self, name: Name) -> Option<SlotId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).copied())
    }

    fn is_frozen(&self, slot: SlotId) -> bool {
        self.builder.slot(slot).is_some_and(|s| s.frozen)
    }

    /// Bind in the unit's outermost scope (`set` of an unknown name).
    fn bind_outer(&mut self, name: Name, slot: SlotId) {
        if let Some(scope) = self.scopes.first_mut() {
            scope.insert(name, slot);
        }
    }

    /// Bind in the innermost scope (`let`, `const`, parameters).
    fn bind_inner(&mut self, name: Name, slot: SlotId) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, slot);
        }
    }

    fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }
}

pub(crate) struct Lowerer<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    forms: FormTable,
    module: Module,
    registry: FunctionRegistry,
    strings: FxHashMap<Name, StrId>,
    /// Unit being lowered. A nested `defun` swaps it out for the duration.
    current: UnitState,
    /// Units whose bodies are still being lowered, outermost first.
    in_progress: Vec<UnitId>,
}

impl<'a> Lowerer<'a> {
    fn new(arena: &'a ExprArena, interner: &'a StringInterner, config: &LowerConfig) -> Self {
        let mut module = Module::new(config.module_name.clone());
        let main = module.declare_unit(interner.intern("main"), 0);
        module.main = main;
        Self {
            arena,
            interner,
            forms: FormTable::new(interner),
            module,
            registry: FunctionRegistry::new(),
            strings: FxHashMap::default(),
            current: UnitState::new(main, 0),
            in_progress: vec![main],
        }
    }

    /// Lower every top-level expression into `main` and finish the module.
    fn lower_main(mut self, roots: &[ExprId]) -> Result<Module, LowerError> {
        for &root in roots {
            self.lower_expr(root)?;
        }
        self.current.builder.terminate_ret(Operand::Const(0));
        let main = self.current.unit;
        let body = self.current.builder.finish();
        if let Some(unit) = self.module.unit_mut(main) {
            unit.body = Some(body);
        }
        Ok(self.module)
    }

    #[inline]
    fn fb(&mut self) -> &mut FunctionBuilder {
        &mut self.current.builder
    }

    fn name(&self, name: Name) -> String {
        self.interner.lookup(name).to_string()
    }

    fn lower_expr(&mut self, id: ExprId) -> Result<Operand, LowerError> {
        ensure_sufficient_stack(|| self.lower_expr_inner(id))
    }

    fn lower_expr_inner(&mut self, id: ExprId) -> Result<Operand, LowerError> {
        let expr = *self.arena.get(id);
        match expr.kind {
            ExprKind::Int(n) => Ok(Operand::Const(n)),
            ExprKind::Str(_) => Err(LowerError::Unsupported {
                construct: "a string outside `print`",
                span: expr.span,
            }),
            ExprKind::Ident(name) => match self.current.lookup(name) {
                Some(slot) => Ok(Operand::Value(self.fb().emit_load(slot))),
                None => Err(LowerError::UndefinedVariable {
                    name: self.name(name),
                    span: expr.span,
                }),
            },
            ExprKind::Quote { .. } => Err(LowerError::Unsupported {
                construct: "quote",
                span: expr.span,
            }),
            ExprKind::Let { bindings, body } => {
                let arena = self.arena;
                let bindings = arena.get_bindings(bindings);
                let mut values = Vec::with_capacity(bindings.len());
                // All initializers see the enclosing scope only.
                for binding in bindings {
                    values.push((binding.name, self.lower_expr(binding.init)?));
                }
                self.current.push_scope();
                for (name, value) in values {
                    let slot = self.fb().alloca(name, false);
                    self.current.bind_inner(name, slot);
                    self.fb().emit_store(slot, value);
                }
                let result = self.lower_body(body);
                self.current.pop_scope();
                result
            }
            ExprKind::List(range) => self.lower_list(range, expr.span),
        }
    }

    fn lower_list(&mut self, range: ExprRange, span: Span) -> Result<Operand, LowerError> {
        let arena = self.arena;
        let Some((&head, args)) = arena.get_expr_list(range).split_first() else {
            return Err(LowerError::UnknownForm {
                form: "()".to_string(),
                span,
            });
        };
        let Some(name) = arena.as_ident(head) else {
            return Err(LowerError::Unsupported {
                construct: "an indirect call",
                span,
            });
        };
        match self.forms.classify(name) {
            Some(form) => self.lower_form(form, range, args, span),
            None => self.lower_call(name, args, span),
        }
    }

    /// Lower a sequence, yielding the last value (0 if empty).
    fn lower_body(&mut self, body: ExprRange) -> Result<Operand, LowerError> {
        let arena = self.arena;
        let mut last = Operand::Const(0);
        for &expr in arena.get_expr_list(body) {
            last = self.lower_expr(expr)?;
        }
        Ok(last)
    }

    fn lower_form(
        &mut self,
        form: Form,
        range: ExprRange,
        args: &[ExprId],
        span: Span,
    ) -> Result<Operand, LowerError> {
        match form {
            Form::Print => self.lower_print(args, span),
            Form::Set => self.lower_set(args, span),
            Form::Const => self.lower_const(args, span),
            Form::If => self.lower_if(args, span),
            Form::Not => self.lower_not(args, span),
            Form::And => self.lower_logic(args, true),
            Form::Or => self.lower_logic(args, false),
            Form::While => self.lower_while(args, span),
            Form::Defun => self.lower_defun(range, args, span),
            Form::Lambda => {
                tracing::debug!("lambda lowered to placeholder constant");
                Ok(Operand::Const(0))
            }
            Form::Quote => Err(LowerError::Unsupported {
                construct: "quote",
                span,
            }),
            Form::Arith(op) => self.lower_arith(op, args, span),
            Form::Compare(op) => Err(LowerError::UnknownOperator {
                op: op.as_symbol(),
                span,
            }),
        }
    }

    fn lower_print(&mut self, args: &[ExprId], span: Span) -> Result<Operand, LowerError> {
        if args.is_empty() {
            return Err(LowerError::MalformedForm {
                form: "print",
                reason: "expects at least one argument",
                span,
            });
        }
        for &arg in args {
            let arg = match self.arena.kind(arg) {
                ExprKind::Str(text) => PrintArg::Str(self.string_id(text)),
                _ => PrintArg::Int(self.lower_expr(arg)?),
            };
            self.fb().emit_print(arg);
        }
        Ok(Operand::Const(0))
    }

    fn string_id(&mut self, text: Name) -> StrId {
        if let Some(&id) = self.strings.get(&text) {
            return id;
        }
        let id = self.module.add_string(self.interner.lookup(text));
        self.strings.insert(text, id);
        id
    }

    fn lower_set(&mut self, args: &[ExprId], span: Span) -> Result<Operand, LowerError> {
        let [target, init] = args else {
            return Err(LowerError::MalformedForm {
                form: "set",
                reason: "expects a name and a value",
                span,
            });
        };
        let name = self.binding_target("set", *target)?;
        let value = self.lower_expr(*init)?;
        let slot = match self.current.lookup(name) {
            Some(slot) if self.current.is_frozen(slot) => {
                return Err(LowerError::ImmutableBinding {
                    name: self.name(name),
                    span,
                });
            }
            Some(slot) => slot,
            None => {
                let slot = self.fb().alloca(name, false);
                self.current.bind_outer(name, slot);
                slot
            }
        };
        self.fb().emit_store(slot, value);
        Ok(value)
    }

    fn lower_const(&mut self, args: &[ExprId], span: Span) -> Result<Operand, LowerError> {
        let [target, init] = args else {
            return Err(LowerError::MalformedForm {
                form: "const",
                reason: "expects a name and a value",
                span,
            });
        };
        let name = self.binding_target("const", *target)?;
        let value = self.lower_expr(*init)?;
        if self
            .current
            .lookup(name)
            .is_some_and(|slot| self.current.is_frozen(slot))
        {
            return Err(LowerError::DuplicateConst {
                name: self.name(name),
                span,
            });
        }
        let slot = self.fb().alloca(name, true);
        self.current.bind_inner(name, slot);
        self.fb().emit_store(slot, value);
        Ok(value)
    }

    fn lower_arith(
        &mut self,
        op: ArithOp,
        operands: &[ExprId],
        span: Span,
    ) -> Result<Operand, LowerError> {
        let Some((&first, rest)) = operands
            .split_first()
            .filter(|_| operands.len() >= op.min_operands())
        else {
            return Err(LowerError::OperatorArity {
                op: op.as_symbol(),
                expected: if op.min_operands() == 1 {
                    "at least 1"
                } else {
                    "at least 2"
                },
                got: operands.len(),
                span,
            });
        };

        let mut acc = self.lower_expr(first)?;
        if rest.is_empty() {
            return Ok(Operand::Value(self.fb().emit_neg(acc)));
        }
        let bin = match op {
            ArithOp::Add => BinOp::Add,
            ArithOp::Sub => BinOp::Sub,
            ArithOp::Mul => BinOp::Mul,
            ArithOp::Div => BinOp::SDiv,
        };
        for &operand in rest {
            let rhs = self.lower_expr(operand)?;
            // Runtime divisors are not checked; a literal zero is.
            if bin == BinOp::SDiv && rhs == Operand::Const(0) {
                return Err(LowerError::DivisionByZero {
                    span: self.arena.span(operand),
                });
            }
            acc = Operand::Value(self.fb().emit_binary(bin, acc, rhs));
        }
        Ok(acc)
    }

    fn binding_target(&self, form: &'static str, id: ExprId) -> Result<Name, LowerError> {
        self.arena
            .as_ident(id)
            .ok_or_else(|| LowerError::MalformedForm {
                form,
                reason: "target must be an identifier",
                span: self.arena.span(id),
            })
    }
}
