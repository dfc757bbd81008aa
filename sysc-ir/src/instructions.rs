//! IR Instructions
//!
//! Defines the instruction set and the factories that build each
//! instruction. A factory validates its operands, places the instruction
//! in the arena, wires the def-use edges and, when given a block, appends
//! the instruction to it. Factories never name their result; that is the
//! builder's job.

use crate::module::Module;
use crate::ops::{BinaryOp, ICmpPredicate};
use crate::types::{Type, TypeRef};
use crate::values::{BlockId, FunctionId, InstId, ValueId, ValueKind};
use crate::IrError;

/// Instruction opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Return: ret value or ret void
    Ret,
    /// Branch: br label, or br cond, true_label, false_label
    Br,
    /// Binary arithmetic: result = op lhs, rhs
    Binary(BinaryOp),
    /// Allocate stack memory: result = alloca type
    Alloca,
    /// Load from memory: result = load type, ptr
    Load,
    /// Store to memory: store value, ptr
    Store,
    /// Integer comparison producing an i1
    ICmp(ICmpPredicate),
    /// Function call: result = call func(args...)
    Call,
    /// Address computation: result = getelementptr ptr, indices...
    GetElementPtr,
    /// Zero extension: result = zext value to type
    ZExt,
}

impl Opcode {
    pub fn is_terminator(self) -> bool {
        matches!(self, Opcode::Ret | Opcode::Br)
    }

    pub fn is_binary(self) -> bool {
        matches!(self, Opcode::Binary(_))
    }

    /// Whether extra operands may be appended after construction
    pub fn is_variadic(self) -> bool {
        matches!(self, Opcode::Call | Opcode::GetElementPtr)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Ret => "ret",
            Opcode::Br => "br",
            Opcode::Binary(op) => op.mnemonic(),
            Opcode::Alloca => "alloca",
            Opcode::Load => "load",
            Opcode::Store => "store",
            Opcode::ICmp(_) => "icmp",
            Opcode::Call => "call",
            Opcode::GetElementPtr => "getelementptr",
            Opcode::ZExt => "zext",
        }
    }
}

/// Per-instruction data stored in the arena slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionData {
    pub(crate) opcode: Opcode,
    pub(crate) parent: Option<BlockId>,
}

impl InstructionData {
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// The block this instruction was appended to, if any
    pub fn parent(&self) -> Option<BlockId> {
        self.parent
    }

    pub fn is_terminator(&self) -> bool {
        self.opcode.is_terminator()
    }

    pub fn is_binary(&self) -> bool {
        self.opcode.is_binary()
    }
}

impl Module {
    pub fn opcode(&self, inst: InstId) -> Opcode {
        self[inst].opcode
    }

    /// Type reserved by an `alloca`
    pub fn allocated_type(&self, inst: InstId) -> Option<&TypeRef> {
        match self[inst].opcode {
            Opcode::Alloca => self.ty(inst).pointee(),
            _ => None,
        }
    }

    pub fn is_conditional_branch(&self, inst: InstId) -> bool {
        self[inst].opcode == Opcode::Br && self.num_operands(inst) == 3
    }

    pub fn is_void_return(&self, inst: InstId) -> bool {
        self[inst].opcode == Opcode::Ret && self.num_operands(inst) == 0
    }

    /// Pointee of the base pointer of a `getelementptr`
    pub fn gep_source_type(&self, inst: InstId) -> Option<&TypeRef> {
        match self[inst].opcode {
            Opcode::GetElementPtr => self.operand(inst, 0).and_then(|ptr| self.ty(ptr).pointee()),
            _ => None,
        }
    }

    /// `lhs op rhs`; the result has the type of `lhs`
    pub fn binary_inst(&mut self, op: BinaryOp, lhs: ValueId, rhs: ValueId, block: Option<BlockId>) -> Result<InstId, IrError> {
        self.check(lhs)?;
        let ty = self.ty(lhs).clone();
        self.new_instruction(ty, Opcode::Binary(op), vec![lhs, rhs], block)
    }

    /// Stack slot for one `ty`; the result is a `ty*`
    pub fn alloca_inst(&mut self, ty: TypeRef, block: Option<BlockId>) -> Result<InstId, IrError> {
        self.new_instruction(Type::pointer(ty), Opcode::Alloca, Vec::new(), block)
    }

    pub fn load_inst(&mut self, ty: TypeRef, ptr: ValueId, block: Option<BlockId>) -> Result<InstId, IrError> {
        self.expect_pointer(ptr, "load address")?;
        self.new_instruction(ty, Opcode::Load, vec![ptr], block)
    }

    pub fn store_inst(&mut self, value: ValueId, ptr: ValueId, block: Option<BlockId>) -> Result<InstId, IrError> {
        self.check(value)?;
        self.expect_pointer(ptr, "store address")?;
        self.new_instruction(Type::void(), Opcode::Store, vec![value, ptr], block)
    }

    /// `ret <value>` or, with `None`, `ret void`
    pub fn ret_inst(&mut self, value: Option<ValueId>, block: Option<BlockId>) -> Result<InstId, IrError> {
        self.new_instruction(Type::void(), Opcode::Ret, value.into_iter().collect(), block)
    }

    pub fn br_inst(&mut self, target: BlockId, block: Option<BlockId>) -> Result<InstId, IrError> {
        self.check_block(target)?;
        self.new_instruction(Type::void(), Opcode::Br, vec![target.into()], block)
    }

    pub fn cond_br_inst(
        &mut self,
        cond: ValueId,
        if_true: BlockId,
        if_false: BlockId,
        block: Option<BlockId>,
    ) -> Result<InstId, IrError> {
        self.check_block(if_true)?;
        self.check_block(if_false)?;
        self.new_instruction(Type::void(), Opcode::Br, vec![cond, if_true.into(), if_false.into()], block)
    }

    /// Integer comparison; the result is always `i1`
    pub fn icmp_inst(
        &mut self,
        predicate: ICmpPredicate,
        lhs: ValueId,
        rhs: ValueId,
        block: Option<BlockId>,
    ) -> Result<InstId, IrError> {
        self.new_instruction(Type::int1(), Opcode::ICmp(predicate), vec![lhs, rhs], block)
    }

    /// Call `callee` with `args`. Operand 0 is the callee, the rest are the
    /// arguments; the result type is the callee's return type.
    pub fn call_inst(&mut self, callee: FunctionId, args: Vec<ValueId>, block: Option<BlockId>) -> Result<InstId, IrError> {
        self.check_function(callee)?;
        let callee_ty = self.ty(callee).clone();
        let (Some(return_type), Some(param_types)) = (callee_ty.return_type(), callee_ty.param_types()) else {
            return Err(IrError::InvalidOperandType {
                context: "call target",
                expected: "a function type",
                found: callee_ty.to_string(),
            });
        };
        if param_types.len() != args.len() {
            return Err(IrError::ArgumentCountMismatch {
                callee: self.name(callee).to_string(),
                expected: param_types.len(),
                found: args.len(),
            });
        }

        let mut operands = Vec::with_capacity(args.len() + 1);
        operands.push(callee.as_value());
        operands.extend(args);
        self.new_instruction(return_type.clone(), Opcode::Call, operands, block)
    }

    pub fn zext_inst(&mut self, value: ValueId, ty: TypeRef, block: Option<BlockId>) -> Result<InstId, IrError> {
        self.new_instruction(ty, Opcode::ZExt, vec![value], block)
    }

    /// Address arithmetic on `ptr`. The result points at the same element
    /// type as the base pointer.
    pub fn gep_inst(&mut self, ptr: ValueId, indices: Vec<ValueId>, block: Option<BlockId>) -> Result<InstId, IrError> {
        let pointee = self.expect_pointer(ptr, "getelementptr base")?;
        let mut operands = Vec::with_capacity(indices.len() + 1);
        operands.push(ptr);
        operands.extend(indices);
        self.new_instruction(Type::pointer(pointee), Opcode::GetElementPtr, operands, block)
    }

    pub(crate) fn instruction_data(&self, inst: InstId) -> Result<&InstructionData, IrError> {
        let id = inst.as_value();
        self.check(id)?;
        match &self.values[id.index()].kind {
            ValueKind::Instruction(data) => Ok(data),
            _ => Err(IrError::UnknownValue(id)),
        }
    }

    pub(crate) fn instruction_data_mut(&mut self, inst: InstId) -> Result<&mut InstructionData, IrError> {
        let id = inst.as_value();
        self.check(id)?;
        match &mut self.values[id.index()].kind {
            ValueKind::Instruction(data) => Ok(data),
            _ => Err(IrError::UnknownValue(id)),
        }
    }

    /// Checks `ptr` is a pointer and returns its pointee
    fn expect_pointer(&self, ptr: ValueId, context: &'static str) -> Result<TypeRef, IrError> {
        self.check(ptr)?;
        let ty = self.ty(ptr);
        match ty.pointee() {
            Some(pointee) => Ok(pointee.clone()),
            None => Err(IrError::InvalidOperandType {
                context,
                expected: "a pointer",
                found: ty.to_string(),
            }),
        }
    }

    fn new_instruction(
        &mut self,
        ty: TypeRef,
        opcode: Opcode,
        operands: Vec<ValueId>,
        block: Option<BlockId>,
    ) -> Result<InstId, IrError> {
        for operand in &operands {
            self.check(*operand)?;
        }
        if let Some(block) = block {
            self.check_appendable(block)?;
        }

        let inst = InstId(self.alloc(
            ty,
            String::new(),
            operands.into_iter().map(Some).collect(),
            ValueKind::Instruction(InstructionData { opcode, parent: None }),
        )?);
        if let Some(block) = block {
            self.push_instruction(block, inst)?;
        }
        Ok(inst)
    }
}
