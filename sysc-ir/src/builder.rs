//! IR Builder
//!
//! Provides utilities for constructing IR programmatically. The builder
//! appends at a current insertion block and names every value-producing
//! instruction with the next number from a counter that lives as long as
//! the builder: it is never reset per function or per block. Names stop
//! at `u32::MAX - 1`; past that, value-producing calls fail with
//! `NamesExhausted` before touching the module.

use crate::module::Module;
use crate::ops::{BinaryOp, ICmpPredicate};
use crate::types::TypeRef;
use crate::values::{BlockId, FunctionId, InstId, ValueId};
use crate::IrError;

/// Builder for constructing IR
pub struct IrBuilder<'m> {
    module: &'m mut Module,
    insert_point: Option<BlockId>,
    pub(crate) next_name: u32,
}

impl<'m> IrBuilder<'m> {
    pub fn new(module: &'m mut Module) -> Self {
        Self {
            module,
            insert_point: None,
            next_name: 0,
        }
    }

    /// Builder that starts appending at `block`
    pub fn at(module: &'m mut Module, block: BlockId) -> Self {
        let mut builder = Self::new(module);
        builder.set_insert_point(block);
        builder
    }

    pub fn module(&self) -> &Module {
        &*self.module
    }

    /// Access to the module, e.g. for creating functions and blocks mid-build
    pub fn module_mut(&mut self) -> &mut Module {
        &mut *self.module
    }

    /// Move the insertion point. The naming counter is unaffected.
    pub fn set_insert_point(&mut self, block: BlockId) {
        self.insert_point = Some(block);
    }

    pub fn insert_point(&self) -> Option<BlockId> {
        self.insert_point
    }

    fn block(&self) -> Result<Option<BlockId>, IrError> {
        self.insert_point.map(Some).ok_or(IrError::NoInsertPoint)
    }

    /// Insertion block for an instruction that will be named. Fails up
    /// front when the counter has nothing left to hand out, so no unnamed
    /// value is ever appended.
    fn value_block(&self) -> Result<Option<BlockId>, IrError> {
        if self.next_name == u32::MAX {
            return Err(IrError::NamesExhausted);
        }
        self.block()
    }

    fn named(&mut self, inst: InstId) -> Result<InstId, IrError> {
        let name = self.next_name.to_string();
        log::trace!("naming {} as %{name}", inst.as_value());
        self.module.set_name(inst, name)?;
        self.next_name += 1;
        Ok(inst)
    }

    pub fn create_binary(&mut self, op: BinaryOp, lhs: impl Into<ValueId>, rhs: impl Into<ValueId>) -> Result<InstId, IrError> {
        let block = self.value_block()?;
        let inst = self.module.binary_inst(op, lhs.into(), rhs.into(), block)?;
        self.named(inst)
    }

    pub fn create_add(&mut self, lhs: impl Into<ValueId>, rhs: impl Into<ValueId>) -> Result<InstId, IrError> {
        self.create_binary(BinaryOp::Add, lhs, rhs)
    }

    pub fn create_sub(&mut self, lhs: impl Into<ValueId>, rhs: impl Into<ValueId>) -> Result<InstId, IrError> {
        self.create_binary(BinaryOp::Sub, lhs, rhs)
    }

    pub fn create_mul(&mut self, lhs: impl Into<ValueId>, rhs: impl Into<ValueId>) -> Result<InstId, IrError> {
        self.create_binary(BinaryOp::Mul, lhs, rhs)
    }

    pub fn create_sdiv(&mut self, lhs: impl Into<ValueId>, rhs: impl Into<ValueId>) -> Result<InstId, IrError> {
        self.create_binary(BinaryOp::SDiv, lhs, rhs)
    }

    pub fn create_srem(&mut self, lhs: impl Into<ValueId>, rhs: impl Into<ValueId>) -> Result<InstId, IrError> {
        self.create_binary(BinaryOp::SRem, lhs, rhs)
    }

    pub fn create_ret(&mut self, value: impl Into<ValueId>) -> Result<InstId, IrError> {
        let block = self.block()?;
        self.module.ret_inst(Some(value.into()), block)
    }

    pub fn create_ret_void(&mut self) -> Result<InstId, IrError> {
        let block = self.block()?;
        self.module.ret_inst(None, block)
    }

    pub fn create_br(&mut self, dest: BlockId) -> Result<InstId, IrError> {
        let block = self.block()?;
        self.module.br_inst(dest, block)
    }

    pub fn create_cond_br(&mut self, cond: impl Into<ValueId>, if_true: BlockId, if_false: BlockId) -> Result<InstId, IrError> {
        let block = self.block()?;
        self.module.cond_br_inst(cond.into(), if_true, if_false, block)
    }

    pub fn create_alloca(&mut self, ty: TypeRef) -> Result<InstId, IrError> {
        let block = self.value_block()?;
        let inst = self.module.alloca_inst(ty, block)?;
        self.named(inst)
    }

    pub fn create_load(&mut self, ty: TypeRef, ptr: impl Into<ValueId>) -> Result<InstId, IrError> {
        let block = self.value_block()?;
        let inst = self.module.load_inst(ty, ptr.into(), block)?;
        self.named(inst)
    }

    pub fn create_store(&mut self, value: impl Into<ValueId>, ptr: impl Into<ValueId>) -> Result<InstId, IrError> {
        let block = self.block()?;
        self.module.store_inst(value.into(), ptr.into(), block)
    }

    pub fn create_icmp(&mut self, predicate: ICmpPredicate, lhs: impl Into<ValueId>, rhs: impl Into<ValueId>) -> Result<InstId, IrError> {
        let block = self.value_block()?;
        let inst = self.module.icmp_inst(predicate, lhs.into(), rhs.into(), block)?;
        self.named(inst)
    }

    pub fn create_icmp_eq(&mut self, lhs: impl Into<ValueId>, rhs: impl Into<ValueId>) -> Result<InstId, IrError> {
        self.create_icmp(ICmpPredicate::Eq, lhs, rhs)
    }

    pub fn create_icmp_ne(&mut self, lhs: impl Into<ValueId>, rhs: impl Into<ValueId>) -> Result<InstId, IrError> {
        self.create_icmp(ICmpPredicate::Ne, lhs, rhs)
    }

    pub fn create_icmp_gt(&mut self, lhs: impl Into<ValueId>, rhs: impl Into<ValueId>) -> Result<InstId, IrError> {
        self.create_icmp(ICmpPredicate::Sgt, lhs, rhs)
    }

    pub fn create_icmp_ge(&mut self, lhs: impl Into<ValueId>, rhs: impl Into<ValueId>) -> Result<InstId, IrError> {
        self.create_icmp(ICmpPredicate::Sge, lhs, rhs)
    }

    pub fn create_icmp_lt(&mut self, lhs: impl Into<ValueId>, rhs: impl Into<ValueId>) -> Result<InstId, IrError> {
        self.create_icmp(ICmpPredicate::Slt, lhs, rhs)
    }

    pub fn create_icmp_le(&mut self, lhs: impl Into<ValueId>, rhs: impl Into<ValueId>) -> Result<InstId, IrError> {
        self.create_icmp(ICmpPredicate::Sle, lhs, rhs)
    }

    /// Call `callee`. The result is only named when the callee returns a value.
    pub fn create_call(&mut self, callee: FunctionId, args: Vec<ValueId>) -> Result<InstId, IrError> {
        let returns_value = self
            .module
            .get(callee.as_value())
            .and_then(|data| data.ty().return_type())
            .is_some_and(|ty| !ty.is_void());
        let block = if returns_value { self.value_block()? } else { self.block()? };
        let inst = self.module.call_inst(callee, args, block)?;
        if returns_value {
            self.named(inst)
        } else {
            Ok(inst)
        }
    }

    pub fn create_zext(&mut self, value: impl Into<ValueId>, ty: TypeRef) -> Result<InstId, IrError> {
        let block = self.value_block()?;
        let inst = self.module.zext_inst(value.into(), ty, block)?;
        self.named(inst)
    }

    pub fn create_gep(&mut self, ptr: impl Into<ValueId>, indices: Vec<ValueId>) -> Result<InstId, IrError> {
        let block = self.value_block()?;
        let inst = self.module.gep_inst(ptr.into(), indices, block)?;
        self.named(inst)
    }
}
