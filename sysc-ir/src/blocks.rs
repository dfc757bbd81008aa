//! Basic Block Management
//!
//! Defines basic blocks - ordered instruction sequences that are the unit
//! of control transfer. At most the last instruction of a block is a
//! terminator; appending after one is rejected.

use crate::module::Module;
use crate::types::Type;
use crate::values::{BlockId, FunctionId, InstId, ValueKind};
use crate::IrError;

/// Basic Block - a sequence of instructions with a single entry and exit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockData {
    pub(crate) parent: Option<FunctionId>,
    pub(crate) instructions: Vec<InstId>,
}

impl BlockData {
    pub fn parent(&self) -> Option<FunctionId> {
        self.parent
    }

    pub fn instructions(&self) -> &[InstId] {
        &self.instructions
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl Module {
    /// Create a block labelled `name`. With a parent, the block registers
    /// itself at the end of that function's block list.
    pub fn create_block(&mut self, name: impl Into<String>, parent: Option<FunctionId>) -> Result<BlockId, IrError> {
        if let Some(function) = parent {
            self.check_function(function)?;
        }

        let name = name.into();
        log::debug!("creating block '{name}'");
        let block = BlockId(self.alloc(
            Type::label(),
            name,
            Vec::new(),
            ValueKind::BasicBlock(BlockData { parent, instructions: Vec::new() }),
        )?);
        if let Some(function) = parent {
            self.function_data_mut(function)?.blocks.push(block);
        }
        Ok(block)
    }

    /// Attach a detached instruction to the end of `block`
    pub fn append_instruction(&mut self, block: BlockId, inst: InstId) -> Result<(), IrError> {
        self.check_appendable(block)?;
        let parent = self.instruction_data(inst)?.parent;
        if parent.is_some() {
            return Err(IrError::AlreadyAttached { name: self.name(inst).to_string() });
        }
        self.push_instruction(block, inst)
    }

    pub fn instructions(&self, block: BlockId) -> &[InstId] {
        &self[block].instructions
    }

    /// The block's last instruction, if it is a terminator
    pub fn terminator(&self, block: BlockId) -> Option<InstId> {
        self[block]
            .instructions
            .last()
            .copied()
            .filter(|inst| self[*inst].is_terminator())
    }

    pub fn has_terminator(&self, block: BlockId) -> bool {
        self.terminator(block).is_some()
    }

    pub(crate) fn block_data_mut(&mut self, block: BlockId) -> Result<&mut BlockData, IrError> {
        let id = block.as_value();
        self.check(id)?;
        match &mut self.values[id.index()].kind {
            ValueKind::BasicBlock(data) => Ok(data),
            _ => Err(IrError::UnknownValue(id)),
        }
    }

    pub(crate) fn check_block(&self, block: BlockId) -> Result<(), IrError> {
        let id = block.as_value();
        self.check(id)?;
        match self.values[id.index()].kind {
            ValueKind::BasicBlock(_) => Ok(()),
            _ => Err(IrError::UnknownValue(id)),
        }
    }

    /// A block accepts new instructions until it ends in a terminator
    pub(crate) fn check_appendable(&self, block: BlockId) -> Result<(), IrError> {
        self.check_block(block)?;
        if self.has_terminator(block) {
            return Err(IrError::BlockAlreadyTerminated { block: self.name(block).to_string() });
        }
        Ok(())
    }

    pub(crate) fn push_instruction(&mut self, block: BlockId, inst: InstId) -> Result<(), IrError> {
        self.block_data_mut(block)?.instructions.push(inst);
        self.instruction_data_mut(inst)?.parent = Some(block);
        log::trace!("appended {} to block '{}'", inst.as_value(), self.name(block));
        Ok(())
    }
}
