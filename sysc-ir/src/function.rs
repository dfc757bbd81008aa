//! Function Definitions
//!
//! Defines IR functions with their formal arguments and blocks.

use crate::module::{slot_index, Module};
use crate::types::TypeRef;
use crate::values::{BlockId, FunctionId, ValueId, ValueKind};
use crate::IrError;

/// Function in IR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionData {
    pub(crate) blocks: Vec<BlockId>,
    pub(crate) args: Vec<ValueId>,
}

impl FunctionData {
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    pub fn args(&self) -> &[ValueId] {
        &self.args
    }

    pub fn entry_block(&self) -> Option<BlockId> {
        self.blocks.first().copied()
    }
}

impl Module {
    /// Create a function of type `ty` and register it in the module.
    ///
    /// One argument is created per parameter type, named `arg<index>`.
    pub fn add_function(&mut self, name: impl Into<String>, ty: TypeRef) -> Result<FunctionId, IrError> {
        let Some(param_types) = ty.param_types().map(<[TypeRef]>::to_vec) else {
            return Err(IrError::InvalidOperandType {
                context: "function definition",
                expected: "a function type",
                found: ty.to_string(),
            });
        };

        // the function and all of its arguments must fit before any is placed
        slot_index(self.values.len() + param_types.len())?;

        let name = name.into();
        log::debug!("creating function @{name} of type {ty}");
        let function = FunctionId(self.alloc(
            ty,
            name,
            Vec::new(),
            ValueKind::Function(FunctionData { blocks: Vec::new(), args: Vec::new() }),
        )?);

        let args = param_types
            .into_iter()
            .enumerate()
            .map(|(index, param_ty)| {
                self.alloc(
                    param_ty,
                    format!("arg{index}"),
                    Vec::new(),
                    ValueKind::Argument { parent: function, index },
                )
            })
            .collect::<Result<Vec<ValueId>, IrError>>()?;
        self.function_data_mut(function)?.args = args;

        self.functions.push(function);
        Ok(function)
    }

    /// Attach a detached block to the end of `function`
    pub fn add_basic_block(&mut self, function: FunctionId, block: BlockId) -> Result<(), IrError> {
        self.check_function(function)?;
        self.check_block(block)?;
        if self[block].parent.is_some() {
            return Err(IrError::AlreadyAttached { name: self.name(block).to_string() });
        }
        self.block_data_mut(block)?.parent = Some(function);
        self.function_data_mut(function)?.blocks.push(block);
        Ok(())
    }

    pub fn function_type(&self, function: FunctionId) -> &TypeRef {
        self.ty(function)
    }

    pub fn return_type(&self, function: FunctionId) -> Option<&TypeRef> {
        self.function_type(function).return_type()
    }

    pub fn args(&self, function: FunctionId) -> &[ValueId] {
        &self[function].args
    }

    pub fn blocks(&self, function: FunctionId) -> &[BlockId] {
        &self[function].blocks
    }

    pub fn entry_block(&self, function: FunctionId) -> Option<BlockId> {
        self[function].entry_block()
    }

    pub(crate) fn check_function(&self, function: FunctionId) -> Result<(), IrError> {
        let id = function.as_value();
        self.check(id)?;
        match self.values[id.index()].kind {
            ValueKind::Function(_) => Ok(()),
            _ => Err(IrError::UnknownValue(id)),
        }
    }

    pub(crate) fn function_data_mut(&mut self, function: FunctionId) -> Result<&mut FunctionData, IrError> {
        let id = function.as_value();
        self.check(id)?;
        match &mut self.values[id.index()].kind {
            ValueKind::Function(data) => Ok(data),
            _ => Err(IrError::UnknownValue(id)),
        }
    }
}
