//! IR Value Representations
//!
//! Every value (constant, argument, basic block, function, global
//! variable or instruction) lives in its module's arena and is addressed
//! through a [`ValueId`]. Users keep their operands as handles, and every
//! value keeps the list of `(user, operand)` pairs that currently read it.

use std::fmt;

use crate::blocks::BlockData;
use crate::function::FunctionData;
use crate::instructions::InstructionData;
use crate::module::{GlobalData, Module};
use crate::types::TypeRef;
use crate::IrError;

/// Handle to any value in a [`Module`] arena.
///
/// A handle records which module issued it, so a module can tell its own
/// slots apart from another module's slot at the same index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId {
    pub(crate) module: u64,
    pub(crate) index: u32,
}

impl ValueId {
    /// Slot position in the issuing module's arena
    pub fn index(self) -> usize {
        self.index as usize
    }
}

macro_rules! typed_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) ValueId);

        impl $name {
            pub fn as_value(self) -> ValueId {
                self.0
            }
        }

        impl From<$name> for ValueId {
            fn from(id: $name) -> ValueId {
                id.0
            }
        }
    };
}

typed_handle!(
    /// Handle to a function
    FunctionId
);
typed_handle!(
    /// Handle to a basic block
    BlockId
);
typed_handle!(
    /// Handle to an instruction
    InstId
);
typed_handle!(
    /// Handle to a global variable
    GlobalId
);

/// A def-use edge: `user` reads this value through operand slot `operand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Use {
    pub user: ValueId,
    pub operand: usize,
}

/// What a value is, plus any data specific to that kind
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// Immutable integer literal
    ConstantInt(i64),

    /// Formal parameter of a function
    Argument { parent: FunctionId, index: usize },

    BasicBlock(BlockData),
    Function(FunctionData),
    GlobalVariable(GlobalData),
    Instruction(InstructionData),
}

impl ValueKind {
    /// Short description used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            ValueKind::ConstantInt(_) => "constant",
            ValueKind::Argument { .. } => "argument",
            ValueKind::BasicBlock(_) => "basic block",
            ValueKind::Function(_) => "function",
            ValueKind::GlobalVariable(_) => "global variable",
            ValueKind::Instruction(data) => data.opcode().mnemonic(),
        }
    }
}

/// One arena slot
#[derive(Debug, Clone, PartialEq)]
pub struct ValueData {
    pub(crate) ty: TypeRef,
    pub(crate) name: String,
    pub(crate) uses: Vec<Use>,
    pub(crate) operands: Vec<Option<ValueId>>,
    pub(crate) kind: ValueKind,
}

impl ValueData {
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uses(&self) -> &[Use] {
        &self.uses
    }

    /// Operand slots. Non-user values have none; a slot is `None` until set.
    pub fn operands(&self) -> &[Option<ValueId>] {
        &self.operands
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, ValueKind::ConstantInt(_))
    }

    /// Functions and global variables render with `@`
    pub fn is_global_symbol(&self) -> bool {
        matches!(self.kind, ValueKind::Function(_) | ValueKind::GlobalVariable(_))
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.index)
    }
}

impl Module {
    pub(crate) fn check(&self, value: ValueId) -> Result<(), IrError> {
        if self.owns(value) {
            Ok(())
        } else {
            Err(IrError::UnknownValue(value))
        }
    }

    pub fn ty(&self, value: impl Into<ValueId>) -> &TypeRef {
        &self[value.into()].ty
    }

    pub fn name(&self, value: impl Into<ValueId>) -> &str {
        &self[value.into()].name
    }

    pub fn set_name(&mut self, value: impl Into<ValueId>, name: impl Into<String>) -> Result<(), IrError> {
        let value = value.into();
        self.check(value)?;
        self.values[value.index()].name = name.into();
        Ok(())
    }

    pub fn uses(&self, value: impl Into<ValueId>) -> &[Use] {
        &self[value.into()].uses
    }

    pub fn num_operands(&self, user: impl Into<ValueId>) -> usize {
        self[user.into()].operands.len()
    }

    /// Operand `index` of `user`, or `None` if the slot is unset or out of range
    pub fn operand(&self, user: impl Into<ValueId>, index: usize) -> Option<ValueId> {
        self[user.into()].operands.get(index).copied().flatten()
    }

    /// The first operand slot of `user` holding `value`
    pub fn operand_number(&self, user: impl Into<ValueId>, value: impl Into<ValueId>) -> Option<usize> {
        let value = value.into();
        self[user.into()].operands.iter().position(|op| *op == Some(value))
    }

    /// Literal carried by a constant
    pub fn const_value(&self, value: impl Into<ValueId>) -> Option<i64> {
        match self[value.into()].kind {
            ValueKind::ConstantInt(v) => Some(v),
            _ => None,
        }
    }

    /// Position of an argument in its function's parameter list
    pub fn argument_index(&self, value: ValueId) -> Option<usize> {
        match self[value].kind {
            ValueKind::Argument { index, .. } => Some(index),
            _ => None,
        }
    }

    /// Store `value` in operand slot `index` of `user`.
    ///
    /// The previous occupant loses its use edge for this slot and `value`
    /// gains one, so use lists always mirror the operand slots.
    pub fn set_operand(&mut self, user: impl Into<ValueId>, index: usize, value: impl Into<ValueId>) -> Result<(), IrError> {
        let (user, value) = (user.into(), value.into());
        self.check(user)?;
        self.check(value)?;
        match self.values[user.index()].kind {
            ValueKind::Instruction(_) => {}
            ValueKind::GlobalVariable(_) => self.expect_initializer(value)?,
            _ => return Err(self.not_a_user(user, "have its operands set")),
        }

        let num_operands = self.values[user.index()].operands.len();
        if index >= num_operands {
            return Err(IrError::OperandIndexOutOfRange { index, num_operands });
        }

        let edge = Use { user, operand: index };
        if let Some(old) = self.values[user.index()].operands[index].replace(value) {
            let old_uses = &mut self.values[old.index()].uses;
            if let Some(pos) = old_uses.iter().position(|u| *u == edge) {
                old_uses.remove(pos);
            }
        }
        self.values[value.index()].uses.push(edge);
        Ok(())
    }

    /// Grow `user` by one operand slot holding `value`. Only the
    /// variable-arity instructions (`call`, `getelementptr`) accept this.
    pub fn add_operand(&mut self, user: impl Into<ValueId>, value: impl Into<ValueId>) -> Result<(), IrError> {
        let (user, value) = (user.into(), value.into());
        self.check(user)?;
        self.check(value)?;
        match &self.values[user.index()].kind {
            ValueKind::Instruction(data) if data.opcode().is_variadic() => {}
            _ => return Err(self.not_a_user(user, "take extra operands")),
        }

        let operands = &mut self.values[user.index()].operands;
        let operand = operands.len();
        operands.push(Some(value));
        self.values[value.index()].uses.push(Use { user, operand });
        Ok(())
    }

    /// Rewrite every operand slot that reads `old` to read `new` instead.
    ///
    /// Covers repeated occurrences within a single user. Afterwards `old`
    /// has no uses and `new` owns all the moved edges.
    pub fn replace_all_uses_with(&mut self, old: impl Into<ValueId>, new: impl Into<ValueId>) -> Result<(), IrError> {
        let (old, new) = (old.into(), new.into());
        self.check(old)?;
        self.check(new)?;
        if old == new {
            return Ok(());
        }
        let feeds_global = self.values[old.index()]
            .uses
            .iter()
            .any(|edge| matches!(self.values[edge.user.index()].kind, ValueKind::GlobalVariable(_)));
        if feeds_global {
            self.expect_initializer(new)?;
        }

        let uses = std::mem::take(&mut self.values[old.index()].uses);
        for edge in &uses {
            self.values[edge.user.index()].operands[edge.operand] = Some(new);
        }
        log::trace!("replaced {} uses of {old} with {new}", uses.len());
        self.values[new.index()].uses.extend(uses);
        Ok(())
    }

    /// Global initializers are restricted to constants
    pub(crate) fn expect_initializer(&self, value: ValueId) -> Result<(), IrError> {
        let data = &self.values[value.index()];
        if data.is_constant() {
            Ok(())
        } else {
            Err(IrError::InvalidOperandType {
                context: "global initializer",
                expected: "a constant",
                found: data.ty.to_string(),
            })
        }
    }

    fn not_a_user(&self, value: ValueId, action: &'static str) -> IrError {
        IrError::NotAUser {
            value: self.display_value(value).to_string(),
            kind: self.values[value.index()].kind.describe(),
            action,
        }
    }
}
