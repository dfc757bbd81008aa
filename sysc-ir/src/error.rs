//! IR construction error types

use crate::values::ValueId;
use sysc_common::CompilerError;
use thiserror::Error;

/// Contract violations detected while building IR.
///
/// Every fallible operation validates its inputs before touching the
/// arena, so an `Err` never leaves a half-wired instruction behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IrError {
    #[error("Invalid operand type for {context}: expected {expected}, found '{found}'")]
    InvalidOperandType {
        context: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("Operand index {index} out of range for a user with {num_operands} operands")]
    OperandIndexOutOfRange {
        index: usize,
        num_operands: usize,
    },

    #[error("Call to '@{callee}' expects {expected} arguments, got {found}")]
    ArgumentCountMismatch {
        callee: String,
        expected: usize,
        found: usize,
    },

    #[error("Block '{block}' already ends with a terminator")]
    BlockAlreadyTerminated { block: String },

    #[error("'{name}' is already attached to a parent")]
    AlreadyAttached { name: String },

    #[error("No insertion point set")]
    NoInsertPoint,

    #[error("'{value}' ({kind}) cannot {action}")]
    NotAUser {
        value: String,
        kind: &'static str,
        action: &'static str,
    },

    #[error("Value {0:?} does not belong to this module")]
    UnknownValue(ValueId),

    #[error("Module arena cannot hold more than 2^32 values")]
    ArenaExhausted,

    #[error("Builder has used every temporary name")]
    NamesExhausted,
}

impl From<IrError> for CompilerError {
    fn from(err: IrError) -> Self {
        CompilerError::IrConstruction {
            message: err.to_string(),
        }
    }
}
