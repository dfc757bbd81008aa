//! SysY Compiler - Intermediate Representation
//!
//! An SSA-style IR modelled on the LLVM textual format, plus the builder
//! the code generator drives to assemble it. The only persisted form of a
//! module is its text, produced through `Display`.
//!
//! ## Architecture
//!
//! The crate is structured as follows:
//! - `types` - Type system (Type, TypeRef, primitive singletons)
//! - `values` - Value arena handles and the def-use graph
//! - `ops` - Binary operations and comparison predicates
//! - `instructions` - Opcodes and instruction factories
//! - `blocks` - Basic block management
//! - `function` - Functions and their arguments
//! - `module` - Module, the owning arena, and global variables
//! - `builder` - IR construction with automatic naming
//! - `printer` - Textual rendering
//! - `stats` - Module summary counts
//! - `samples` - Canned programs built through the builder

// Public exports - clean API surface
pub use self::types::{Type, TypeRef};
pub use self::values::{BlockId, FunctionId, GlobalId, InstId, Use, ValueData, ValueId, ValueKind};
pub use self::ops::{BinaryOp, ICmpPredicate};
pub use self::instructions::{InstructionData, Opcode};
pub use self::blocks::BlockData;
pub use self::function::FunctionData;
pub use self::module::{GlobalData, Module};
pub use self::builder::IrBuilder;
pub use self::printer::{BlockDisplay, FunctionDisplay, GlobalDisplay, InstructionDisplay, TypedValue, ValueRef};
pub use self::stats::ModuleStats;
pub use self::error::IrError;

mod types;
mod values;
mod ops;
mod instructions;
mod blocks;
mod function;
mod module;
mod builder;
mod printer;
mod stats;
mod error;
pub mod samples;

#[cfg(test)]
mod tests;
