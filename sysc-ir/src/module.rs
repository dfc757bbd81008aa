//! Module and Global Variables
//!
//! The module is the root of ownership for one compilation: it owns the
//! value arena that every function, block, instruction, argument, global
//! and constant lives in.

use std::ops::Index;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::blocks::BlockData;
use crate::function::FunctionData;
use crate::instructions::InstructionData;
use crate::types::{Type, TypeRef};
use crate::values::{BlockId, FunctionId, GlobalId, InstId, Use, ValueData, ValueId, ValueKind};
use crate::IrError;

/// Data specific to a global variable. The initializer, when present,
/// is operand 0 of the global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalData {
    pub(crate) is_constant: bool,
}

impl GlobalData {
    pub fn is_constant(&self) -> bool {
        self.is_constant
    }
}

static NEXT_MODULE_ID: AtomicU64 = AtomicU64::new(0);

/// Arena index for the slot at position `len`. Indices are `u32`, so an
/// arena holds at most `u32::MAX + 1` values.
pub(crate) fn slot_index(len: usize) -> Result<u32, IrError> {
    u32::try_from(len).map_err(|_| IrError::ArenaExhausted)
}

/// IR Module - represents a complete compilation unit
///
/// Each module is stamped with a process-unique id that every handle it
/// issues carries. A clone keeps the id, so handles into the original are
/// also valid in the copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    id: u64,
    name: String,
    pub(crate) values: Vec<ValueData>,
    pub(crate) functions: Vec<FunctionId>,
    pub(crate) globals: Vec<GlobalId>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NEXT_MODULE_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            values: Vec::new(),
            functions: Vec::new(),
            globals: Vec::new(),
        }
    }

    pub fn module_name(&self) -> &str {
        &self.name
    }

    /// Number of values in the arena
    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    /// True if `value` was issued by this module
    pub fn owns(&self, value: ValueId) -> bool {
        value.module == self.id && value.index() < self.values.len()
    }

    pub fn get(&self, value: ValueId) -> Option<&ValueData> {
        if self.owns(value) {
            self.values.get(value.index())
        } else {
            None
        }
    }

    /// Place a new value in the arena and register a use edge for every
    /// operand that is already set. Callers validate operands first, so the
    /// only failure is a full arena, which is detected before any mutation.
    pub(crate) fn alloc(
        &mut self,
        ty: TypeRef,
        name: String,
        operands: Vec<Option<ValueId>>,
        kind: ValueKind,
    ) -> Result<ValueId, IrError> {
        let id = ValueId {
            module: self.id,
            index: slot_index(self.values.len())?,
        };
        for (operand, value) in operands.iter().enumerate() {
            if let Some(value) = value {
                self.values[value.index()].uses.push(Use { user: id, operand });
            }
        }
        self.values.push(ValueData {
            ty,
            name,
            uses: Vec::new(),
            operands,
            kind,
        });
        Ok(id)
    }

    /// Integer literal of the given type. Constants are not uniqued.
    pub fn const_int(&mut self, ty: TypeRef, value: i64) -> Result<ValueId, IrError> {
        self.alloc(ty, String::new(), Vec::new(), ValueKind::ConstantInt(value))
    }

    /// Shorthand for an `i32` literal
    pub fn const_i32(&mut self, value: i32) -> Result<ValueId, IrError> {
        self.const_int(Type::int32(), value.into())
    }

    /// Create a global variable of type `pointee*` and register it in the
    /// module. The initializer must be a constant.
    pub fn add_global(
        &mut self,
        name: impl Into<String>,
        pointee: TypeRef,
        is_constant: bool,
        initializer: Option<ValueId>,
    ) -> Result<GlobalId, IrError> {
        if let Some(init) = initializer {
            self.check(init)?;
            self.expect_initializer(init)?;
        }

        let name = name.into();
        log::debug!("creating global @{name} of type {pointee}");
        let operands = initializer.into_iter().map(Some).collect();
        let id = GlobalId(self.alloc(
            Type::pointer(pointee),
            name,
            operands,
            ValueKind::GlobalVariable(GlobalData { is_constant }),
        )?);
        self.globals.push(id);
        Ok(id)
    }

    pub fn functions(&self) -> &[FunctionId] {
        &self.functions
    }

    pub fn globals(&self) -> &[GlobalId] {
        &self.globals
    }

    pub fn get_function(&self, name: &str) -> Option<FunctionId> {
        self.functions.iter().copied().find(|f| self.name(*f) == name)
    }

    pub fn get_global(&self, name: &str) -> Option<GlobalId> {
        self.globals.iter().copied().find(|g| self.name(*g) == name)
    }

    pub fn global_initializer(&self, global: GlobalId) -> Option<ValueId> {
        self.operand(global, 0)
    }

    /// The type a global stores (its own type is a pointer to it)
    pub fn global_value_type(&self, global: GlobalId) -> Option<&TypeRef> {
        self.ty(global).pointee()
    }
}

impl Index<ValueId> for Module {
    type Output = ValueData;

    fn index(&self, value: ValueId) -> &ValueData {
        match self.get(value) {
            Some(data) => data,
            None => panic!("{value} does not belong to module '{}'", self.name),
        }
    }
}

macro_rules! index_kind {
    ($handle:ty, $output:ty, $variant:ident, $what:literal) => {
        impl Index<$handle> for Module {
            type Output = $output;

            fn index(&self, id: $handle) -> &$output {
                match &self[id.as_value()].kind {
                    ValueKind::$variant(data) => data,
                    other => panic!("{} is not {}: {other:?}", id.as_value(), $what),
                }
            }
        }
    };
}

index_kind!(FunctionId, FunctionData, Function, "a function");
index_kind!(BlockId, BlockData, BasicBlock, "a basic block");
index_kind!(InstId, InstructionData, Instruction, "an instruction");
index_kind!(GlobalId, GlobalData, GlobalVariable, "a global variable");
