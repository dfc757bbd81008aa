//! Textual IR rendering
//!
//! Printing is a read-only walk: module -> globals -> functions -> blocks
//! -> instructions. Each level is a small adapter that borrows the module
//! and implements `Display`, and instruction rendering is a single match
//! over [`Opcode`].

use std::fmt;

use crate::instructions::Opcode;
use crate::module::Module;
use crate::values::{BlockId, FunctionId, GlobalId, InstId, ValueId, ValueKind};

/// A value as an operand: `%name`, `@name`, or a literal
pub struct ValueRef<'m> {
    module: &'m Module,
    value: Option<ValueId>,
}

/// An operand with its type in front: `i32 %0`
pub struct TypedValue<'m> {
    module: &'m Module,
    value: Option<ValueId>,
}

pub struct InstructionDisplay<'m> {
    module: &'m Module,
    inst: InstId,
}

pub struct BlockDisplay<'m> {
    module: &'m Module,
    block: BlockId,
}

pub struct FunctionDisplay<'m> {
    module: &'m Module,
    function: FunctionId,
}

pub struct GlobalDisplay<'m> {
    module: &'m Module,
    global: GlobalId,
}

impl Module {
    pub fn display_value(&self, value: impl Into<ValueId>) -> ValueRef<'_> {
        ValueRef { module: self, value: Some(value.into()) }
    }

    pub fn display_instruction(&self, inst: InstId) -> InstructionDisplay<'_> {
        InstructionDisplay { module: self, inst }
    }

    pub fn display_block(&self, block: BlockId) -> BlockDisplay<'_> {
        BlockDisplay { module: self, block }
    }

    pub fn display_function(&self, function: FunctionId) -> FunctionDisplay<'_> {
        FunctionDisplay { module: self, function }
    }

    pub fn display_global(&self, global: GlobalId) -> GlobalDisplay<'_> {
        GlobalDisplay { module: self, global }
    }

    fn operand_ref(&self, user: impl Into<ValueId>, index: usize) -> ValueRef<'_> {
        ValueRef { module: self, value: self.operand(user, index) }
    }

    fn typed_operand(&self, user: impl Into<ValueId>, index: usize) -> TypedValue<'_> {
        TypedValue { module: self, value: self.operand(user, index) }
    }
}

impl fmt::Display for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(value) = self.value else {
            return write!(f, "<null>");
        };
        let data = &self.module[value];
        match data.kind() {
            ValueKind::ConstantInt(v) => write!(f, "{v}"),
            _ if data.is_global_symbol() => write!(f, "@{}", data.name()),
            _ => write!(f, "%{}", data.name()),
        }
    }
}

impl fmt::Display for TypedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{} {}", self.module.ty(value), self.module.display_value(value)),
            None => write!(f, "<null>"),
        }
    }
}

impl fmt::Display for InstructionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.module;
        let inst = self.inst;
        let ty = m.ty(inst);
        let result = m.display_value(inst);

        match m.opcode(inst) {
            Opcode::Binary(op) => {
                write!(f, "{result} = {op} {ty} {}, {}", m.operand_ref(inst, 0), m.operand_ref(inst, 1))
            }
            Opcode::Alloca => match ty.pointee() {
                Some(allocated) => write!(f, "{result} = alloca {allocated}"),
                None => write!(f, "{result} = alloca <null>"),
            },
            Opcode::Load => write!(f, "{result} = load {ty}, {}", m.typed_operand(inst, 0)),
            Opcode::Store => write!(f, "store {}, {}", m.typed_operand(inst, 0), m.typed_operand(inst, 1)),
            Opcode::Ret => {
                if m.is_void_return(inst) {
                    write!(f, "ret void")
                } else {
                    write!(f, "ret {}", m.typed_operand(inst, 0))
                }
            }
            Opcode::Br => {
                if m.is_conditional_branch(inst) {
                    write!(
                        f,
                        "br {}, label {}, label {}",
                        m.typed_operand(inst, 0),
                        m.operand_ref(inst, 1),
                        m.operand_ref(inst, 2)
                    )
                } else {
                    write!(f, "br label {}", m.operand_ref(inst, 0))
                }
            }
            Opcode::ICmp(predicate) => write!(
                f,
                "{result} = icmp {predicate} {}, {}",
                m.typed_operand(inst, 0),
                m.operand_ref(inst, 1)
            ),
            Opcode::Call => {
                if !ty.is_void() {
                    write!(f, "{result} = ")?;
                }
                write!(f, "call {ty} {}(", m.operand_ref(inst, 0))?;
                for i in 1..m.num_operands(inst) {
                    if i > 1 { write!(f, ", ")?; }
                    write!(f, "{}", m.typed_operand(inst, i))?;
                }
                write!(f, ")")
            }
            Opcode::ZExt => write!(f, "{result} = zext {} to {ty}", m.typed_operand(inst, 0)),
            Opcode::GetElementPtr => {
                match m.gep_source_type(inst) {
                    Some(source) => write!(f, "{result} = getelementptr {source}, ")?,
                    None => write!(f, "{result} = getelementptr <null>, ")?,
                }
                write!(f, "{}", m.typed_operand(inst, 0))?;
                for i in 1..m.num_operands(inst) {
                    write!(f, ", {}", m.typed_operand(inst, i))?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for BlockDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.module.name(self.block);
        if !name.is_empty() {
            writeln!(f, "{name}:")?;
        }
        for inst in self.module.instructions(self.block) {
            writeln!(f, "  {}", self.module.display_instruction(*inst))?;
        }
        Ok(())
    }
}

impl fmt::Display for FunctionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.module;
        match m.return_type(self.function) {
            Some(ret) => write!(f, "define {ret} {}(", m.display_value(self.function))?,
            None => write!(f, "define <null> {}(", m.display_value(self.function))?,
        }
        for (i, arg) in m.args(self.function).iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{} {}", m.ty(*arg), m.display_value(*arg))?;
        }
        writeln!(f, ") {{")?;
        for block in m.blocks(self.function) {
            write!(f, "{}", m.display_block(*block))?;
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for GlobalDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.module;
        let kind = if m[self.global].is_constant() { "constant" } else { "global" };
        write!(f, "{} = {kind} ", m.display_value(self.global))?;
        match m.global_value_type(self.global) {
            Some(ty) => write!(f, "{ty} ")?,
            None => write!(f, "<null> ")?,
        }
        match m.global_initializer(self.global) {
            Some(init) => write!(f, "{}", m.display_value(init)),
            None => write!(f, "zeroinitializer"),
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for global in self.globals() {
            writeln!(f, "{}", self.display_global(*global))?;
        }
        for function in self.functions() {
            writeln!(f, "{}", self.display_function(*function))?;
        }
        Ok(())
    }
}
