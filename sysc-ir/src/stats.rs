//! Module summary counts, serializable for tooling output

use serde::{Deserialize, Serialize};

use crate::module::Module;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleStats {
    pub name: String,
    pub globals: usize,
    pub functions: usize,
    pub blocks: usize,
    pub instructions: usize,
    /// Blocks whose last instruction is not a terminator
    pub open_blocks: usize,
}

impl Module {
    pub fn stats(&self) -> ModuleStats {
        let blocks: Vec<_> = self
            .functions()
            .iter()
            .flat_map(|f| self.blocks(*f).iter().copied())
            .collect();

        ModuleStats {
            name: self.module_name().to_string(),
            globals: self.globals().len(),
            functions: self.functions().len(),
            blocks: blocks.len(),
            instructions: blocks.iter().map(|b| self.instructions(*b).len()).sum(),
            open_blocks: blocks.iter().filter(|b| !self.has_terminator(**b)).count(),
        }
    }
}
