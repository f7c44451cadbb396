//! Single-static-definition renaming
//!
//! Legalization can split one source-level destination into several
//! definitions (materialize-then-operate sequences). Without renaming, a
//! later lifetime would be merged with an earlier, unrelated one sharing the
//! same name, corrupting liveness and allocation. Renaming gives every
//! redefinition a fresh version label so no two definitions share one.

use crate::ir::{Instruction, IrValue};
use std::collections::HashMap;

/// Maps each source name to its current version label
#[derive(Debug, Default)]
struct RenameTable {
    current: HashMap<String, String>,
}

impl RenameTable {
    /// The current version label for a source operand
    ///
    /// A name with no definition yet resolves to itself; liveness analysis
    /// reports the undefined use.
    fn resolve(&self, name: &str) -> String {
        self.current.get(name).cloned().unwrap_or_else(|| name.to_string())
    }

    fn resolve_value(&self, value: &IrValue) -> IrValue {
        match value {
            IrValue::Immediate(_) => value.clone(),
            IrValue::Variable(name) => IrValue::Variable(self.resolve(name)),
        }
    }

    /// Record a definition of `name`, returning its new version label
    ///
    /// The first definition keeps the original name; each redefinition
    /// appends `+` to the previous label. `+` cannot appear in identifiers
    /// or temporaries, so versions never collide with source names.
    fn define(&mut self, name: &str) -> String {
        let version = match self.current.get(name) {
            Some(previous) => format!("{}+", previous),
            None => name.to_string(),
        };
        self.current.insert(name.to_string(), version.clone());
        version
    }
}

/// Rewrite legalized IR into single-static-definition form
///
/// Source operands are resolved to the current version label *before* the
/// destination is redefined, so an instruction reading the name it writes
/// sees the previous version.
pub fn rename(instructions: &[Instruction]) -> Vec<Instruction> {
    let mut table = RenameTable::default();
    let mut result = Vec::with_capacity(instructions.len());

    for instruction in instructions {
        match instruction {
            Instruction::Mov { dst, src } => {
                let src = table.resolve_value(src);
                let dst = table.define(dst);
                result.push(Instruction::Mov { dst, src });
            }
            Instruction::Binary { op, dst, lhs, rhs } => {
                let lhs = table.resolve_value(lhs);
                let rhs = table.resolve_value(rhs);
                let dst = table.define(dst);
                result.push(Instruction::Binary {
                    op: *op,
                    dst,
                    lhs,
                    rhs,
                });
            }
            Instruction::Ret { value } => {
                result.push(Instruction::Ret {
                    value: table.resolve_value(value),
                });
            }
        }
    }

    result
}
