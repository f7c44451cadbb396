//! Assembly generation backend
//!
//! Lowers the flat three-address IR to RV32-style assembly text in four
//! stages, each a total function over the previous stage's output:
//!
//! ```text
//! IR → legalize → rename → liveness → allocate + emit → assembly lines
//! ```
//!
//! The first three stages run in [`AssemblyGenerator::load`]; the combined
//! allocator+emitter scan runs in [`AssemblyGenerator::generate`]. The whole
//! pipeline is single-threaded and synchronous, and every error is fatal to
//! the compilation.

mod legalize;
mod liveness;
mod regalloc;
mod rename;

pub use legalize::legalize;
pub use liveness::{analyze, Interval, LivenessMap};
pub use regalloc::{RegisterAllocator, NUM_SCRATCH_REGS, RETURN_REG, WORD_SIZE};
pub use rename::rename;

use crate::error::{Error, Result};
use crate::ir::{BinOp, Instruction, IrValue};
use tracing::debug;

/// IR-to-assembly generator for one compilation unit
///
/// All state is created by [`load`](Self::load) and discarded with the
/// generator; nothing persists across runs.
#[derive(Debug, Default)]
pub struct AssemblyGenerator {
    ir: Vec<Instruction>,
    intervals: LivenessMap,
    asm: Vec<String>,
}

impl AssemblyGenerator {
    /// Creates an empty generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the IR for one procedure, preparing it for generation
    ///
    /// Validates the program shape, then legalizes operand shapes, renames
    /// redefinitions apart, and computes liveness intervals, caching the
    /// results. Fails with [`Error::MalformedProgram`] on an empty list or
    /// one with no terminating return.
    pub fn load(&mut self, instructions: Vec<Instruction>) -> Result<()> {
        if instructions.is_empty() {
            return Err(Error::malformed("empty instruction list"));
        }
        if !instructions
            .iter()
            .any(|inst| matches!(inst, Instruction::Ret { .. }))
        {
            return Err(Error::malformed("no terminating return"));
        }

        let legalized = legalize(&instructions)?;
        debug!(
            input = instructions.len(),
            legalized = legalized.len(),
            "legalized IR"
        );
        let renamed = rename(&legalized);
        self.intervals = analyze(&renamed)?;
        debug!(versions = self.intervals.len(), "computed liveness intervals");
        self.ir = renamed;
        self.asm.clear();
        Ok(())
    }

    /// Run register allocation and emission, producing the assembly lines
    ///
    /// One forward scan: each instruction resolves its destination, then its
    /// left operand, then its right operand, emits its assembly form, and
    /// finally releases every operand whose interval ends at this
    /// instruction (right operand first, then left).
    pub fn generate(&mut self) -> Result<&[String]> {
        let mut registers = RegisterAllocator::new();
        let mut asm = Vec::new();

        for (i, instruction) in self.ir.iter().enumerate() {
            match instruction {
                Instruction::Mov { dst, src } => {
                    let dst_reg = registers.resolve(dst, &mut asm)?;
                    match src {
                        IrValue::Immediate(v) => {
                            asm.push(format!("LI {}, {}", reg(dst_reg), v));
                        }
                        IrValue::Variable(src_name) => {
                            let src_reg = registers.resolve(src_name, &mut asm)?;
                            asm.push(format!("MV {}, {}", reg(dst_reg), reg(src_reg)));
                            self.release_if_ending(&mut registers, src_name, i)?;
                        }
                    }
                }
                Instruction::Binary { op, dst, lhs, rhs } => {
                    let dst_reg = registers.resolve(dst, &mut asm)?;
                    let lhs_name = lhs.as_variable().ok_or_else(|| {
                        Error::invariant(format!(
                            "immediate left operand at instruction {} survived legalization",
                            i
                        ))
                    })?;
                    let lhs_reg = registers.resolve(lhs_name, &mut asm)?;
                    match rhs {
                        IrValue::Immediate(v) => {
                            let mnemonic = match op {
                                BinOp::Add => "ADDI",
                                BinOp::Sub => "SUBI",
                                BinOp::Mul => {
                                    return Err(Error::invariant(format!(
                                        "reg-imm mul at instruction {} survived legalization",
                                        i
                                    )))
                                }
                            };
                            asm.push(format!(
                                "{} {}, {}, {}",
                                mnemonic,
                                reg(dst_reg),
                                reg(lhs_reg),
                                v
                            ));
                        }
                        IrValue::Variable(rhs_name) => {
                            let rhs_reg = registers.resolve(rhs_name, &mut asm)?;
                            let mnemonic = match op {
                                BinOp::Add => "ADD",
                                BinOp::Sub => "SUB",
                                BinOp::Mul => "MUL",
                            };
                            asm.push(format!(
                                "{} {}, {}, {}",
                                mnemonic,
                                reg(dst_reg),
                                reg(lhs_reg),
                                reg(rhs_reg)
                            ));
                            // A repeated operand (`a * a`) is released once,
                            // through the left-operand path
                            if rhs_name != lhs_name {
                                self.release_if_ending(&mut registers, rhs_name, i)?;
                            }
                        }
                    }
                    self.release_if_ending(&mut registers, lhs_name, i)?;
                }
                Instruction::Ret { value } => {
                    match value {
                        IrValue::Immediate(v) => {
                            asm.push(format!("LI {}, {}", regalloc::RETURN_REG, v));
                        }
                        IrValue::Variable(name) => {
                            let value_reg = registers.resolve(name, &mut asm)?;
                            asm.push(format!(
                                "MV {}, {}",
                                regalloc::RETURN_REG,
                                reg(value_reg)
                            ));
                        }
                    }
                    break;
                }
            }
        }

        debug!(
            lines = asm.len(),
            spill_bytes = registers.spill_bytes(),
            "generated assembly"
        );
        self.asm = asm;
        Ok(&self.asm)
    }

    /// The generated assembly lines
    pub fn assembly(&self) -> &[String] {
        &self.asm
    }

    /// Write the generated lines verbatim, one per line, to `path`
    pub fn dump(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let mut text = self.asm.join("\n");
        text.push('\n');
        std::fs::write(path, text).map_err(|e| Error::Io(e.to_string()))
    }

    /// Release an operand whose interval ends at the current instruction
    fn release_if_ending(
        &self,
        registers: &mut RegisterAllocator,
        version: &str,
        index: usize,
    ) -> Result<()> {
        let interval = self.intervals.get(version).ok_or_else(|| {
            Error::invariant(format!("no interval recorded for version {}", version))
        })?;
        if interval.end == index {
            registers.release(version)?;
        }
        Ok(())
    }
}

/// Assembly name of scratch register `index`
fn reg(index: usize) -> String {
    RegisterAllocator::register_name(index)
}
