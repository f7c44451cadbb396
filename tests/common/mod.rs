//! Shared helpers for integration tests: a tiny executor for the emitted
//! assembly text and a direct IR evaluator, so tests can check that both
//! agree on the returned value.

use minirv::ir::{Instruction, IrValue};
use std::collections::HashMap;

/// Execute emitted assembly lines, returning the value left in `a0`
///
/// Supports exactly the instruction forms the backend emits: `LI`, `MV`,
/// `ADD`, `ADDI`, `SUB`, `SUBI`, `MUL`, and `SW`/`LW` with `offset(x0)`
/// addressing. Arithmetic wraps like the target's.
pub fn execute_asm(lines: &[String]) -> i32 {
    let mut regs: HashMap<String, i32> = HashMap::new();
    let mut memory: HashMap<i32, i32> = HashMap::new();

    for line in lines {
        let (mnemonic, rest) = line
            .split_once(' ')
            .unwrap_or_else(|| panic!("unparseable line: {}", line));
        let operands: Vec<&str> = rest.split(", ").collect();

        match mnemonic {
            "LI" => {
                let value: i32 = operands[1].parse().unwrap();
                regs.insert(operands[0].to_string(), value);
            }
            "MV" => {
                let value = read_reg(&regs, operands[1]);
                regs.insert(operands[0].to_string(), value);
            }
            "ADD" | "SUB" | "MUL" => {
                let lhs = read_reg(&regs, operands[1]);
                let rhs = read_reg(&regs, operands[2]);
                regs.insert(operands[0].to_string(), apply(mnemonic, lhs, rhs));
            }
            "ADDI" | "SUBI" => {
                let lhs = read_reg(&regs, operands[1]);
                let rhs: i32 = operands[2].parse().unwrap();
                regs.insert(operands[0].to_string(), apply(&mnemonic[..3], lhs, rhs));
            }
            "SW" => {
                let value = read_reg(&regs, operands[0]);
                memory.insert(parse_offset(operands[1]), value);
            }
            "LW" => {
                let offset = parse_offset(operands[1]);
                let value = *memory
                    .get(&offset)
                    .unwrap_or_else(|| panic!("load from unwritten slot {}", offset));
                regs.insert(operands[0].to_string(), value);
            }
            other => panic!("unknown mnemonic: {}", other),
        }
    }

    read_reg(&regs, "a0")
}

/// Evaluate IR directly with two's-complement integer arithmetic
///
/// Returns the value of the first `Ret` reached.
pub fn evaluate_ir(instructions: &[Instruction]) -> i32 {
    let mut vars: HashMap<String, i32> = HashMap::new();

    for instruction in instructions {
        match instruction {
            Instruction::Mov { dst, src } => {
                let value = read_value(&vars, src);
                vars.insert(dst.clone(), value);
            }
            Instruction::Binary { op, dst, lhs, rhs } => {
                let value = op.apply(read_value(&vars, lhs), read_value(&vars, rhs));
                vars.insert(dst.clone(), value);
            }
            Instruction::Ret { value } => return read_value(&vars, value),
        }
    }

    panic!("IR has no return");
}

/// Count the emitted lines with the given mnemonic
pub fn count_mnemonic(lines: &[String], mnemonic: &str) -> usize {
    lines
        .iter()
        .filter(|line| line.split(' ').next() == Some(mnemonic))
        .count()
}

fn read_reg(regs: &HashMap<String, i32>, name: &str) -> i32 {
    *regs
        .get(name)
        .unwrap_or_else(|| panic!("read of unwritten register {}", name))
}

fn read_value(vars: &HashMap<String, i32>, value: &IrValue) -> i32 {
    match value {
        IrValue::Immediate(v) => *v,
        IrValue::Variable(name) => *vars
            .get(name)
            .unwrap_or_else(|| panic!("read of unset variable {}", name)),
    }
}

fn apply(mnemonic: &str, lhs: i32, rhs: i32) -> i32 {
    match mnemonic {
        "ADD" => lhs.wrapping_add(rhs),
        "SUB" => lhs.wrapping_sub(rhs),
        "MUL" => lhs.wrapping_mul(rhs),
        other => panic!("unknown ALU mnemonic: {}", other),
    }
}

/// Parse `offset(x0)` addressing into the byte offset
fn parse_offset(operand: &str) -> i32 {
    let (offset, base) = operand
        .split_once('(')
        .unwrap_or_else(|| panic!("bad memory operand: {}", operand));
    assert_eq!(base, "x0)", "memory operands are x0-based");
    offset.parse().unwrap()
}
