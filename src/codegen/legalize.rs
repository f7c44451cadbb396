//! Operand-shape legalization
//!
//! Rewrites the IR so every binary instruction matches a target-encodable
//! form: reg-reg for all three operators, reg-imm for add/sub only.
//! Immediate-immediate operations are folded at compile time. Scanning stops
//! right after the first return; only one terminal instruction is
//! meaningful.

use crate::error::Result;
use crate::ir::{BinOp, Instruction, IrValue};

/// Legalize an instruction list
///
/// Output shapes per operator and `(lhs, rhs)` pair:
///
/// - `(var, var)`: unchanged (reg-reg form exists for add/sub/mul)
/// - `(imm, imm)`: folded to `Mov(dst, imm)` with wrapping arithmetic
/// - `(imm, var)`: add commutes to `(var, imm)`; sub/mul materialize the
///   immediate into the destination first, then apply reg-reg with the
///   destination as left operand
/// - `(var, imm)`: add/sub unchanged (reg-imm form exists); mul has no
///   reg-imm form, so the immediate is materialized into the destination
///   and the remaining reg-reg mul takes the variable on the right
///
/// Running the legalizer on its own output is a no-op.
pub fn legalize(instructions: &[Instruction]) -> Result<Vec<Instruction>> {
    let mut result = Vec::with_capacity(instructions.len());

    for instruction in instructions {
        match instruction {
            Instruction::Binary { op, dst, lhs, rhs } => {
                legalize_binary(&mut result, *op, dst, lhs, rhs)
            }
            Instruction::Mov { .. } => result.push(instruction.clone()),
            Instruction::Ret { .. } => {
                result.push(instruction.clone());
                break;
            }
        }
    }

    Ok(result)
}

fn legalize_binary(
    out: &mut Vec<Instruction>,
    op: BinOp,
    dst: &str,
    lhs: &IrValue,
    rhs: &IrValue,
) {
    match (lhs, rhs) {
        (IrValue::Variable(_), IrValue::Variable(_)) => {
            out.push(Instruction::binary(op, dst, lhs.clone(), rhs.clone()));
        }
        (IrValue::Immediate(a), IrValue::Immediate(b)) => {
            out.push(Instruction::mov(dst, IrValue::Immediate(op.apply(*a, *b))));
        }
        (IrValue::Immediate(_), IrValue::Variable(_)) => match op {
            // Reg-imm form exists for add, so commute
            BinOp::Add => out.push(Instruction::binary(op, dst, rhs.clone(), lhs.clone())),
            // No left-immediate form: materialize, then reg-reg
            BinOp::Sub | BinOp::Mul => {
                out.push(Instruction::mov(dst, lhs.clone()));
                out.push(Instruction::binary(op, dst, IrValue::var(dst), rhs.clone()));
            }
        },
        (IrValue::Variable(_), IrValue::Immediate(_)) => match op {
            BinOp::Add | BinOp::Sub => {
                out.push(Instruction::binary(op, dst, lhs.clone(), rhs.clone()));
            }
            // Mul has no reg-imm form: materialize the immediate into the
            // destination, multiply by the variable
            BinOp::Mul => {
                out.push(Instruction::mov(dst, rhs.clone()));
                out.push(Instruction::binary(op, dst, IrValue::var(dst), lhs.clone()));
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> IrValue {
        IrValue::var(name)
    }

    fn imm(v: i32) -> IrValue {
        IrValue::Immediate(v)
    }

    #[test]
    fn test_reg_reg_passthrough() {
        let ir = vec![
            Instruction::binary(BinOp::Mul, "t", var("a"), var("b")),
            Instruction::ret(var("t")),
        ];
        assert_eq!(legalize(&ir).unwrap(), ir);
    }

    #[test]
    fn test_constant_folding() {
        let ir = vec![
            Instruction::binary(BinOp::Add, "t", imm(2), imm(3)),
            Instruction::ret(var("t")),
        ];
        let legal = legalize(&ir).unwrap();
        assert_eq!(legal[0], Instruction::mov("t", imm(5)));
    }

    #[test]
    fn test_constant_folding_wraps() {
        let ir = vec![
            Instruction::binary(BinOp::Add, "t", imm(i32::MAX), imm(1)),
            Instruction::ret(var("t")),
        ];
        let legal = legalize(&ir).unwrap();
        assert_eq!(legal[0], Instruction::mov("t", imm(i32::MIN)));
    }

    #[test]
    fn test_add_imm_var_commutes() {
        let ir = vec![
            Instruction::mov("a", imm(7)),
            Instruction::binary(BinOp::Add, "t", imm(4), var("a")),
            Instruction::ret(var("t")),
        ];
        let legal = legalize(&ir).unwrap();
        assert_eq!(legal[1], Instruction::binary(BinOp::Add, "t", var("a"), imm(4)));
    }

    #[test]
    fn test_sub_imm_var_materializes() {
        let ir = vec![
            Instruction::mov("a", imm(7)),
            Instruction::binary(BinOp::Sub, "t", imm(10), var("a")),
            Instruction::ret(var("t")),
        ];
        let legal = legalize(&ir).unwrap();
        assert_eq!(legal[1], Instruction::mov("t", imm(10)));
        assert_eq!(legal[2], Instruction::binary(BinOp::Sub, "t", var("t"), var("a")));
    }

    #[test]
    fn test_mul_var_imm_materializes() {
        let ir = vec![
            Instruction::mov("a", imm(6)),
            Instruction::binary(BinOp::Mul, "t", var("a"), imm(3)),
            Instruction::ret(var("t")),
        ];
        let legal = legalize(&ir).unwrap();
        assert_eq!(legal[1], Instruction::mov("t", imm(3)));
        assert_eq!(legal[2], Instruction::binary(BinOp::Mul, "t", var("t"), var("a")));
    }

    #[test]
    fn test_stops_after_first_return() {
        let ir = vec![
            Instruction::ret(imm(1)),
            Instruction::mov("x", imm(2)),
            Instruction::ret(imm(3)),
        ];
        let legal = legalize(&ir).unwrap();
        assert_eq!(legal, vec![Instruction::ret(imm(1))]);
    }

    #[test]
    fn test_idempotent() {
        let ir = vec![
            Instruction::mov("a", imm(7)),
            Instruction::binary(BinOp::Sub, "t", imm(10), var("a")),
            Instruction::binary(BinOp::Mul, "u", var("t"), imm(3)),
            Instruction::binary(BinOp::Add, "v", imm(2), imm(3)),
            Instruction::ret(var("u")),
        ];
        let once = legalize(&ir).unwrap();
        let twice = legalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_illegal_shapes_in_output() {
        let ir = vec![
            Instruction::binary(BinOp::Mul, "a", imm(2), imm(3)),
            Instruction::binary(BinOp::Mul, "b", var("a"), imm(5)),
            Instruction::binary(BinOp::Sub, "c", imm(100), var("b")),
            Instruction::ret(var("c")),
        ];
        let legal = legalize(&ir).unwrap();
        for inst in &legal {
            if let Instruction::Binary { op, lhs, rhs, .. } = inst {
                assert!(
                    lhs.is_variable(),
                    "left operand must be a variable after legalization"
                );
                if *op == BinOp::Mul {
                    assert!(rhs.is_variable(), "mul must be reg-reg after legalization");
                }
            }
        }
    }
}
