//! Three-address intermediate representation
//!
//! The IR is a flat, straight-line instruction list produced by the parser
//! and consumed by the assembly backend. Operands are fully resolved: a
//! [`IrValue::Variable`] is just a name, with no symbol-table lookups left
//! for the backend to perform. A well-formed program ends at its first
//! [`Instruction::Ret`]; anything after it is ignored by the backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An IR operand: either an integer immediate or a named variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IrValue {
    /// Integer constant (machine-width signed, two's complement)
    Immediate(i32),
    /// Named variable
    Variable(String),
}

impl IrValue {
    /// Convenience constructor for a variable operand
    pub fn var(name: impl Into<String>) -> Self {
        IrValue::Variable(name.into())
    }

    /// Whether this operand is a variable
    pub fn is_variable(&self) -> bool {
        matches!(self, IrValue::Variable(_))
    }

    /// The variable name, if this operand is one
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            IrValue::Variable(name) => Some(name),
            IrValue::Immediate(_) => None,
        }
    }
}

impl fmt::Display for IrValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IrValue::Immediate(v) => write!(f, "{}", v),
            IrValue::Variable(name) => write!(f, "{}", name),
        }
    }
}

/// Binary operator of a three-address instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    /// Addition
    Add,
    /// Subtraction
    Sub,
    /// Multiplication
    Mul,
}

impl BinOp {
    /// Apply the operator with two's-complement wrapping semantics
    pub fn apply(self, lhs: i32, rhs: i32) -> i32 {
        match self {
            BinOp::Add => lhs.wrapping_add(rhs),
            BinOp::Sub => lhs.wrapping_sub(rhs),
            BinOp::Mul => lhs.wrapping_mul(rhs),
        }
    }

    /// Whether the operands may be swapped without changing the result
    pub fn is_commutative(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Mul)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
        }
    }
}

/// A three-address IR instruction
///
/// Destinations are always variables. The sum is matched exhaustively in
/// every backend stage, so adding a kind fails to compile until each stage
/// handles it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Copy: `dst = src`
    Mov {
        /// Destination variable
        dst: String,
        /// Source operand
        src: IrValue,
    },
    /// Arithmetic: `dst = lhs op rhs`
    Binary {
        /// Operator
        op: BinOp,
        /// Destination variable
        dst: String,
        /// Left operand
        lhs: IrValue,
        /// Right operand
        rhs: IrValue,
    },
    /// Terminate the procedure, yielding `value`
    Ret {
        /// The returned operand
        value: IrValue,
    },
}

impl Instruction {
    /// Convenience constructor for `Mov`
    pub fn mov(dst: impl Into<String>, src: IrValue) -> Self {
        Instruction::Mov {
            dst: dst.into(),
            src,
        }
    }

    /// Convenience constructor for `Binary`
    pub fn binary(op: BinOp, dst: impl Into<String>, lhs: IrValue, rhs: IrValue) -> Self {
        Instruction::Binary {
            op,
            dst: dst.into(),
            lhs,
            rhs,
        }
    }

    /// Convenience constructor for `Ret`
    pub fn ret(value: IrValue) -> Self {
        Instruction::Ret { value }
    }

    /// The destination variable, if this instruction defines one
    pub fn dst(&self) -> Option<&str> {
        match self {
            Instruction::Mov { dst, .. } | Instruction::Binary { dst, .. } => Some(dst),
            Instruction::Ret { .. } => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instruction::Mov { dst, src } => write!(f, "{} = {}", dst, src),
            Instruction::Binary { op, dst, lhs, rhs } => {
                write!(f, "{} = {} {} {}", dst, lhs, op, rhs)
            }
            Instruction::Ret { value } => write!(f, "return {}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapping_arithmetic() {
        assert_eq!(BinOp::Add.apply(i32::MAX, 1), i32::MIN);
        assert_eq!(BinOp::Sub.apply(i32::MIN, 1), i32::MAX);
        assert_eq!(BinOp::Mul.apply(1 << 20, 1 << 20), 0);
        assert_eq!(BinOp::Mul.apply(-3, 7), -21);
    }

    #[test]
    fn test_commutativity() {
        assert!(BinOp::Add.is_commutative());
        assert!(BinOp::Mul.is_commutative());
        assert!(!BinOp::Sub.is_commutative());
    }

    #[test]
    fn test_display() {
        let inst = Instruction::binary(BinOp::Add, "t1", IrValue::var("a"), IrValue::Immediate(4));
        assert_eq!(inst.to_string(), "t1 = a + 4");
        assert_eq!(Instruction::ret(IrValue::var("t1")).to_string(), "return t1");
    }
}
