//! Liveness-interval analysis
//!
//! The IR is a single straight-line block, so liveness is a single forward
//! scan rather than a fixed-point dataflow computation: a version's interval
//! starts at its defining instruction and ends at the last instruction
//! referencing it.

use crate::error::{Error, Result};
use crate::ir::{Instruction, IrValue};
use std::collections::HashMap;

/// Instruction-index range over which a variable version is live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// Index of the defining instruction
    pub start: usize,
    /// Index of the last instruction referencing the version
    ///
    /// Equals `start` for a version that is never read.
    pub end: usize,
}

/// Map from variable version to its liveness interval
pub type LivenessMap = HashMap<String, Interval>;

/// Compute usage intervals for renamed IR
///
/// Reading an operand with no prior definition is a fatal
/// [`Error::UseOfUndefinedVariable`]: either the input IR is malformed or
/// renaming is defective.
pub fn analyze(instructions: &[Instruction]) -> Result<LivenessMap> {
    let mut intervals = LivenessMap::new();

    for (i, instruction) in instructions.iter().enumerate() {
        match instruction {
            Instruction::Mov { dst, src } => {
                record_use(&mut intervals, src, i)?;
                record_def(&mut intervals, dst, i);
            }
            Instruction::Binary { dst, lhs, rhs, .. } => {
                record_use(&mut intervals, lhs, i)?;
                record_use(&mut intervals, rhs, i)?;
                record_def(&mut intervals, dst, i);
            }
            Instruction::Ret { value } => {
                record_use(&mut intervals, value, i)?;
            }
        }
    }

    Ok(intervals)
}

/// Open the interval of a defined version, or extend it on redefinition
///
/// Redefinition of the same label should not occur after renaming; if it
/// does, the definition is treated as another reference.
fn record_def(intervals: &mut LivenessMap, dst: &str, index: usize) {
    intervals
        .entry(dst.to_string())
        .and_modify(|interval| interval.end = index)
        .or_insert(Interval {
            start: index,
            end: index,
        });
}

/// Extend the interval of a referenced variable operand to `index`
fn record_use(intervals: &mut LivenessMap, value: &IrValue, index: usize) -> Result<()> {
    if let IrValue::Variable(name) = value {
        match intervals.get_mut(name) {
            Some(interval) => interval.end = index,
            None => {
                return Err(Error::UseOfUndefinedVariable {
                    index,
                    name: name.clone(),
                })
            }
        }
    }
    Ok(())
}
