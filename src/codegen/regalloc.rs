//! LRU register allocation with spilling
//!
//! The register file is a fixed array of scratch registers (`t0..t6` on the
//! reference target). Each resident version carries a recency counter; on a
//! full file the resident with the greatest counter is evicted to a spill
//! slot. Spill slots live in a zero-based, monotonically growing stack area
//! addressed off `x0`; a slot, once assigned to a version, belongs to that
//! version for the rest of the run. The O(N) counter scan per access is
//! intentional: N is 7.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Number of scratch registers on the reference target
pub const NUM_SCRATCH_REGS: usize = 7;

/// Bytes per spill slot (one machine word)
pub const WORD_SIZE: i32 = 4;

/// Name of the designated return-value register
pub const RETURN_REG: &str = "a0";

/// Current location of a variable version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assignment {
    /// Resident in scratch register `tN`
    InRegister(usize),
    /// Evicted to the spill slot at this byte offset
    InSpillSlot(i32),
}

/// A register slot's resident version and recency counter
#[derive(Debug)]
struct Resident {
    version: String,
    recency: u32,
}

/// Register file and spill-slot bookkeeping for one generation run
///
/// Constructed fresh per run and discarded afterwards; the register count is
/// injectable so allocation behavior can be tested in isolation under
/// arbitrary pressure.
#[derive(Debug)]
pub struct RegisterAllocator {
    slots: Vec<Option<Resident>>,
    assignments: HashMap<String, Assignment>,
    /// Per-version spill slot, assigned at first eviction, never reassigned
    spill_slots: HashMap<String, i32>,
    stack_pointer: i32,
}

impl RegisterAllocator {
    /// Creates an allocator with the target's register-file size
    pub fn new() -> Self {
        Self::with_registers(NUM_SCRATCH_REGS)
    }

    /// Creates an allocator with `count` scratch registers
    pub fn with_registers(count: usize) -> Self {
        assert!(count >= 1, "register file cannot be empty");
        RegisterAllocator {
            slots: (0..count).map(|_| None).collect(),
            assignments: HashMap::new(),
            spill_slots: HashMap::new(),
            stack_pointer: 0,
        }
    }

    /// Assembly name of scratch register `index`
    pub fn register_name(index: usize) -> String {
        format!("t{}", index)
    }

    /// Resolve a version to a scratch-register index
    ///
    /// Spill and reload lines required to make the version resident are
    /// appended to `asm`, in order, before the caller emits the instruction
    /// that needed the register. Every access refreshes recency: the
    /// accessed register's counter resets to zero, every other resident
    /// counter increments.
    pub fn resolve(&mut self, version: &str, asm: &mut Vec<String>) -> Result<usize> {
        if let Some(Assignment::InRegister(index)) = self.assignments.get(version) {
            let index = *index;
            self.touch(index);
            return Ok(index);
        }

        // Not resident: make room first if the file is full
        let index = match self.free_slot() {
            Some(index) => index,
            None => {
                let victim = self.eviction_victim()?;
                self.evict(victim, asm)?;
                victim
            }
        };

        // Previously spilled versions reload from their slot
        if let Some(Assignment::InSpillSlot(offset)) = self.assignments.get(version) {
            asm.push(format!("LW {}, {}(x0)", Self::register_name(index), offset));
        }

        self.assignments
            .insert(version.to_string(), Assignment::InRegister(index));
        self.slots[index] = Some(Resident {
            version: version.to_string(),
            recency: 0,
        });
        self.touch(index);
        Ok(index)
    }

    /// Release a version's location, wherever it currently resides
    ///
    /// Called when the current instruction index equals the version's
    /// interval end. Releasing a version resident nowhere is an internal
    /// invariant violation.
    pub fn release(&mut self, version: &str) -> Result<()> {
        match self.assignments.remove(version) {
            Some(Assignment::InRegister(index)) => {
                self.slots[index] = None;
                Ok(())
            }
            // The slot itself is never handed to another version
            Some(Assignment::InSpillSlot(_)) => Ok(()),
            None => Err(Error::invariant(format!(
                "released version {} is resident nowhere",
                version
            ))),
        }
    }

    /// Total bytes of spill space allocated so far
    pub fn spill_bytes(&self) -> i32 {
        self.stack_pointer
    }

    fn free_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// The resident slot with the greatest recency counter; ties break to
    /// the lowest register index
    fn eviction_victim(&self) -> Result<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|r| (i, r.recency)))
            .max_by(|(ia, ra), (ib, rb)| ra.cmp(rb).then(ib.cmp(ia)))
            .map(|(i, _)| i)
            .ok_or_else(|| Error::invariant("no free slot and no eviction candidate"))
    }

    /// Store the victim's value to its spill slot and vacate the register
    fn evict(&mut self, index: usize, asm: &mut Vec<String>) -> Result<()> {
        let resident = self.slots[index]
            .take()
            .ok_or_else(|| Error::invariant("eviction victim slot is empty"))?;
        let offset = match self.spill_slots.get(&resident.version) {
            // Re-eviction reuses the slot assigned at first eviction
            Some(offset) => *offset,
            None => {
                let offset = self.stack_pointer;
                self.stack_pointer += WORD_SIZE;
                self.spill_slots.insert(resident.version.clone(), offset);
                offset
            }
        };
        asm.push(format!("SW {}, {}(x0)", Self::register_name(index), offset));
        self.assignments
            .insert(resident.version, Assignment::InSpillSlot(offset));
        Ok(())
    }

    /// Reset the accessed register's recency, age every other resident
    fn touch(&mut self, index: usize) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if let Some(resident) = slot {
                if i == index {
                    resident.recency = 0;
                } else {
                    resident.recency += 1;
                }
            }
        }
    }
}

impl Default for RegisterAllocator {
    fn default() -> Self {
        Self::new()
    }
}
