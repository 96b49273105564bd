//! Register write scoreboard.
//!
//! Maps each destination register to the program-order indices of the
//! instructions that write it, and tracks which of those writes have
//! committed (reached a write-locking unit, or retired). Hazard checks
//! become a single lookup: "is anyone before me still going to write this
//! register?"

use std::collections::HashMap;

use crate::asm::Program;
use crate::common::reg::Reg;

/// Tracks, per register, which earlier writers have not yet committed.
#[derive(Debug)]
pub struct Scoreboard {
    writers: HashMap<Reg, Vec<usize>>,
    committed: Vec<bool>,
}

impl Scoreboard {
    /// Builds the writer index for a program. Every instruction writes its
    /// destination; the per-register lists are in program order.
    pub fn new(program: &Program) -> Self {
        let mut writers: HashMap<Reg, Vec<usize>> = HashMap::new();
        for (i, inst) in program.instructions().iter().enumerate() {
            writers.entry(inst.dst.clone()).or_default().push(i);
        }
        Self {
            writers,
            committed: vec![false; program.len()],
        }
    }

    /// The first instruction before `before` that writes `reg` and has not
    /// committed that write, if any.
    pub fn pending_writer_before(&self, reg: &Reg, before: usize) -> Option<usize> {
        self.writers
            .get(reg)?
            .iter()
            .copied()
            .find(|&w| w < before && !self.committed[w])
    }

    /// Marks an instruction's write as committed.
    pub fn mark_committed(&mut self, idx: usize) {
        self.committed[idx] = true;
    }

    /// Whether an instruction's write has committed.
    pub fn is_committed(&self, idx: usize) -> bool {
        self.committed[idx]
    }
}
