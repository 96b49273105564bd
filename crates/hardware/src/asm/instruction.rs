//! Typed instructions.

use std::fmt;

use crate::common::ident::Mnemonic;
use crate::common::reg::Reg;
use crate::isa::capability::Capability;

/// One assembled instruction: a mnemonic, its register operands, and the
/// capability resolved from the instruction-set table.
///
/// The destination is always present; sources may be empty. Register
/// *values* are never modeled — only the names matter, for hazard
/// tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The instruction mnemonic as written.
    pub mnemonic: Mnemonic,

    /// The register this instruction writes.
    pub dst: Reg,

    /// The registers this instruction reads, in operand order.
    pub srcs: Vec<Reg>,

    /// The capability this instruction requires of every unit it occupies.
    pub capability: Capability,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mnemonic, self.dst)?;
        for src in &self.srcs {
            write!(f, ", {src}")?;
        }
        Ok(())
    }
}
