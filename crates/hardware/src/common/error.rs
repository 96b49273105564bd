//! Error surface of the simulator.
//!
//! Every failure is a tagged value: one variant per kind, carrying just
//! enough context (the offending name, index, or cycle) for a human
//! message. Each stage validates fully before the next runs, so no partial
//! results leak past an error; all errors are fatal to the current
//! simulation and the caller may retry with new input.

use thiserror::Error;

use crate::common::ident::{Mnemonic, UnitName};
use crate::common::reg::Reg;
use crate::isa::capability::Capability;
use crate::timeline::Cycle;

/// Convenience alias for results carrying a [`SimError`].
pub type Result<T, E = SimError> = std::result::Result<T, E>;

/// Every way a simulation can fail, from graph construction through the
/// final tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Two units share a case-folded name.
    #[error("duplicate unit name `{name}`")]
    DuplicateName {
        /// The colliding name, in the spelling of the second declaration.
        name: UnitName,
    },

    /// A unit names a predecessor that is not defined anywhere.
    #[error("unit `{unit}` lists unknown predecessor `{pred}`")]
    DanglingPredecessor {
        /// The unit whose predecessor list is broken.
        unit: UnitName,
        /// The name that resolved to nothing.
        pred: UnitName,
    },

    /// The unit graph is not acyclic.
    #[error("pipeline graph has a cycle through unit `{unit}`")]
    CyclicPipeline {
        /// A unit on the offending cycle.
        unit: UnitName,
    },

    /// A unit is unreachable from every entry or cannot reach any exit.
    #[error("unit `{unit}` is not on any entry-to-exit path")]
    DeadEnd {
        /// The stranded unit.
        unit: UnitName,
    },

    /// A capability advertised at an exit has no entry-to-exit path that
    /// supports it at every hop.
    #[error("capability `{capability}` has no entry-to-exit path supporting it")]
    UnreachableCapability {
        /// The unsupported capability.
        capability: Capability,
    },

    /// An instruction-set table declares the same mnemonic twice.
    #[error("mnemonic `{mnemonic}` is declared twice in the instruction set")]
    DuplicateMnemonic {
        /// The colliding mnemonic, in the spelling of the second row.
        mnemonic: Mnemonic,
    },

    /// An instruction-set row requires a capability the processor cannot
    /// carry from an entry to an exit.
    #[error("mnemonic `{mnemonic}` requires capability `{capability}`, which this processor does not support")]
    UnsupportedCapability {
        /// The mnemonic whose row was rejected.
        mnemonic: Mnemonic,
        /// The missing capability.
        capability: Capability,
    },

    /// A program line uses a mnemonic absent from the instruction set.
    #[error("line {line}: unknown mnemonic `{mnemonic}`")]
    UnknownMnemonic {
        /// One-based source line number.
        line: usize,
        /// The unresolved mnemonic.
        mnemonic: Mnemonic,
    },

    /// A non-blank program line had no tokens left after stripping
    /// separators.
    #[error("line {line}: no instruction found")]
    EmptyInstruction {
        /// One-based source line number.
        line: usize,
    },

    /// A program line has a mnemonic but no destination operand.
    #[error("line {line}: `{mnemonic}` is missing its destination operand")]
    MissingDestination {
        /// One-based source line number.
        line: usize,
        /// The mnemonic of the truncated instruction.
        mnemonic: Mnemonic,
    },

    /// A tick made no progress while instructions remained in flight. The
    /// processor description cannot execute this program.
    #[error("structural deadlock at cycle {cycle}: instruction {instruction} cannot advance: {reason}")]
    StructuralDeadlock {
        /// The cycle whose tick made no progress.
        cycle: Cycle,
        /// Program-order index of the first blocked instruction.
        instruction: usize,
        /// The unit that instruction occupies, if it has entered the graph.
        unit: Option<UnitName>,
        /// Why its preferred target rejected it.
        reason: StallReason,
    },
}

/// Why an instruction could not take its preferred move during a tick.
///
/// Carried inside [`SimError::StructuralDeadlock`] and tallied per-cause in
/// the simulation statistics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StallReason {
    /// The target unit already holds `width` instructions this cycle.
    #[error("unit `{unit}` is full")]
    Width {
        /// The saturated unit.
        unit: UnitName,
    },

    /// An earlier instruction writing the same register has not yet
    /// reached a write-locking unit.
    #[error("write to `{register}` must wait for an earlier write to commit")]
    WriteOrdering {
        /// The contested destination register.
        register: Reg,
    },

    /// A source register is still owed a write by an earlier instruction.
    #[error("read of `{register}` depends on an uncommitted earlier write")]
    ReadHazard {
        /// The contested source register.
        register: Reg,
    },

    /// The per-cycle unified-memory token for this capability is taken.
    #[error("unified memory is busy for capability `{capability}`")]
    MemoryContention {
        /// The serialized capability.
        capability: Capability,
    },

    /// Retirement must wait for an earlier write to the same register.
    #[error("retirement waits on an earlier write to `{register}`")]
    CommitOrder {
        /// The contested destination register.
        register: Reg,
    },

    /// No reachable unit can carry the instruction further.
    #[error("no unit can accept this instruction")]
    NoViableTarget,

    /// The engine exhausted its cycle safety cap. Indicates a bug in the
    /// engine rather than in the input; the progress rule fires first on
    /// any real deadlock.
    #[error("cycle safety cap exhausted")]
    CycleCapExhausted,
}
