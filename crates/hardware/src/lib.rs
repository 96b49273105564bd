//! Cycle-accurate simulator for declaratively described processor
//! pipelines.
//!
//! Given a processor's functional units and how they are wired into a
//! pipeline, a mnemonic-to-capability instruction-set table, and a
//! straight-line program, this crate computes the exact schedule of
//! execution: for every instruction, the sequence of units it occupies
//! and the cycle at which it occupies each. It implements:
//! 1. **Topology:** Validation of the declared unit graph into a canonical
//!    acyclic form (name uniqueness, edge resolution, acyclicity,
//!    connectivity, capability closure).
//! 2. **ISA:** Case-insensitive capability interning and instruction-set
//!    loading against the processor's supported capabilities.
//! 3. **Assembly:** Line-oriented lexing of programs into typed
//!    instructions with register operands.
//! 4. **Dispatch:** The per-cycle engine — unit widths, read/write lock
//!    hazards, unified-memory serialization, program-order commitment,
//!    and structural-deadlock detection.
//! 5. **Output:** Per-instruction `(cycle, unit)` timelines plus run
//!    statistics.
//!
//! Instruction *semantics* are out of scope: no register value is ever
//! computed, only the schedule.
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use pipesim_core::{Capability, Isa, Processor, Program, Simulator};
//! use pipesim_core::config::{IsaRow, ProcessorDesc, UnitModel};
//!
//! # fn main() -> pipesim_core::Result<()> {
//! let desc = ProcessorDesc {
//!     in_out_ports: vec![UnitModel {
//!         name: "P".into(),
//!         width: NonZeroUsize::MIN,
//!         capabilities: [Capability::new("ALU")].into_iter().collect(),
//!         read_lock: false,
//!         write_lock: false,
//!         mem_access: Default::default(),
//!     }],
//!     ..ProcessorDesc::default()
//! };
//! let processor = Processor::build(&desc)?;
//! let isa = Isa::load(
//!     &[IsaRow::new("ADD", "ALU")],
//!     processor.supported_capabilities(),
//! )?;
//! let program = Program::assemble(["ADD R1, R2, R3"], &isa)?;
//! let result = Simulator::new(processor).run(&program)?;
//! assert_eq!(result.timeline.total_cycles(), 1);
//! # Ok(())
//! # }
//! ```

/// Program assembly: lexing and typed instructions.
pub mod asm;
/// Common types: identifiers, registers, errors.
pub mod common;
/// Decoded input surface (processor description, ISA rows).
pub mod config;
/// The dispatch / hazard engine.
pub mod core;
/// Instruction-set table and capability tokens.
pub mod isa;
/// Simulation facade.
pub mod sim;
/// Simulation statistics.
pub mod stats;
/// The simulation output timeline.
pub mod timeline;
/// Processor topology validation and the canonical graph.
pub mod topology;

/// The tagged error surface; every failure is one of these.
pub use crate::common::error::{Result, SimError, StallReason};
/// Identifier and register name types.
pub use crate::common::{Ident, Mnemonic, Reg, UnitName};
/// Assembled programs and instructions.
pub use crate::asm::{Instruction, Program};
/// The loaded instruction-set table.
pub use crate::isa::{CapRegistry, Capability, Isa};
/// The simulation facade; owns a processor, runs programs.
pub use crate::sim::{Simulation, Simulator};
/// Run statistics.
pub use crate::stats::SimStats;
/// The output schedule.
pub use crate::timeline::{Cycle, Timeline};
/// The validated, canonical processor graph.
pub use crate::topology::Processor;
