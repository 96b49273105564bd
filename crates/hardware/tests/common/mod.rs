//! Shared test fixtures.
//!
//! Small builders for unit models and processors, plus the classic
//! five-stage machine most engine tests run on.

use std::num::NonZeroUsize;

use pipesim_core::config::{FuncUnit, IsaRow, ProcessorDesc, UnitModel};
use pipesim_core::timeline::Timeline;
use pipesim_core::{Capability, Isa, Processor, Program};

/// Fluent builder for a [`UnitModel`].
pub struct UnitBuilder {
    model: UnitModel,
}

impl UnitBuilder {
    pub fn new(name: &str, width: usize, caps: &[&str]) -> Self {
        Self {
            model: UnitModel {
                name: name.into(),
                width: NonZeroUsize::new(width).expect("unit width must be positive"),
                capabilities: caps.iter().map(|c| Capability::new(c)).collect(),
                read_lock: false,
                write_lock: false,
                mem_access: Default::default(),
            },
        }
    }

    pub fn read_lock(mut self) -> Self {
        self.model.read_lock = true;
        self
    }

    pub fn write_lock(mut self) -> Self {
        self.model.write_lock = true;
        self
    }

    pub fn mem_access(mut self, caps: &[&str]) -> Self {
        self.model.mem_access = caps.iter().map(|c| Capability::new(c)).collect();
        self
    }

    pub fn model(self) -> UnitModel {
        self.model
    }

    pub fn flows_from(self, preds: &[&str]) -> FuncUnit {
        FuncUnit {
            unit: self.model,
            preds: preds.iter().map(|p| (*p).into()).collect(),
        }
    }
}

/// The classic five-stage pipeline: F -> D -> X -> M -> W, every unit
/// width 1 with capabilities `{ALU, MEM}`, `D` read-locking, `W`
/// write-locking, `F` and `M` accessing unified memory for both
/// capabilities.
pub fn classic_five_stage() -> ProcessorDesc {
    ProcessorDesc {
        in_ports: vec![
            UnitBuilder::new("F", 1, &["ALU", "MEM"])
                .mem_access(&["ALU", "MEM"])
                .model(),
        ],
        out_ports: vec![
            UnitBuilder::new("W", 1, &["ALU", "MEM"])
                .write_lock()
                .flows_from(&["M"]),
        ],
        in_out_ports: vec![],
        internal_units: vec![
            UnitBuilder::new("D", 1, &["ALU", "MEM"])
                .read_lock()
                .flows_from(&["F"]),
            UnitBuilder::new("X", 1, &["ALU", "MEM"]).flows_from(&["D"]),
            UnitBuilder::new("M", 1, &["ALU", "MEM"])
                .mem_access(&["ALU", "MEM"])
                .flows_from(&["X"]),
        ],
    }
}

/// A two-stage machine that only carries `ALU` work.
pub fn alu_only_machine() -> ProcessorDesc {
    ProcessorDesc {
        in_ports: vec![UnitBuilder::new("F", 1, &["ALU"]).model()],
        out_ports: vec![
            UnitBuilder::new("W", 1, &["ALU"])
                .write_lock()
                .flows_from(&["F"]),
        ],
        in_out_ports: vec![],
        internal_units: vec![],
    }
}

/// The usual table for the five-stage machine: loads are `MEM`, ALU ops
/// are `ALU`.
pub fn classic_isa(processor: &Processor) -> Isa {
    Isa::load(
        &[
            IsaRow::new("LW", "MEM"),
            IsaRow::new("ADD", "ALU"),
            IsaRow::new("SUB", "ALU"),
        ],
        processor.supported_capabilities(),
    )
    .expect("classic ISA loads")
}

/// Builds the five-stage processor, its ISA, and an assembled program in
/// one call.
pub fn classic_setup(lines: &[&str]) -> (Processor, Program) {
    let processor = Processor::build(&classic_five_stage()).expect("classic pipeline builds");
    let isa = classic_isa(&processor);
    let program = Program::assemble(lines.iter().copied(), &isa).expect("program assembles");
    (processor, program)
}

/// One timeline row as comparable `(cycle, name)` pairs.
pub fn row(timeline: &Timeline, index: usize) -> Vec<(u32, String)> {
    timeline
        .row(index)
        .expect("row exists")
        .iter()
        .map(|(cycle, unit)| (*cycle, unit.to_string()))
        .collect()
}

/// Expected-row helper: unit names occupying consecutive cycles starting
/// at `first`, with repeats written out by the caller.
pub fn staircase(first: u32, units: &[&str]) -> Vec<(u32, String)> {
    units
        .iter()
        .enumerate()
        .map(|(i, unit)| (first + i as u32, (*unit).to_string()))
        .collect()
}
