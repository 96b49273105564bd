//! Decoded input surface of the simulator.
//!
//! These are the shapes a caller hands to the core after decoding whatever
//! file format it reads — the core never touches files itself. It provides:
//! 1. **`UnitModel`:** The static descriptor of one pipeline stage.
//! 2. **`FuncUnit`:** A unit together with its named predecessors.
//! 3. **`ProcessorDesc`:** The four port lists that define the unit graph.
//! 4. **`IsaRow`:** One mnemonic-to-capability mapping.
//!
//! All of them derive `Deserialize`, so a front end decodes straight into
//! them (the CLI uses JSON) and then calls [`Processor::build`] and
//! [`Isa::load`].
//!
//! [`Processor::build`]: crate::topology::Processor::build
//! [`Isa::load`]: crate::isa::Isa::load

use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::common::ident::{Mnemonic, UnitName};
use crate::isa::capability::Capability;

/// Static descriptor of one functional unit (pipeline stage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitModel {
    /// Case-insensitive unit name, unique within the processor.
    pub name: UnitName,

    /// Maximum instructions the unit holds in a single cycle.
    pub width: NonZeroUsize,

    /// The kinds of work this unit can perform.
    pub capabilities: BTreeSet<Capability>,

    /// The unit performs register reads: an instruction is held here until
    /// every earlier write to its source registers has committed.
    #[serde(default)]
    pub read_lock: bool,

    /// The unit commits register writes: entry is gated on program-order
    /// write commitment per register.
    #[serde(default)]
    pub write_lock: bool,

    /// Capabilities for which this unit accesses unified memory. At most
    /// one instruction per such capability enters a memory-accessing unit
    /// per cycle, across the whole graph.
    #[serde(default)]
    pub mem_access: BTreeSet<Capability>,
}

impl UnitModel {
    /// Whether this unit can host instructions of the given capability.
    pub fn supports(&self, cap: &Capability) -> bool {
        self.capabilities.contains(cap)
    }

    /// Whether hosting the given capability here touches unified memory.
    pub fn accesses_memory_for(&self, cap: &Capability) -> bool {
        self.mem_access.contains(cap)
    }
}

/// A unit plus the names of its direct predecessors.
///
/// An instruction may advance into `unit` in cycle *c+1* only if it
/// occupied one of `preds` during cycle *c*.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncUnit {
    /// The unit itself.
    pub unit: UnitModel,

    /// Names of the units instructions arrive from.
    #[serde(default)]
    pub preds: Vec<UnitName>,
}

/// The four disjoint port lists that define a processor's unit graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorDesc {
    /// Entry units: no predecessors, instructions are injected here in
    /// program order.
    #[serde(default)]
    pub in_ports: Vec<UnitModel>,

    /// Sink units, each with its predecessors.
    #[serde(default)]
    pub out_ports: Vec<FuncUnit>,

    /// Units that are both sources and sinks (single-stage pipelines).
    #[serde(default)]
    pub in_out_ports: Vec<UnitModel>,

    /// Every other unit, each with its predecessors.
    #[serde(default)]
    pub internal_units: Vec<FuncUnit>,
}

/// One row of an instruction-set table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsaRow {
    /// Case-insensitive instruction mnemonic.
    pub mnemonic: Mnemonic,

    /// The capability an instruction with this mnemonic requires.
    pub capability: Capability,
}

impl IsaRow {
    /// Builds a row from plain strings.
    pub fn new(mnemonic: &str, capability: &str) -> Self {
        Self {
            mnemonic: Mnemonic::new(mnemonic),
            capability: Capability::new(capability),
        }
    }
}
