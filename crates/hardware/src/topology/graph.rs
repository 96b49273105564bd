//! The canonical processor graph.
//!
//! [`Processor::build`](super::builder) resolves the name-referenced input
//! lists into this index-based form once; nothing downstream ever looks a
//! unit up by name again. Units live in an arena ordered by a stable
//! topological sort (ties broken by folded name), so a unit's predecessors
//! always carry smaller indices and its successors larger ones.

use std::collections::{BTreeMap, BTreeSet};

use crate::common::ident::UnitName;
use crate::config::UnitModel;
use crate::isa::capability::Capability;

/// Index of a unit in the canonical arena.
pub type UnitIdx = usize;

/// One vertex of the canonical graph: the unit model plus resolved edges
/// and derived capability information.
#[derive(Debug, Clone)]
pub struct Unit {
    pub(crate) model: UnitModel,
    pub(crate) preds: Vec<UnitIdx>,
    pub(crate) succs: Vec<UnitIdx>,
    /// Capabilities that can actually continue from here to an exit.
    pub(crate) viable: BTreeSet<Capability>,
    /// Declared injection point (`in_ports` or `in_out_ports`).
    pub(crate) entry: bool,
    /// Declared retirement point (`out_ports` or `in_out_ports`).
    pub(crate) exit: bool,
}

impl Unit {
    /// The unit's static descriptor.
    pub fn model(&self) -> &UnitModel {
        &self.model
    }

    /// The unit's name.
    pub fn name(&self) -> &UnitName {
        &self.model.name
    }

    /// Maximum instructions held in one cycle.
    pub fn width(&self) -> usize {
        self.model.width.get()
    }

    /// Indices of direct predecessors, ascending.
    pub fn preds(&self) -> &[UnitIdx] {
        &self.preds
    }

    /// Indices of direct successors, ascending.
    pub fn succs(&self) -> &[UnitIdx] {
        &self.succs
    }

    /// Whether instructions are injected here.
    pub fn is_entry(&self) -> bool {
        self.entry
    }

    /// Whether instructions retire from here.
    pub fn is_exit(&self) -> bool {
        self.exit
    }

    /// Whether an instruction of this capability can be routed through
    /// this unit and still reach an exit supporting it at every hop.
    pub fn viable_for(&self, cap: &Capability) -> bool {
        self.viable.contains(cap)
    }
}

/// A validated, canonicalized processor: the immutable input to every
/// simulation run on it.
#[derive(Debug, Clone)]
pub struct Processor {
    pub(crate) units: Vec<Unit>,
    pub(crate) entries: Vec<UnitIdx>,
    pub(crate) exits: Vec<UnitIdx>,
    pub(crate) supported: BTreeSet<Capability>,
    /// For each capability, the units that access unified memory for it.
    pub(crate) mem_units: BTreeMap<Capability, Vec<UnitIdx>>,
    /// Length in units of the longest entry-to-exit path.
    pub(crate) depth: usize,
    pub(crate) max_width: usize,
}

impl Processor {
    /// The unit at a canonical index.
    pub fn unit(&self, idx: UnitIdx) -> &Unit {
        &self.units[idx]
    }

    /// All units in canonical topological order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Entry-unit indices, ascending.
    pub fn entries(&self) -> &[UnitIdx] {
        &self.entries
    }

    /// Exit-unit indices, ascending.
    pub fn exits(&self) -> &[UnitIdx] {
        &self.exits
    }

    /// The capabilities this processor can carry from an entry to an exit.
    ///
    /// An instruction-set table is loaded against exactly this set.
    pub fn supported_capabilities(&self) -> &BTreeSet<Capability> {
        &self.supported
    }

    /// Units accessing unified memory for the given capability.
    pub fn memory_units(&self, cap: &Capability) -> &[UnitIdx] {
        self.mem_units.get(cap).map_or(&[], Vec::as_slice)
    }

    /// Length in units of the longest entry-to-exit path.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The widest unit's width.
    pub fn max_width(&self) -> usize {
        self.max_width
    }

    /// Looks a unit up by (case-insensitive) name. Intended for callers
    /// rendering output; simulation code works with indices.
    pub fn unit_by_name(&self, name: &UnitName) -> Option<UnitIdx> {
        self.units.iter().position(|u| u.name() == name)
    }
}
