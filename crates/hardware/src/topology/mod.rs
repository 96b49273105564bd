//! Processor topology: validation and the canonical unit graph.
//!
//! The declarative description names predecessors by string; this module
//! resolves it once into an arena of index-linked units in a stable
//! topological order and checks every structural invariant, so the engine
//! can assume a well-formed acyclic graph and never touch a name again.

/// Graph construction and validation.
pub mod builder;

/// The canonical processor graph.
pub mod graph;

pub use graph::{Processor, Unit, UnitIdx};
