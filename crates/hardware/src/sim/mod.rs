//! Simulation facade.

/// The `Simulator` type and its result.
pub mod simulator;

pub use simulator::{Simulation, Simulator};
