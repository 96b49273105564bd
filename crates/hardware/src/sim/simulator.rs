//! Simulator: the top-level facade over the canonical processor and the
//! tick engine.

use crate::asm::Program;
use crate::common::error::Result;
use crate::core::Engine;
use crate::stats::SimStats;
use crate::timeline::Timeline;
use crate::topology::Processor;

/// The result of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    /// Per-instruction stage schedule.
    pub timeline: Timeline,
    /// Run counters (cycles, moves, stalls by cause).
    pub stats: SimStats,
}

/// Owns a validated processor and runs programs on it.
///
/// The processor is immutable for the simulator's lifetime; each call to
/// [`Simulator::run`] spins up a fresh engine, so one simulator can run
/// any number of programs, and independent simulators are independent.
#[derive(Debug, Clone)]
pub struct Simulator {
    processor: Processor,
}

impl Simulator {
    /// Wraps a built processor.
    pub fn new(processor: Processor) -> Self {
        Self { processor }
    }

    /// The processor this simulator runs on.
    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    /// Runs a program to completion and returns its schedule.
    pub fn run(&self, program: &Program) -> Result<Simulation> {
        let (timeline, stats) = Engine::new(&self.processor, program).run()?;
        Ok(Simulation { timeline, stats })
    }
}
