//! The dispatch engine: per-cycle advancement of instructions across the
//! unit graph.
//!
//! Each tick runs in three observable phases:
//! 1. **Harvest:** instructions sitting in an exit whose write commitments
//!    are satisfied retire and record no further history.
//! 2. **Plan and commit:** in strict program order, every live instruction
//!    either takes its best acceptable move (injection into an entry, or a
//!    step to a successor) or stalls in place, re-recording its current
//!    unit. Acceptance is gated by unit capacity, program-order write
//!    commitment, RAW dependencies, and the per-cycle unified-memory
//!    token. Earlier instructions plan first, so a slot or token freed by
//!    an older move is visible to younger ones in the same tick.
//! 3. **Advance:** the cycle counter increments.
//!
//! A tick with no move and no retirement while instructions remain is a
//! structural deadlock: the processor cannot execute this program. Among
//! several acceptable targets, an instruction always takes the one with
//! the smallest canonical topological index, so the whole simulation is a
//! pure function of (processor, program).

use std::collections::BTreeSet;

use tracing::{debug, trace};

use super::hazards;
use super::scoreboard::Scoreboard;
use crate::asm::Program;
use crate::common::error::{Result, SimError, StallReason};
use crate::common::reg::Reg;
use crate::isa::capability::Capability;
use crate::stats::SimStats;
use crate::timeline::{Cycle, Timeline};
use crate::topology::{Processor, UnitIdx};

/// Runtime state of one instruction: where it is and everywhere it has
/// been.
#[derive(Debug)]
struct InFlight {
    capability: Capability,
    dst: Reg,
    srcs: Vec<Reg>,
    /// Current unit, or `None` until injection.
    unit: Option<UnitIdx>,
    retired: bool,
    /// Every `(cycle, unit)` occupied, gapless from entry to retirement.
    history: Vec<(Cycle, UnitIdx)>,
}

/// The first instruction a tick could not move, and why.
struct Blocked {
    instruction: usize,
    unit: Option<UnitIdx>,
    reason: StallReason,
}

/// One simulation in progress. Create with [`Engine::new`], consume with
/// [`Engine::run`]. Engines share nothing; independent instances may run
/// on independent threads.
#[derive(Debug)]
pub struct Engine<'a> {
    proc: &'a Processor,
    insts: Vec<InFlight>,
    scoreboard: Scoreboard,
    /// Live instructions per unit, kept in step with every move.
    occupancy: Vec<usize>,
    cycle: Cycle,
    stats: SimStats,
}

impl<'a> Engine<'a> {
    /// Prepares a run of `program` on `proc`. The program must have been
    /// assembled against an ISA loaded for this processor, so every
    /// instruction's capability is routable.
    pub fn new(proc: &'a Processor, program: &Program) -> Self {
        let insts = program
            .instructions()
            .iter()
            .map(|inst| InFlight {
                capability: inst.capability.clone(),
                dst: inst.dst.clone(),
                srcs: inst.srcs.clone(),
                unit: None,
                retired: false,
                history: Vec::new(),
            })
            .collect();
        Self {
            proc,
            insts,
            scoreboard: Scoreboard::new(program),
            occupancy: vec![0; proc.units().len()],
            cycle: 1,
            stats: SimStats::default(),
        }
    }

    /// Runs ticks until every instruction has retired, producing the
    /// per-instruction timeline and the run's statistics.
    pub fn run(mut self) -> Result<(Timeline, SimStats)> {
        let cap = self.cycle_cap();
        loop {
            let retired_now = self.harvest();
            if self.insts.iter().all(|inst| inst.retired) {
                break;
            }
            if u64::from(self.cycle) > cap {
                return Err(self.deadlock(None));
            }
            let (moves, first_block) = self.plan_and_commit();
            if moves == 0 && retired_now == 0 {
                return Err(self.deadlock(first_block));
            }
            self.cycle += 1;
        }

        self.stats.cycles = u64::from(self.cycle - 1);
        self.stats.instructions = self.insts.len() as u64;
        debug!(
            cycles = self.stats.cycles,
            instructions = self.stats.instructions,
            stalls = self.stats.total_stalls(),
            "simulation complete"
        );

        let rows = self
            .insts
            .iter()
            .map(|inst| {
                inst.history
                    .iter()
                    .map(|&(cycle, u)| (cycle, self.proc.unit(u).name().clone()))
                    .collect()
            })
            .collect();
        Ok((Timeline::from_rows(rows), self.stats))
    }

    /// Upper bound on cycles for any program this processor can execute.
    /// The progress rule fires first on a real deadlock; running past this
    /// bound means the engine itself is broken.
    fn cycle_cap(&self) -> u64 {
        (self.insts.len() as u64)
            .saturating_mul(self.proc.depth() as u64 + 1)
            .saturating_mul(self.proc.max_width() as u64)
            .max(1)
    }

    /// Phase 1: retire instructions whose exit stay is over. Scans in
    /// program order, so an older retirement unblocks a younger one in the
    /// same harvest.
    fn harvest(&mut self) -> u64 {
        let mut retired = 0;
        for i in 0..self.insts.len() {
            if self.insts[i].retired {
                continue;
            }
            let Some(u) = self.insts[i].unit else {
                continue;
            };
            if !self.proc.unit(u).is_exit() || self.commit_blocked(i).is_some() {
                continue;
            }
            self.insts[i].retired = true;
            self.scoreboard.mark_committed(i);
            self.occupancy[u] -= 1;
            retired += 1;
            debug!(
                cycle = self.cycle,
                inst = i,
                unit = %self.proc.unit(u).name(),
                "retire"
            );
        }
        retired
    }

    /// An earlier live write to the same register, blocking retirement.
    fn commit_blocked(&self, i: usize) -> Option<Reg> {
        let dst = &self.insts[i].dst;
        self.insts[..i]
            .iter()
            .find(|earlier| !earlier.retired && &earlier.dst == dst)
            .map(|earlier| earlier.dst.clone())
    }

    /// Phase 2: one pass over live instructions in program order. Returns
    /// the number of committed moves and the first blocked instruction.
    fn plan_and_commit(&mut self) -> (u64, Option<Blocked>) {
        let mut moves = 0;
        let mut first_block: Option<Blocked> = None;
        // Unified-memory tokens taken this tick, one per capability.
        let mut mem_taken: BTreeSet<Capability> = BTreeSet::new();
        // Entries accept strictly in program order: once the oldest
        // waiting instruction fails to inject, younger ones wait too.
        let mut injection_open = true;

        for i in 0..self.insts.len() {
            if self.insts[i].retired {
                continue;
            }
            match self.insts[i].unit {
                None => {
                    if !injection_open {
                        continue;
                    }
                    match self.try_inject(i, &mut mem_taken) {
                        Ok(()) => moves += 1,
                        Err(reason) => {
                            // Not yet issued: waits outside the graph, so
                            // nothing is recorded in history or the stall
                            // counters.
                            injection_open = false;
                            if first_block.is_none() {
                                first_block = Some(Blocked {
                                    instruction: i,
                                    unit: None,
                                    reason,
                                });
                            }
                        }
                    }
                }
                Some(u) => match self.try_step(i, u, &mut mem_taken) {
                    Ok(()) => moves += 1,
                    Err(reason) => {
                        self.insts[i].history.push((self.cycle, u));
                        self.stats.record_stall(&reason);
                        trace!(
                            cycle = self.cycle,
                            inst = i,
                            unit = %self.proc.unit(u).name(),
                            %reason,
                            "stall"
                        );
                        if first_block.is_none() {
                            first_block = Some(Blocked {
                                instruction: i,
                                unit: Some(u),
                                reason,
                            });
                        }
                    }
                },
            }
        }
        (moves, first_block)
    }

    /// Injects a not-yet-entered instruction into the best acceptable
    /// entry unit.
    fn try_inject(
        &mut self,
        i: usize,
        mem_taken: &mut BTreeSet<Capability>,
    ) -> Result<(), StallReason> {
        let proc = self.proc;
        let cap = self.insts[i].capability.clone();
        let mut rejection = None;
        for &e in proc.entries() {
            if !proc.unit(e).viable_for(&cap) {
                continue;
            }
            match self.admission(i, e, &cap, mem_taken) {
                Ok(()) => {
                    self.enter(i, e, &cap, mem_taken);
                    return Ok(());
                }
                Err(reason) => {
                    if rejection.is_none() {
                        rejection = Some(reason);
                    }
                }
            }
        }
        Err(rejection.unwrap_or(StallReason::NoViableTarget))
    }

    /// Advances an in-flight instruction to the best acceptable successor
    /// of its current unit.
    fn try_step(
        &mut self,
        i: usize,
        from: UnitIdx,
        mem_taken: &mut BTreeSet<Capability>,
    ) -> Result<(), StallReason> {
        let proc = self.proc;
        let from_unit = proc.unit(from);

        if from_unit.is_exit() {
            // Finished but waiting for an older write to the same register
            // to retire first.
            let register = self
                .commit_blocked(i)
                .unwrap_or_else(|| self.insts[i].dst.clone());
            return Err(StallReason::CommitOrder { register });
        }

        // The register read happens on the way out of a read-locking unit:
        // the instruction is held here until every earlier producer of its
        // sources has committed.
        if from_unit.model().read_lock {
            if let Some(register) = hazards::read_hazard(&self.scoreboard, i, &self.insts[i].srcs)
            {
                return Err(StallReason::ReadHazard { register });
            }
        }

        let cap = self.insts[i].capability.clone();
        let mut rejection = None;
        for &s in from_unit.succs() {
            if !proc.unit(s).viable_for(&cap) {
                continue;
            }
            match self.admission(i, s, &cap, mem_taken) {
                Ok(()) => {
                    self.occupancy[from] -= 1;
                    self.enter(i, s, &cap, mem_taken);
                    return Ok(());
                }
                Err(reason) => {
                    if rejection.is_none() {
                        rejection = Some(reason);
                    }
                }
            }
        }
        Err(rejection.unwrap_or(StallReason::NoViableTarget))
    }

    /// Whether `target` can accept instruction `i` this tick. Checks run
    /// in a fixed order so the reported rejection is deterministic:
    /// capacity, then write ordering, then the unified-memory token.
    fn admission(
        &self,
        i: usize,
        target: UnitIdx,
        cap: &Capability,
        mem_taken: &BTreeSet<Capability>,
    ) -> Result<(), StallReason> {
        let unit = self.proc.unit(target);
        if self.occupancy[target] >= unit.width() {
            return Err(StallReason::Width {
                unit: unit.name().clone(),
            });
        }
        if unit.model().write_lock {
            if let Some(register) =
                hazards::write_order_hazard(&self.scoreboard, i, &self.insts[i].dst)
            {
                return Err(StallReason::WriteOrdering { register });
            }
        }
        if unit.model().accesses_memory_for(cap) && mem_taken.contains(cap) {
            return Err(StallReason::MemoryContention {
                capability: cap.clone(),
            });
        }
        Ok(())
    }

    /// Commits an accepted move into `target`.
    fn enter(&mut self, i: usize, target: UnitIdx, cap: &Capability, mem_taken: &mut BTreeSet<Capability>) {
        let unit = self.proc.unit(target);
        self.occupancy[target] += 1;
        if unit.model().accesses_memory_for(cap) {
            let _ = mem_taken.insert(cap.clone());
        }
        if unit.model().write_lock {
            // The write commits here; later reads and writes of this
            // register may proceed from this tick on.
            self.scoreboard.mark_committed(i);
        }
        self.insts[i].unit = Some(target);
        self.insts[i].history.push((self.cycle, target));
        self.stats.moves += 1;
        trace!(
            cycle = self.cycle,
            inst = i,
            unit = %unit.name(),
            "advance"
        );
    }

    fn deadlock(&self, blocked: Option<Blocked>) -> SimError {
        let fallback = || {
            let i = self
                .insts
                .iter()
                .position(|inst| !inst.retired)
                .unwrap_or(0);
            Blocked {
                instruction: i,
                unit: self.insts[i].unit,
                reason: StallReason::CycleCapExhausted,
            }
        };
        let blocked = blocked.unwrap_or_else(fallback);
        SimError::StructuralDeadlock {
            cycle: self.cycle,
            instruction: blocked.instruction,
            unit: blocked.unit.map(|u| self.proc.unit(u).name().clone()),
            reason: blocked.reason,
        }
    }
}
