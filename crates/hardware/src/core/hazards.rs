//! Data-hazard predicates.
//!
//! Free functions over the scoreboard, answering the two questions the
//! planner asks before letting an instruction move:
//! 1. **RAW:** may this instruction leave its read-locking unit, or is a
//!    source register still owed a write by an earlier instruction?
//! 2. **Write ordering:** may this instruction enter a write-locking unit,
//!    or must an earlier write to the same register commit first?

use super::scoreboard::Scoreboard;
use crate::common::reg::Reg;

/// The first source register of instruction `idx` still awaiting a write
/// from an earlier instruction, if any.
///
/// Checked when an instruction tries to advance out of a read-locking
/// unit: the register read happens on the way out, so the instruction is
/// held inside until every earlier producer has committed.
pub(crate) fn read_hazard(sb: &Scoreboard, idx: usize, srcs: &[Reg]) -> Option<Reg> {
    srcs.iter()
        .find(|src| sb.pending_writer_before(src, idx).is_some())
        .cloned()
}

/// The destination register of instruction `idx`, if an earlier write to
/// it has not yet committed.
///
/// Checked when an instruction tries to enter a write-locking unit: writes
/// to one register commit in program order.
pub(crate) fn write_order_hazard(sb: &Scoreboard, idx: usize, dst: &Reg) -> Option<Reg> {
    sb.pending_writer_before(dst, idx).map(|_| dst.clone())
}
