//! Timeline rendering.
//!
//! Lays the schedule out in the usual pipeline-diagram shape: one row per
//! instruction, one column per cycle, the unit name in every cell the
//! instruction occupied. Stalls read as the same unit repeated across
//! columns.

use std::fmt::Write;

use pipesim_core::{Program, SimStats, Timeline};

/// Renders the timeline as a plain-text table.
pub fn table(program: &Program, timeline: &Timeline) -> String {
    let total = timeline.total_cycles() as usize;
    let label_width = program
        .instructions()
        .iter()
        .map(|inst| inst.to_string().len())
        .max()
        .unwrap_or(0)
        .max(1);
    let cell_width = timeline
        .rows()
        .iter()
        .flatten()
        .map(|(_, unit)| unit.as_str().len())
        .max()
        .unwrap_or(1)
        .max(total.to_string().len());

    let mut out = String::new();
    let _ = write!(out, "{:label_width$}", "");
    for cycle in 1..=total {
        let _ = write!(out, " {cycle:>cell_width$}");
    }
    out.push('\n');

    for (inst, row) in program.instructions().iter().zip(timeline.rows()) {
        let _ = write!(out, "{:<label_width$}", inst.to_string());
        let mut next = 1;
        for &(cycle, ref unit) in row {
            for _ in next..cycle as usize {
                let _ = write!(out, " {:>cell_width$}", "");
            }
            let _ = write!(out, " {:>cell_width$}", unit.as_str());
            next = cycle as usize + 1;
        }
        out.push('\n');
    }
    out
}

/// Renders the run counters as a short summary block.
pub fn stats(stats: &SimStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "cycles:       {}", stats.cycles);
    let _ = writeln!(out, "instructions: {}", stats.instructions);
    let _ = writeln!(out, "moves:        {}", stats.moves);
    let _ = writeln!(out, "stalls:       {}", stats.total_stalls());
    let _ = writeln!(out, "  width:      {}", stats.stalls_width);
    let _ = writeln!(out, "  data:       {}", stats.stalls_data);
    let _ = writeln!(out, "  ordering:   {}", stats.stalls_write_order);
    let _ = writeln!(out, "  memory:     {}", stats.stalls_memory);
    let _ = writeln!(out, "  commit:     {}", stats.stalls_commit);
    let _ = writeln!(out, "cpi:          {:.2}", stats.cpi());
    out
}
