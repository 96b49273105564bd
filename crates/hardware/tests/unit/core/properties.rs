//! Engine invariants over randomized programs on the classic five-stage
//! machine.

use proptest::prelude::*;

use pipesim_core::{Simulation, Simulator};

use crate::common::{classic_setup, row};

const STAGES: [&str; 5] = ["F", "D", "X", "M", "W"];
const MEMORY_STAGES: [&str; 2] = ["F", "M"];

fn arb_program() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        (any::<bool>(), 0..6u8, 0..6u8, 0..6u8).prop_map(|(load, d, s1, s2)| {
            if load {
                format!("LW R{d}, (R{s1})")
            } else {
                format!("ADD R{d}, R{s1}, R{s2}")
            }
        }),
        1..=6,
    )
}

fn simulate(lines: &[String]) -> Simulation {
    let strs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let (processor, program) = classic_setup(&strs);
    Simulator::new(processor).run(&program).expect("classic machine never deadlocks")
}

/// The cycle the instruction first occupies `unit`, if it ever does.
fn entry_cycle(result: &Simulation, i: usize, unit: &str) -> Option<u32> {
    row(&result.timeline, i)
        .iter()
        .find(|(_, u)| u == unit)
        .map(|&(c, _)| c)
}

proptest! {
    #[test]
    fn prop_runs_are_deterministic(lines in arb_program()) {
        let first = simulate(&lines);
        let second = simulate(&lines);
        prop_assert_eq!(&first.timeline, &second.timeline);
        prop_assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn prop_histories_are_gapless(lines in arb_program()) {
        let result = simulate(&lines);
        prop_assert_eq!(result.timeline.len(), lines.len());
        for i in 0..result.timeline.len() {
            let slots = row(&result.timeline, i);
            prop_assert!(!slots.is_empty());
            for pair in slots.windows(2) {
                prop_assert_eq!(pair[1].0, pair[0].0 + 1);
            }
        }
    }

    #[test]
    fn prop_each_row_walks_the_pipeline_in_order(lines in arb_program()) {
        let result = simulate(&lines);
        for i in 0..result.timeline.len() {
            let slots = row(&result.timeline, i);
            let mut distinct: Vec<String> = Vec::new();
            for (_, unit) in &slots {
                if distinct.last() != Some(unit) {
                    distinct.push(unit.clone());
                }
            }
            prop_assert_eq!(distinct, STAGES.map(String::from).to_vec());
        }
    }

    #[test]
    fn prop_unit_occupancy_respects_width(lines in arb_program()) {
        let result = simulate(&lines);
        for cycle in 1..=result.timeline.total_cycles() {
            for stage in STAGES {
                let occupants = (0..result.timeline.len())
                    .filter(|&i| {
                        row(&result.timeline, i)
                            .iter()
                            .any(|&(c, ref u)| c == cycle && u == stage)
                    })
                    .count();
                prop_assert!(occupants <= 1, "unit {} over-occupied at cycle {}", stage, cycle);
            }
        }
    }

    #[test]
    fn prop_reads_wait_for_earlier_writes(lines in arb_program()) {
        let result = simulate(&lines);
        let strs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let (_, program) = classic_setup(&strs);
        let insts = program.instructions();
        for j in 0..insts.len() {
            for i in 0..j {
                if !insts[j].srcs.contains(&insts[i].dst) {
                    continue;
                }
                let write = entry_cycle(&result, i, "W").expect("writer reaches W");
                let read = entry_cycle(&result, j, "X").expect("reader reaches X");
                prop_assert!(
                    read >= write,
                    "instruction {} read at {} before {} wrote at {}",
                    j, read, i, write
                );
            }
        }
    }

    #[test]
    fn prop_writes_commit_in_program_order(lines in arb_program()) {
        let result = simulate(&lines);
        let strs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let (_, program) = classic_setup(&strs);
        let insts = program.instructions();
        for j in 0..insts.len() {
            for i in 0..j {
                if insts[i].dst != insts[j].dst {
                    continue;
                }
                let older = entry_cycle(&result, i, "W").expect("older write reaches W");
                let younger = entry_cycle(&result, j, "W").expect("younger write reaches W");
                prop_assert!(older <= younger);
            }
        }
    }

    #[test]
    fn prop_one_memory_access_per_capability_per_cycle(lines in arb_program()) {
        let result = simulate(&lines);
        let strs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let (_, program) = classic_setup(&strs);
        let insts = program.instructions();
        for cycle in 1..=result.timeline.total_cycles() {
            for cap in ["ALU", "MEM"] {
                let entering = (0..insts.len())
                    .filter(|&i| insts[i].capability.as_str() == cap)
                    .filter(|&i| {
                        MEMORY_STAGES
                            .iter()
                            .any(|stage| entry_cycle(&result, i, stage) == Some(cycle))
                    })
                    .count();
                prop_assert!(
                    entering <= 1,
                    "{} memory entries for {} at cycle {}",
                    entering, cap, cycle
                );
            }
        }
    }

    #[test]
    fn prop_total_cycles_within_safety_cap(lines in arb_program()) {
        let result = simulate(&lines);
        let cap = lines.len() as u64 * 6;
        prop_assert!(result.stats.cycles <= cap);
    }
}
