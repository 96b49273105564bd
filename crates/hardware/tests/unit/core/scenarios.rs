//! End-to-end scheduling scenarios on small machines.

use pretty_assertions::assert_eq;

use pipesim_core::config::ProcessorDesc;
use pipesim_core::{Processor, Simulator};

use crate::common::{classic_setup, row, staircase, UnitBuilder};

#[test]
fn test_classic_five_stage_no_hazards() {
    let (processor, program) = classic_setup(&[
        "LW R1, (R2)",
        "ADD R3, R4, R5",
        "ADD R6, R7, R8",
        "ADD R9, R10, R11",
    ]);
    let result = Simulator::new(processor).run(&program).expect("runs");

    for i in 0..4 {
        assert_eq!(
            row(&result.timeline, i),
            staircase(i as u32 + 1, &["F", "D", "X", "M", "W"]),
        );
    }
    assert_eq!(result.timeline.total_cycles(), 8);
    assert_eq!(result.stats.cycles, 8);
    assert_eq!(result.stats.instructions, 4);
    assert_eq!(result.stats.total_stalls(), 0);
}

#[test]
fn test_raw_dependency_stalls_in_decode() {
    let (processor, program) = classic_setup(&["ADD R1, R2, R3", "ADD R4, R1, R5"]);
    let result = Simulator::new(processor).run(&program).expect("runs");

    assert_eq!(
        row(&result.timeline, 0),
        staircase(1, &["F", "D", "X", "M", "W"]),
    );
    // The dependent instruction waits in decode across cycles 3 and 4 and
    // leaves the moment the producer reaches writeback.
    assert_eq!(
        row(&result.timeline, 1),
        vec![
            (2, "F".to_string()),
            (3, "D".to_string()),
            (4, "D".to_string()),
            (5, "X".to_string()),
            (6, "M".to_string()),
            (7, "W".to_string()),
        ],
    );
    assert_eq!(result.timeline.total_cycles(), 7);
    assert_eq!(result.stats.stalls_data, 1);
}

/// Two parallel memory units sharing unified memory for `MEM`.
fn twin_memory_machine() -> ProcessorDesc {
    ProcessorDesc {
        in_ports: vec![UnitBuilder::new("F", 2, &["MEM"]).model()],
        out_ports: vec![
            UnitBuilder::new("W", 2, &["MEM"])
                .write_lock()
                .flows_from(&["M1", "M2"]),
        ],
        in_out_ports: vec![],
        internal_units: vec![
            UnitBuilder::new("M1", 1, &["MEM"])
                .mem_access(&["MEM"])
                .flows_from(&["F"]),
            UnitBuilder::new("M2", 1, &["MEM"])
                .mem_access(&["MEM"])
                .flows_from(&["F"]),
        ],
    }
}

#[test]
fn test_unified_memory_serializes_parallel_units() {
    let processor = Processor::build(&twin_memory_machine()).expect("builds");
    let isa = pipesim_core::Isa::load(
        &[pipesim_core::config::IsaRow::new("LW", "MEM")],
        processor.supported_capabilities(),
    )
    .expect("loads");
    let program =
        pipesim_core::Program::assemble(["LW R1, (R2)", "LW R3, (R4)"], &isa).expect("assembles");
    let result = Simulator::new(processor).run(&program).expect("runs");

    assert_eq!(
        row(&result.timeline, 0),
        vec![(1, "F".to_string()), (2, "M1".to_string()), (3, "W".to_string())],
    );
    // The second load is held back one cycle even though M2 is idle.
    assert_eq!(
        row(&result.timeline, 1),
        vec![
            (1, "F".to_string()),
            (2, "F".to_string()),
            (3, "M1".to_string()),
            (4, "W".to_string()),
        ],
    );

    // Never two instructions in memory units on the same cycle.
    for cycle in 1..=result.timeline.total_cycles() {
        let in_memory = (0..result.timeline.len())
            .filter(|&i| {
                row(&result.timeline, i)
                    .iter()
                    .any(|&(c, ref u)| c == cycle && (u == "M1" || u == "M2"))
            })
            .count();
        assert!(in_memory <= 1, "cycle {cycle} hosts {in_memory} loads");
    }
}

#[test]
fn test_width_limits_entry_occupancy() {
    let desc = ProcessorDesc {
        in_ports: vec![UnitBuilder::new("F", 2, &["ALU"]).model()],
        out_ports: vec![
            UnitBuilder::new("W", 1, &["ALU"])
                .write_lock()
                .flows_from(&["F"]),
        ],
        in_out_ports: vec![],
        internal_units: vec![],
    };
    let processor = Processor::build(&desc).expect("builds");
    let isa = pipesim_core::Isa::load(
        &[pipesim_core::config::IsaRow::new("ADD", "ALU")],
        processor.supported_capabilities(),
    )
    .expect("loads");
    let program = pipesim_core::Program::assemble(
        ["ADD R1, R2, R3", "ADD R4, R5, R6", "ADD R7, R8, R9"],
        &isa,
    )
    .expect("assembles");
    let result = Simulator::new(processor).run(&program).expect("runs");

    // F holds the first two from cycle 1; the third gets in at cycle 2,
    // as soon as instruction 0 has moved on.
    assert_eq!(
        row(&result.timeline, 0),
        vec![(1, "F".to_string()), (2, "W".to_string())],
    );
    assert_eq!(
        row(&result.timeline, 1),
        vec![(1, "F".to_string()), (2, "F".to_string()), (3, "W".to_string())],
    );
    assert_eq!(
        row(&result.timeline, 2),
        vec![(2, "F".to_string()), (3, "F".to_string()), (4, "W".to_string())],
    );
    assert_eq!(result.stats.stalls_width, 2);
}

#[test]
fn test_empty_program_finishes_immediately() {
    let (processor, program) = classic_setup(&[]);
    let result = Simulator::new(processor).run(&program).expect("runs");
    assert!(result.timeline.is_empty());
    assert_eq!(result.timeline.total_cycles(), 0);
    assert_eq!(result.stats.cycles, 0);
}

#[test]
fn test_single_stage_machine() {
    let desc = ProcessorDesc {
        in_out_ports: vec![UnitBuilder::new("P", 1, &["ALU"]).model()],
        ..ProcessorDesc::default()
    };
    let processor = Processor::build(&desc).expect("builds");
    let isa = pipesim_core::Isa::load(
        &[pipesim_core::config::IsaRow::new("ADD", "ALU")],
        processor.supported_capabilities(),
    )
    .expect("loads");
    let program = pipesim_core::Program::assemble(["ADD R1, R2, R3", "ADD R4, R5, R6"], &isa)
        .expect("assembles");
    let result = Simulator::new(processor).run(&program).expect("runs");
    assert_eq!(row(&result.timeline, 0), vec![(1, "P".to_string())]);
    assert_eq!(row(&result.timeline, 1), vec![(2, "P".to_string())]);
    assert_eq!(result.stats.cycles, 2);
}
