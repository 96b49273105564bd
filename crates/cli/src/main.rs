//! Pipeline simulator CLI.
//!
//! Thin plumbing over `pipesim-core`: decode the processor description and
//! instruction-set table from JSON, assemble the program file, run the
//! simulation, and render the resulting schedule as a pipeline table (or
//! raw JSON with `--json`).

mod render;

use std::path::PathBuf;
use std::{fs, process};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pipesim_core::config::{IsaRow, ProcessorDesc};
use pipesim_core::{Isa, Processor, Program, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "pipesim",
    author,
    version,
    about = "Cycle-accurate pipeline simulator",
    long_about = "Simulate a straight-line program on a declaratively described processor \
                  pipeline and print, for every instruction, the unit it occupies in every \
                  cycle.\n\nExamples:\n  pipesim -p demos/classic5.json -i demos/isa.json demos/sample.s\n  pipesim -p demos/classic5.json -i demos/isa.json demos/sample.s --json"
)]
struct Cli {
    /// Processor description (JSON).
    #[arg(short, long)]
    processor: PathBuf,

    /// Instruction-set table (JSON).
    #[arg(short, long)]
    isa: PathBuf,

    /// Program source file.
    program: PathBuf,

    /// Emit the raw timeline as JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// Print run statistics after the table.
    #[arg(long)]
    stats: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let desc: ProcessorDesc = serde_json::from_str(&fs::read_to_string(&cli.processor)?)?;
    let rows: Vec<IsaRow> = serde_json::from_str(&fs::read_to_string(&cli.isa)?)?;

    let processor = Processor::build(&desc)?;
    let isa = Isa::load(&rows, processor.supported_capabilities())?;

    let source = fs::read_to_string(&cli.program)?;
    let program = Program::assemble(source.lines(), &isa)?;

    let result = Simulator::new(processor).run(&program)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result.timeline)?);
    } else {
        print!("{}", render::table(&program, &result.timeline));
    }
    if cli.stats {
        eprint!("{}", render::stats(&result.stats));
    }
    Ok(())
}
