//! dcspice - DC circuit solver
//!
//! Reads a `.circuit` netlist and prints every node voltage and every
//! voltage source current.
//!
//! # Usage
//!
//! ```bash
//! dcspice divider.ckt
//! RUST_LOG=debug dcspice --strict divider.ckt
//! ```
//!
//! Exits with status 2 when the netlist cannot be read or parsed and 1 when
//! the circuit has no solution.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dcspice::{
    error::{Result, SpiceError},
    eval_netlist_with, netlist, DcSolution, ParseOptions, SolverConfig, GROUND_NODE,
};

/// DC operating point solver for resistor/source netlists
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// Name of the ground node
    #[arg(short, long, default_value = GROUND_NODE)]
    ground: String,

    /// Treat |det(A)| <= TOL as singular (0 = exact zero test)
    #[arg(short = 't', long, value_name = "TOL", default_value_t = 0.0)]
    singular_tolerance: f64,

    /// Reject duplicate component names instead of keeping the last one
    #[arg(long)]
    strict: bool,
}

fn run(args: &Args) -> Result<DcSolution> {
    let options = ParseOptions::new()
        .with_ground(args.ground.clone())
        .with_reject_duplicates(args.strict);
    let config = SolverConfig::new().with_singular_tolerance(args.singular_tolerance);

    let content = netlist::read_file(&args.circuit_file)?;
    eval_netlist_with(&content, &options, &config)
}

/// Exit status for a failed run: 2 when the netlist could not be read or
/// parsed, 1 when it parsed but has no solution.
fn exit_code(error: &SpiceError) -> ExitCode {
    if error.is_input_error() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(solution) => {
            println!("Node voltages:");
            for (node, v) in &solution.node_voltages {
                println!("  {node} {v}");
            }
            println!("Voltage source currents:");
            for (source, i) in &solution.source_currents {
                println!("  {source} {i}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code(&e)
        }
    }
}
