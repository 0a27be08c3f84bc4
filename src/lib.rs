//! # dcspice
//!
//! A DC operating point solver for linear resistive circuits.
//!
//! This library provides:
//! - A parser for `.circuit` / `.end` netlists of resistors and independent
//!   voltage and current sources
//! - Modified Nodal Analysis (MNA) matrix assembly
//! - A dense LU solve with an explicit singularity check
//!
//! ## Architecture
//!
//! - [`netlist`] - Circuit block extraction and component line parsing
//! - [`circuit`] - Typed circuit graph and validation
//! - [`components`] - Resistor and source models
//! - [`solver`] - MNA matrix assembly and numerical solving
//!
//! ## Usage
//!
//! ```
//! let netlist = "\
//! .circuit
//! V1 in  GND dc 10
//! R1 in  out 1k
//! R2 out GND 1k
//! .end
//! ";
//! let solution = dcspice::eval_netlist(netlist)?;
//! assert!((solution.voltage("out").unwrap() - 5.0).abs() < 1e-9);
//! assert_eq!(solution.voltage("GND"), Some(0.0));
//! # Ok::<(), dcspice::SpiceError>(())
//! ```
//!
//! Every entry point is a pure function of its input: no state survives
//! between calls, so concurrent use from several threads needs no locking.

pub mod circuit;
pub mod components;
pub mod error;
pub mod netlist;
pub mod solver;

use std::path::Path;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use error::{Result, SpiceError};
pub use netlist::ParseOptions;
pub use solver::{DcSolution, DcSolver, SolverConfig};

/// Name of the reference node.
pub const GROUND_NODE: &str = "GND";

/// Solve the netlist stored in a file.
pub fn eval_spice(path: impl AsRef<Path>) -> Result<DcSolution> {
    let content = netlist::read_file(path.as_ref())?;
    eval_netlist(&content)
}

/// Solve netlist text with default options.
pub fn eval_netlist(input: &str) -> Result<DcSolution> {
    eval_netlist_with(input, &ParseOptions::default(), &SolverConfig::default())
}

/// Solve netlist text with custom parse options and solver configuration.
pub fn eval_netlist_with(
    input: &str,
    options: &ParseOptions,
    config: &SolverConfig,
) -> Result<DcSolution> {
    let netlist = netlist::parse_with(input, options)?;
    let circuit = Circuit::from_netlist(&netlist);
    circuit::validate_circuit(&circuit)?;
    DcSolver::with_config(config.clone()).solve(&circuit)
}
