//! MNA (Modified Nodal Analysis) solver.
//!
//! This module provides the numerical engine for DC analysis.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations Ax = z where:
//! - x contains node voltages and branch currents
//! - A is the conductance/coefficient matrix
//! - z is the source vector
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ i ]
//! [ C   0 ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - G is the conductance matrix (node equations)
//! - B, C connect voltage sources to nodes
//! - v is the vector of node voltages (ground excluded)
//! - j is the vector of voltage source currents
//! - i is the sum of current sources into each node
//! - e is the vector of voltage source values
//!
//! A system whose determinant is zero is rejected before solving.

mod dc;
mod mna;

pub use dc::{DcSolution, DcSolver, SolverConfig};
pub use mna::{stamp_components, MnaMatrix};

/// Default singularity tolerance: only an exactly zero determinant fails.
pub const DEFAULT_SINGULAR_TOLERANCE: f64 = 0.0;
