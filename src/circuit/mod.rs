//! Typed circuit representation and validation.
//!
//! This module turns a parsed [`Netlist`](crate::netlist::Netlist) into a
//! [`Circuit`]: components bound to numeric node and branch ids, laid out
//! the way the MNA system indexes its unknowns.

mod graph;
mod types;
mod validate;

pub use graph::Circuit;
pub use types::*;
pub use validate::validate_circuit;
