//! Voltage and current sources.

use crate::circuit::{BranchId, NodeId};

/// An independent voltage source.
///
/// Voltage sources require an extra row/column in the MNA matrix for the
/// branch current. The source enforces: V+ - V- = V_source
#[derive(Debug, Clone, PartialEq)]
pub struct VoltageSource {
    pub name: String,
    pub nodes: [NodeId; 2], // [positive, negative]
    pub voltage: f64,
    pub branch: BranchId,
}

impl VoltageSource {
    /// Create a new voltage source.
    pub fn new(name: String, nodes: [NodeId; 2], voltage: f64, branch: BranchId) -> Self {
        Self {
            name,
            nodes,
            voltage,
            branch,
        }
    }
}

/// An independent current source.
///
/// Current sources add directly to the RHS vector of the MNA equations.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSource {
    pub name: String,
    pub nodes: [NodeId; 2], // [from, to] - current leaves `from` and enters `to`
    pub current: f64,
}

impl CurrentSource {
    /// Create a new current source.
    pub fn new(name: String, nodes: [NodeId; 2], current: f64) -> Self {
        Self {
            name,
            nodes,
            current,
        }
    }
}
