//! Linear passive components.

use crate::circuit::NodeId;

/// A resistor component.
#[derive(Debug, Clone, PartialEq)]
pub struct Resistor {
    pub name: String,
    pub nodes: [NodeId; 2],
    /// Resistance in ohms
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(name: String, nodes: [NodeId; 2], resistance: f64) -> Self {
        Self {
            name,
            nodes,
            resistance,
        }
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }
}
