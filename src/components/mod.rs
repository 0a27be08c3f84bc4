//! Component models for DC analysis.
//!
//! - Linear: Resistor
//! - Sources: Voltage Source, Current Source
//!
//! Stamping into the MNA matrix lives in [`crate::solver::mna`].

mod linear;
mod sources;

pub use linear::Resistor;
pub use sources::{CurrentSource, VoltageSource};

use crate::circuit::NodeId;

/// A circuit component.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Resistor(Resistor),
    VoltageSource(VoltageSource),
    CurrentSource(CurrentSource),
}

impl Component {
    /// Get the component name.
    pub fn name(&self) -> &str {
        match self {
            Component::Resistor(r) => &r.name,
            Component::VoltageSource(v) => &v.name,
            Component::CurrentSource(i) => &i.name,
        }
    }

    /// Get the two terminal nodes.
    pub fn nodes(&self) -> [NodeId; 2] {
        match self {
            Component::Resistor(r) => r.nodes,
            Component::VoltageSource(v) => v.nodes,
            Component::CurrentSource(i) => i.nodes,
        }
    }

    /// Get the magnitude: ohms, volts or amps depending on the kind.
    pub fn value(&self) -> f64 {
        match self {
            Component::Resistor(r) => r.resistance,
            Component::VoltageSource(v) => v.voltage,
            Component::CurrentSource(i) => i.current,
        }
    }
}
