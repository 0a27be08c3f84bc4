//! Circuit validation.

use crate::components::Component;
use crate::error::{Result, SpiceError};

use super::Circuit;

/// Validate a circuit before stamping.
///
/// Checks:
/// - Every component value is finite
/// - No resistor has zero resistance (its conductance would be infinite)
///
/// Topological problems (floating nodes, voltage source loops) are left to
/// the singularity test in the solver.
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    for component in &circuit.components {
        let value = component.value();
        if !value.is_finite() {
            return Err(SpiceError::invalid_value(
                component.name(),
                format!("value must be finite, got {}", value),
            ));
        }

        if let Component::Resistor(r) = component {
            if r.resistance == 0.0 {
                return Err(SpiceError::invalid_value(
                    &r.name,
                    "resistance must be non-zero",
                ));
            }
        }
    }

    Ok(())
}
