//! DC operating point analysis.

use std::collections::BTreeMap;

use tracing::debug;

use crate::circuit::Circuit;
use crate::error::{Result, SpiceError};

use super::mna::{stamp_components, MnaMatrix};
use super::DEFAULT_SINGULAR_TOLERANCE;

/// Configuration for the DC solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// A system with `|det(A)| <= singular_tolerance` has no solution.
    /// Zero means the determinant must be exactly zero.
    pub singular_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            singular_tolerance: DEFAULT_SINGULAR_TOLERANCE,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the singularity tolerance on the determinant.
    ///
    /// - 0.0 (default): only an exactly singular matrix is rejected
    /// - > 0.0: nearly singular systems are rejected too, instead of
    ///   producing numerically unstable results
    pub fn with_singular_tolerance(mut self, tolerance: f64) -> Self {
        self.singular_tolerance = tolerance.max(0.0);
        self
    }
}

/// Result of a DC analysis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DcSolution {
    /// Voltage of every node, ground included (always exactly 0.0)
    pub node_voltages: BTreeMap<String, f64>,
    /// Current of every voltage source
    pub source_currents: BTreeMap<String, f64>,
}

impl DcSolution {
    /// Voltage at the named node.
    pub fn voltage(&self, node: &str) -> Option<f64> {
        self.node_voltages.get(node).copied()
    }

    /// Current through the named voltage source.
    pub fn current(&self, source: &str) -> Option<f64> {
        self.source_currents.get(source).copied()
    }

    /// Split into `(node voltages, source currents)`.
    pub fn into_maps(self) -> (BTreeMap<String, f64>, BTreeMap<String, f64>) {
        (self.node_voltages, self.source_currents)
    }
}

/// Single-shot DC solver.
///
/// Holds only its configuration; every call to [`DcSolver::solve`] builds
/// and drops its own matrix, so a solver can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct DcSolver {
    config: SolverConfig,
}

impl DcSolver {
    /// Create a solver with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver with custom configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Assemble the MNA system for a circuit without solving it.
    pub fn assemble(&self, circuit: &Circuit) -> MnaMatrix {
        let mut matrix = MnaMatrix::new(circuit.matrix_size());
        stamp_components(circuit, &mut matrix);
        matrix
    }

    /// Compute node voltages and voltage source currents.
    pub fn solve(&self, circuit: &Circuit) -> Result<DcSolution> {
        let mut matrix = self.assemble(circuit);
        matrix.factor();

        debug!(
            size = matrix.size,
            determinant = matrix.determinant(),
            "assembled MNA system"
        );

        if matrix.is_singular(self.config.singular_tolerance) {
            return Err(SpiceError::NoSolution);
        }

        matrix.solve()?;

        Ok(Self::collect(circuit, &matrix))
    }

    fn collect(circuit: &Circuit, matrix: &MnaMatrix) -> DcSolution {
        let mut node_voltages = BTreeMap::new();
        node_voltages.insert(circuit.ground_name().to_string(), 0.0);
        for (name, &node) in &circuit.node_map {
            node_voltages.insert(name.clone(), matrix.node_voltage(circuit, node));
        }

        // The branch unknown is the current leaving the positive terminal;
        // reported currents use the opposite sign.
        let source_currents = circuit
            .voltage_sources()
            .map(|v| (v.name.clone(), -matrix.x[circuit.branch_index(v.branch)]))
            .collect();

        DcSolution {
            node_voltages,
            source_currents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist;

    fn solve(body: &str) -> Result<DcSolution> {
        let netlist = netlist::parse(&format!(".circuit\n{}\n.end\n", body))?;
        let circuit = Circuit::from_netlist(&netlist);
        DcSolver::new().solve(&circuit)
    }

    #[test]
    fn test_voltage_divider() {
        let sol = solve("V1 in GND dc 10\nR1 in out 1k\nR2 out GND 1k").unwrap();
        assert!((sol.voltage("in").unwrap() - 10.0).abs() < 1e-9);
        assert!((sol.voltage("out").unwrap() - 5.0).abs() < 1e-9);
        assert!((sol.current("V1").unwrap() + 5e-3).abs() < 1e-12);
        assert_eq!(sol.voltage("GND"), Some(0.0));
    }

    #[test]
    fn test_floating_node_has_no_solution() {
        let result = solve("V1 a GND dc 1\nR1 a GND 1\nR2 b c 1");
        assert!(matches!(result, Err(SpiceError::NoSolution)));
    }

    #[test]
    fn test_grounded_source_has_no_solution() {
        let result = solve("V1 GND GND dc 1");
        assert!(matches!(result, Err(SpiceError::NoSolution)));
    }

    #[test]
    fn test_empty_circuit() {
        let sol = solve("").unwrap();
        assert_eq!(sol.node_voltages.len(), 1);
        assert_eq!(sol.voltage("GND"), Some(0.0));
        assert!(sol.source_currents.is_empty());
    }

    #[test]
    fn test_tolerance_rejects_nearly_singular() {
        let netlist = netlist::parse(".circuit\nR1 a GND 1e12\n.end").unwrap();
        let circuit = Circuit::from_netlist(&netlist);

        assert!(DcSolver::new().solve(&circuit).is_ok());

        let strict = DcSolver::with_config(SolverConfig::new().with_singular_tolerance(1e-9));
        assert!(matches!(strict.solve(&circuit), Err(SpiceError::NoSolution)));
    }

    #[test]
    fn test_negative_tolerance_clamped() {
        let config = SolverConfig::new().with_singular_tolerance(-1.0);
        assert_eq!(config.singular_tolerance, 0.0);
    }
}
