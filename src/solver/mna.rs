//! MNA matrix assembly and solving.

use tracing::trace;

use crate::circuit::{Circuit, NodeId};
use crate::components::Component;
use crate::error::{Result, SpiceError};

/// MNA matrix system Ax = z.
#[derive(Debug, Clone)]
pub struct MnaMatrix {
    /// System matrix A (row-major)
    pub a: Vec<f64>,
    /// Source vector z
    pub z: Vec<f64>,
    /// Solution vector x
    pub x: Vec<f64>,
    /// Matrix dimension
    pub size: usize,
    /// LU decomposition of A (for efficient solving)
    pub lu: Vec<f64>,
    /// Pivot indices for LU decomposition
    pub pivots: Vec<usize>,
    /// Sign of the row permutation applied by `factor` (+1 or -1)
    permutation_sign: f64,
    /// Set by `factor` when some column had no non-zero pivot candidate
    zero_pivot: bool,
}

impl MnaMatrix {
    /// Create a new zeroed MNA system of the given dimension.
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![0.0; size * size],
            z: vec![0.0; size],
            x: vec![0.0; size],
            size,
            lu: vec![0.0; size * size],
            pivots: (0..size).collect(),
            permutation_sign: 1.0,
            zero_pivot: false,
        }
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.size + col]
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
    }

    /// Add to source vector element.
    pub fn add_source(&mut self, row: usize, value: f64) {
        self.z[row] += value;
    }

    /// Stamp a conductance between two nodes.
    /// For a conductance G between nodes n1 and n2:
    ///   A[n1,n1] += G
    ///   A[n2,n2] += G
    ///   A[n1,n2] -= G
    ///   A[n2,n1] -= G
    pub fn stamp_conductance(&mut self, n1: Option<usize>, n2: Option<usize>, g: f64) {
        if let Some(i) = n1 {
            self.add(i, i, g);
        }
        if let Some(j) = n2 {
            self.add(j, j, g);
        }
        if let (Some(i), Some(j)) = (n1, n2) {
            self.add(i, j, -g);
            self.add(j, i, -g);
        }
    }

    /// Stamp a voltage source between two nodes with branch current at index br.
    ///
    /// The constraint row reads V[n+] - V[n-] = E. The branch unknown enters
    /// the KCL rows with -1 at n+ and +1 at n-, so it is the current the source
    /// pushes out of its positive terminal into the circuit.
    pub fn stamp_voltage_source(
        &mut self,
        n_pos: Option<usize>,
        n_neg: Option<usize>,
        br: usize,
        voltage: f64,
    ) {
        if let Some(i) = n_pos {
            self.add(i, br, -1.0);
            self.add(br, i, 1.0);
        }
        if let Some(j) = n_neg {
            self.add(j, br, 1.0);
            self.add(br, j, -1.0);
        }
        // Set, not accumulated: the row belongs to this source alone.
        self.z[br] = voltage;
    }

    /// Stamp a current source between two nodes.
    /// Current flows out of `n_from` and into `n_to`.
    pub fn stamp_current_source(&mut self, n_from: Option<usize>, n_to: Option<usize>, current: f64) {
        if let Some(i) = n_from {
            self.add_source(i, -current);
        }
        if let Some(j) = n_to {
            self.add_source(j, current);
        }
    }

    /// Perform LU decomposition with partial pivoting.
    ///
    /// A column without a non-zero pivot candidate does not abort the
    /// factorization; it leaves a zero on the diagonal, which makes the
    /// determinant exactly zero.
    pub fn factor(&mut self) {
        let n = self.size;
        self.lu.copy_from_slice(&self.a);
        for (i, p) in self.pivots.iter_mut().enumerate() {
            *p = i;
        }
        self.permutation_sign = 1.0;
        self.zero_pivot = false;

        for k in 0..n {
            // Find pivot
            let mut max_val = self.lu[k * n + k].abs();
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = self.lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val == 0.0 {
                self.zero_pivot = true;
                continue;
            }

            // Swap rows if needed
            if max_row != k {
                self.pivots.swap(k, max_row);
                self.permutation_sign = -self.permutation_sign;
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    self.lu[i * n + j] -= factor * self.lu[k * n + j];
                }
            }
        }
    }

    /// Determinant of A, read off the last factorization.
    ///
    /// The determinant of an empty (0x0) system is 1.
    pub fn determinant(&self) -> f64 {
        let n = self.size;
        (0..n).fold(self.permutation_sign, |det, i| det * self.lu[i * n + i])
    }

    /// Whether the last factorization found A to be singular.
    ///
    /// With `tolerance == 0.0` this is the exact test `det(A) == 0`, decided
    /// on the LU diagonal so that underflow of the pivot product cannot
    /// report a regular matrix as singular. A positive tolerance instead
    /// flags any `|det(A)| <= tolerance`.
    pub fn is_singular(&self, tolerance: f64) -> bool {
        if tolerance > 0.0 {
            self.determinant().abs() <= tolerance
        } else {
            self.zero_pivot
        }
    }

    /// Solve the system using the pre-computed LU decomposition.
    pub fn solve(&mut self) -> Result<()> {
        let n = self.size;

        // Apply pivot permutation to z
        for i in 0..n {
            self.x[i] = self.z[self.pivots[i]];
        }

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
            let diag = self.lu[i * n + i];
            if diag == 0.0 {
                return Err(SpiceError::NoSolution);
            }
            self.x[i] /= diag;
        }

        Ok(())
    }

    /// Get the voltage at a node.
    pub fn voltage(&self, node: Option<usize>) -> f64 {
        match node {
            Some(i) => self.x[i],
            None => 0.0, // Ground
        }
    }

    /// Get the voltage at a NodeId (handling ground).
    pub fn node_voltage(&self, circuit: &Circuit, node: NodeId) -> f64 {
        self.voltage(circuit.node_index(node))
    }
}

/// Stamp every component of the circuit into the MNA matrix.
///
/// Contributions are additive, so the order of components does not matter.
pub fn stamp_components(circuit: &Circuit, matrix: &mut MnaMatrix) {
    for component in &circuit.components {
        match component {
            Component::Resistor(r) => {
                let n1 = circuit.node_index(r.nodes[0]);
                let n2 = circuit.node_index(r.nodes[1]);
                matrix.stamp_conductance(n1, n2, r.conductance());
            }

            Component::VoltageSource(v) => {
                let n1 = circuit.node_index(v.nodes[0]);
                let n2 = circuit.node_index(v.nodes[1]);
                let br = circuit.branch_index(v.branch);
                matrix.stamp_voltage_source(n1, n2, br, v.voltage);
            }

            Component::CurrentSource(i) => {
                let n1 = circuit.node_index(i.nodes[0]);
                let n2 = circuit.node_index(i.nodes[1]);
                matrix.stamp_current_source(n1, n2, i.current);
            }
        }
        trace!(name = component.name(), "stamped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conductance_stamp() {
        let mut m = MnaMatrix::new(2);
        m.stamp_conductance(Some(0), Some(1), 0.5);
        assert_eq!(m.get(0, 0), 0.5);
        assert_eq!(m.get(1, 1), 0.5);
        assert_eq!(m.get(0, 1), -0.5);
        assert_eq!(m.get(1, 0), -0.5);

        // To ground: only the diagonal of the live terminal
        let mut m = MnaMatrix::new(1);
        m.stamp_conductance(None, Some(0), 2.0);
        assert_eq!(m.get(0, 0), 2.0);
    }

    #[test]
    fn test_voltage_source_stamp() {
        let mut m = MnaMatrix::new(3);
        m.stamp_voltage_source(Some(0), Some(1), 2, 5.0);
        assert_eq!(m.get(0, 2), -1.0);
        assert_eq!(m.get(2, 0), 1.0);
        assert_eq!(m.get(1, 2), 1.0);
        assert_eq!(m.get(2, 1), -1.0);
        assert_eq!(m.z[2], 5.0);
    }

    #[test]
    fn test_grounded_voltage_source_still_sets_rhs() {
        let mut m = MnaMatrix::new(1);
        m.stamp_voltage_source(None, None, 0, 3.0);
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.z[0], 3.0);
    }

    #[test]
    fn test_current_source_stamp() {
        let mut m = MnaMatrix::new(2);
        m.stamp_current_source(Some(0), Some(1), 1e-3);
        assert_eq!(m.z[0], -1e-3);
        assert_eq!(m.z[1], 1e-3);
    }

    #[test]
    fn test_solve_simple() {
        // 2x + y = 5
        // x + 3y = 6
        // Solution: x = 1.8, y = 1.4
        let mut m = MnaMatrix::new(2);
        m.add(0, 0, 2.0);
        m.add(0, 1, 1.0);
        m.add(1, 0, 1.0);
        m.add(1, 1, 3.0);
        m.z = vec![5.0, 6.0];

        m.factor();
        assert!(!m.is_singular(0.0));
        assert!((m.determinant() - 5.0).abs() < 1e-12);
        m.solve().unwrap();
        assert!((m.x[0] - 1.8).abs() < 1e-10);
        assert!((m.x[1] - 1.4).abs() < 1e-10);
    }

    #[test]
    fn test_determinant_sign_after_pivoting() {
        // [[0, 1], [1, 0]] needs a row swap; det = -1
        let mut m = MnaMatrix::new(2);
        m.add(0, 1, 1.0);
        m.add(1, 0, 1.0);
        m.factor();
        assert_eq!(m.determinant(), -1.0);
    }

    #[test]
    fn test_singular_matrix() {
        let mut m = MnaMatrix::new(2);
        m.add(0, 0, 1.0);
        m.add(0, 1, 2.0);
        m.add(1, 0, 2.0);
        m.add(1, 1, 4.0); // row 2 = 2 * row 1
        m.factor();
        assert!(m.is_singular(0.0));
        assert_eq!(m.determinant(), 0.0);
        assert!(matches!(m.solve(), Err(SpiceError::NoSolution)));
    }

    #[test]
    fn test_tolerance() {
        let mut m = MnaMatrix::new(1);
        m.add(0, 0, 1e-9);
        m.factor();
        assert!(!m.is_singular(0.0));
        assert!(m.is_singular(1e-6));
    }

    #[test]
    fn test_underflowing_determinant_is_not_singular() {
        // det = 1e-40^10 underflows to 0.0, but every pivot is non-zero.
        let n = 10;
        let mut m = MnaMatrix::new(n);
        for i in 0..n {
            m.add(i, i, 1e-40);
        }
        m.factor();
        assert_eq!(m.determinant(), 0.0);
        assert!(!m.is_singular(0.0));
    }

    #[test]
    fn test_empty_system() {
        let mut m = MnaMatrix::new(0);
        m.factor();
        assert_eq!(m.determinant(), 1.0);
        assert!(!m.is_singular(0.0));
        assert!(m.solve().is_ok());
    }
}
