//! MNA problem description and system assembly.

use num_complex::Complex64;

use crate::circuit::NodeIndex;
use crate::error::Result;
use crate::matrix::Matrix;

use super::gauss::gaussian_elimination;
use super::solution::MnaSolution;
use super::DEFAULT_PIVOT_TOLERANCE;

/// Admittance `y` between two nodes. Any passive element reduces to this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Admittance {
    pub nodes: (NodeIndex, NodeIndex),
    pub y: Complex64,
}

/// Ideal voltage source, `V(nodes.0) - V(nodes.1) = value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageSource {
    pub nodes: (NodeIndex, NodeIndex),
    pub value: f64,
}

/// Ideal current source pushing `value` amps into `nodes.0` and out of `nodes.1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentSource {
    pub nodes: (NodeIndex, NodeIndex),
    pub value: f64,
}

/// Ideal op-amp under negative feedback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpAmp {
    pub non_inverting: NodeIndex,
    pub inverting: NodeIndex,
    pub output: NodeIndex,
}

/// A linear circuit reduced to the four entity kinds MNA knows about.
///
/// Node indices must be compact: every non-ground index is below
/// [`node_count`](Self::node_count). The system has `n + m` unknowns, where
/// `n` is the node count and `m` the number of voltage sources plus op-amps.
/// Voltage source currents come first among the extra unknowns, in
/// declaration order, followed by op-amp output currents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MnaProblem {
    pub admittances: Vec<Admittance>,
    pub voltage_sources: Vec<VoltageSource>,
    pub current_sources: Vec<CurrentSource>,
    pub opamps: Vec<OpAmp>,
}

fn max_node(nodes: impl IntoIterator<Item = NodeIndex>) -> Option<usize> {
    nodes.into_iter().filter_map(|n| n.index()).max()
}

impl MnaProblem {
    /// Create an empty problem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-ground nodes: highest referenced index + 1.
    pub fn node_count(&self) -> usize {
        let admittances = self.admittances.iter().flat_map(|e| [e.nodes.0, e.nodes.1]);
        let vsources = self.voltage_sources.iter().flat_map(|e| [e.nodes.0, e.nodes.1]);
        let isources = self.current_sources.iter().flat_map(|e| [e.nodes.0, e.nodes.1]);
        let opamps = self
            .opamps
            .iter()
            .flat_map(|e| [e.non_inverting, e.inverting, e.output]);

        max_node(admittances.chain(vsources).chain(isources).chain(opamps)).map_or(0, |max| max + 1)
    }

    /// Number of extra unknowns: voltage sources plus op-amps.
    pub fn branch_count(&self) -> usize {
        self.voltage_sources.len() + self.opamps.len()
    }

    /// Build the `(n+m) x (n+m)` coefficient matrix `A = [[G, B], [C, D]]`.
    ///
    /// # Panics
    /// Panics if an entity references a node index `>= node_count`.
    pub fn matrix_a(&self, node_count: usize) -> Result<Matrix<Complex64>> {
        let n = node_count;
        let m = self.branch_count();
        let vs_count = self.voltage_sources.len();
        let one = Complex64::new(1.0, 0.0);

        let mut g: Matrix<Complex64> = Matrix::new(n, n);
        let mut b: Matrix<Complex64> = Matrix::new(n, m);
        let d: Matrix<Complex64> = Matrix::new(m, m);

        for elem in &self.admittances {
            let (a, c) = (elem.nodes.0.index(), elem.nodes.1.index());
            if let Some(i) = a {
                g[(i, i)] += elem.y;
            }
            if let Some(j) = c {
                g[(j, j)] += elem.y;
            }
            if let (Some(i), Some(j)) = (a, c) {
                g[(i, j)] -= elem.y;
                g[(j, i)] -= elem.y;
            }
        }

        for (col, vs) in self.voltage_sources.iter().enumerate() {
            if let Some(i) = vs.nodes.0.index() {
                b[(i, col)] = one;
            }
            if let Some(j) = vs.nodes.1.index() {
                b[(j, col)] = -one;
            }
        }

        // C mirrors the voltage-source part of B only
        let mut c = b.transpose();

        // Op-amp output: a voltage source from ground to the output node
        for (k, op) in self.opamps.iter().enumerate() {
            if let Some(out) = op.output.index() {
                b[(out, vs_count + k)] = one;
            }
        }

        // Op-amp constraint row: V+ - V- = 0
        for (k, op) in self.opamps.iter().enumerate() {
            if let Some(p) = op.non_inverting.index() {
                c[(vs_count + k, p)] = one;
            }
            if let Some(q) = op.inverting.index() {
                c[(vs_count + k, q)] = -one;
            }
        }

        Matrix::join_vertical(
            &Matrix::join_horizontal(&g, &b)?,
            &Matrix::join_horizontal(&c, &d)?,
        )
    }

    /// Build the `(n+m) x 1` excitation vector `z = [I; E]`.
    ///
    /// # Panics
    /// Panics if a current source references a node index `>= node_count`.
    pub fn vector_z(&self, node_count: usize) -> Result<Matrix<Complex64>> {
        let mut currents: Matrix<Complex64> = Matrix::new(node_count, 1);
        let mut voltages: Matrix<Complex64> = Matrix::new(self.branch_count(), 1);

        for cs in &self.current_sources {
            if let Some(i) = cs.nodes.0.index() {
                currents[(i, 0)] += cs.value;
            }
            if let Some(j) = cs.nodes.1.index() {
                currents[(j, 0)] -= cs.value;
            }
        }

        // Op-amp rows stay zero
        for (row, vs) in self.voltage_sources.iter().enumerate() {
            voltages[(row, 0)] = Complex64::new(vs.value, 0.0);
        }

        Matrix::join_vertical(&currents, &voltages)
    }

    /// The augmented system `[A | z]`.
    pub fn system(&self) -> Result<Matrix<Complex64>> {
        let n = self.node_count();
        Matrix::join_horizontal(&self.matrix_a(n)?, &self.vector_z(n)?)
    }

    /// Assemble and solve with an exact-zero pivot test.
    pub fn solve(&self) -> Result<MnaSolution> {
        self.solve_with_tolerance(DEFAULT_PIVOT_TOLERANCE)
    }

    /// Assemble and solve, treating pivots with magnitude `<= tolerance` as zero.
    pub fn solve_with_tolerance(&self, tolerance: f64) -> Result<MnaSolution> {
        let n = self.node_count();
        let system = Matrix::join_horizontal(&self.matrix_a(n)?, &self.vector_z(n)?)?;
        let x = gaussian_elimination(&system, tolerance)?;
        Ok(MnaSolution::new(x, n, self.voltage_sources.len()))
    }

    /// Largest magnitude of `A*x - z` for a solution of this problem.
    pub fn residual_norm(&self, solution: &MnaSolution) -> Result<f64> {
        let n = self.node_count();
        let ax = self.matrix_a(n)?.multiply(solution.as_matrix())?;
        let z = self.vector_z(n)?;
        Ok(ax
            .as_slice()
            .iter()
            .zip(z.as_slice())
            .map(|(l, r)| (l - r).norm())
            .fold(0.0, f64::max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use NodeIndex::{Ground, Node};

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    /// 5V source on node 0, 1k from node 0 to node 1, 1k from node 1 to ground.
    fn divider() -> MnaProblem {
        MnaProblem {
            admittances: vec![
                Admittance { nodes: (Node(0), Node(1)), y: c(1e-3) },
                Admittance { nodes: (Node(1), Ground), y: c(1e-3) },
            ],
            voltage_sources: vec![VoltageSource { nodes: (Node(0), Ground), value: 5.0 }],
            ..Default::default()
        }
    }

    #[test]
    fn test_node_and_branch_count() {
        let mut problem = divider();
        assert_eq!(problem.node_count(), 2);
        assert_eq!(problem.branch_count(), 1);

        problem.opamps.push(OpAmp {
            non_inverting: Ground,
            inverting: Node(1),
            output: Node(4),
        });
        assert_eq!(problem.node_count(), 5);
        assert_eq!(problem.branch_count(), 2);

        assert_eq!(MnaProblem::new().node_count(), 0);
    }

    #[test]
    fn test_conductance_block() {
        let a = divider().matrix_a(2).unwrap();
        assert_eq!(a.shape(), (3, 3));
        assert_eq!(a[(0, 0)], c(1e-3));
        assert_eq!(a[(0, 1)], c(-1e-3));
        assert_eq!(a[(1, 0)], c(-1e-3));
        assert_eq!(a[(1, 1)], c(2e-3));
        // B and C for the grounded source
        assert_eq!(a[(0, 2)], c(1.0));
        assert_eq!(a[(2, 0)], c(1.0));
        assert_eq!(a[(1, 2)], c(0.0));
        assert_eq!(a[(2, 2)], c(0.0));
    }

    #[test]
    fn test_opamp_stamps() {
        let problem = MnaProblem {
            voltage_sources: vec![VoltageSource { nodes: (Node(0), Node(1)), value: 1.0 }],
            opamps: vec![OpAmp {
                non_inverting: Node(0),
                inverting: Node(1),
                output: Node(2),
            }],
            ..Default::default()
        };
        let a = problem.matrix_a(3).unwrap();
        assert_eq!(a.shape(), (5, 5));

        // B: voltage source column 3, op-amp column 4 (output row only)
        assert_eq!(a[(0, 3)], c(1.0));
        assert_eq!(a[(1, 3)], c(-1.0));
        assert_eq!(a[(2, 4)], c(1.0));
        assert_eq!(a[(0, 4)], c(0.0));
        assert_eq!(a[(1, 4)], c(0.0));

        // C: voltage source row mirrors B, op-amp row holds the input constraint
        assert_eq!(a[(3, 0)], c(1.0));
        assert_eq!(a[(3, 1)], c(-1.0));
        assert_eq!(a[(4, 0)], c(1.0));
        assert_eq!(a[(4, 1)], c(-1.0));
        assert_eq!(a[(4, 2)], c(0.0));
    }

    #[test]
    fn test_excitation_vector() {
        let problem = MnaProblem {
            voltage_sources: vec![VoltageSource { nodes: (Node(0), Ground), value: 3.0 }],
            current_sources: vec![
                CurrentSource { nodes: (Node(1), Node(0)), value: 2.0 },
                CurrentSource { nodes: (Ground, Node(1)), value: 0.5 },
            ],
            opamps: vec![OpAmp {
                non_inverting: Ground,
                inverting: Node(0),
                output: Node(1),
            }],
            ..Default::default()
        };
        let z = problem.vector_z(2).unwrap();
        assert_eq!(z.shape(), (4, 1));
        assert_eq!(z[(0, 0)], c(-2.0));
        assert_eq!(z[(1, 0)], c(1.5));
        assert_eq!(z[(2, 0)], c(3.0));
        assert_eq!(z[(3, 0)], c(0.0));
    }

    #[test]
    fn test_solve_divider() {
        let problem = divider();
        let solution = problem.solve().unwrap();
        assert_relative_eq!(solution.node_voltage(Node(0)).unwrap().re, 5.0, epsilon = 1e-12);
        assert_relative_eq!(solution.node_voltage(Node(1)).unwrap().re, 2.5, epsilon = 1e-12);
        assert_relative_eq!(solution.voltage_source_current(0).unwrap().re, -2.5e-3, epsilon = 1e-15);
        assert!(problem.residual_norm(&solution).unwrap() < 1e-12);
    }

    #[test]
    fn test_system_shape() {
        let system = divider().system().unwrap();
        assert_eq!(system.shape(), (3, 4));
        assert_eq!(system[(2, 3)], c(5.0));
    }

    #[test]
    fn test_solve_is_deterministic() {
        let problem = MnaProblem {
            admittances: vec![
                Admittance { nodes: (Node(0), Node(1)), y: Complex64::new(1e-3, 2e-4) },
                Admittance { nodes: (Node(1), Ground), y: Complex64::new(0.0, 1e-3) },
                Admittance { nodes: (Node(1), Node(2)), y: c(0.5) },
                Admittance { nodes: (Node(2), Ground), y: c(0.5) },
            ],
            voltage_sources: vec![VoltageSource { nodes: (Node(0), Ground), value: 1.0 }],
            current_sources: vec![CurrentSource { nodes: (Node(2), Ground), value: 1e-3 }],
            ..Default::default()
        };
        let first = problem.solve().unwrap();
        let second = problem.solve().unwrap();
        assert_eq!(first.values(), second.values());
    }

    #[test]
    fn test_floating_node_is_singular() {
        let mut problem = divider();
        // Node 2 is reached only by a current source
        problem.current_sources.push(CurrentSource { nodes: (Node(2), Ground), value: 1.0 });
        let err = problem.solve().unwrap_err();
        assert!(err.is_singular());
    }

    #[test]
    fn test_parallel_sources_are_singular() {
        let mut problem = divider();
        problem.voltage_sources.push(VoltageSource { nodes: (Node(0), Ground), value: 3.0 });
        assert!(problem.solve().unwrap_err().is_singular());
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_node_panics() {
        let _ = divider().matrix_a(1);
    }
}
