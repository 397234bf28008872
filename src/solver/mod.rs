//! MNA (Modified Nodal Analysis) solver.
//!
//! This module provides the numerical engine for linear circuit analysis.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations Ax = z where:
//! - x contains node voltages and branch currents
//! - A is the coefficient matrix
//! - z is the excitation vector
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ i ]
//! [ C   D ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - G is the admittance matrix (node equations)
//! - B connects voltage sources and op-amp outputs to nodes
//! - C carries the voltage source constraints and the op-amp input constraints
//! - D is always 0 (ideal sources only)
//! - v is the vector of node voltages
//! - j is the vector of voltage source currents followed by op-amp output currents
//! - i is the sum of current sources into each node
//! - e is the vector of voltage source values, then one 0 per op-amp
//!
//! All entries are complex so the same pipeline serves DC (`omega = 0`) and
//! AC small-signal analysis.

mod circuit_solver;
mod gauss;
pub mod mna;
mod solution;

pub use circuit_solver::{CircuitSolver, SolverConfig, SolverState};
pub use gauss::gaussian_elimination;
pub use mna::MnaProblem;
pub use solution::MnaSolution;

/// Default pivot tolerance: only exactly-zero pivot columns are singular.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 0.0;

/// Resistance (ohms) substituted for an inductor at DC.
pub const DC_INDUCTOR_RESISTANCE: f64 = 1e-9;
