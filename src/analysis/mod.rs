//! Analyses driven on top of the [`CircuitSolver`]: DC operating point and
//! small-signal AC sweeps, both reported through [`Probe`]s.

mod probe;
mod sweep;

pub use probe::{ComplexView, Measurement, Probe};
pub use sweep::{run_sweep, AcSweep, SweepKind, SweepPoint, SweepPolicy};

use log::{debug, log_enabled, Level};

use crate::error::Result;
use crate::solver::CircuitSolver;

/// Solve at DC (`omega = 0`) and evaluate every probe.
pub fn operating_point(solver: &mut CircuitSolver, probes: &[Probe]) -> Result<Vec<f64>> {
    if log_enabled!(Level::Debug) {
        debug!("DC system [A | z]:\n{}", solver.problem_at(0.0)?.system()?);
    }
    solver.solve(0.0)?;
    if let Some(solution) = solver.solution() {
        debug!(
            "DC operating point: {} nodes, {} unknowns",
            solution.node_count(),
            solution.values().len()
        );
    }
    probes.iter().map(|p| p.evaluate(solver)).collect()
}
