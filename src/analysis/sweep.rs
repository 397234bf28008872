//! Small-signal AC frequency sweeps.

use std::f64::consts::PI;

use log::{debug, warn};

use crate::error::{Result, SpiceError};
use crate::solver::CircuitSolver;

use super::Probe;

/// Slack added before flooring logarithmic step counts.
const STEP_ROUNDING: f64 = 1e-9;

/// Spacing of sweep points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepKind {
    /// `points` evenly spaced frequencies
    Linear,
    /// `points` per decade, geometrically spaced
    Decade,
    /// `points` per octave, geometrically spaced
    Octave,
}

impl SweepKind {
    /// Parse `lin`, `dec` or `oct` (any case).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_lowercase().as_str() {
            "lin" => Some(Self::Linear),
            "dec" => Some(Self::Decade),
            "oct" => Some(Self::Octave),
            _ => None,
        }
    }

    /// Frequency ratio that `points` refers to; `None` for linear sweeps.
    pub fn base(&self) -> Option<f64> {
        match self {
            Self::Linear => None,
            Self::Decade => Some(10.0),
            Self::Octave => Some(2.0),
        }
    }
}

/// An AC sweep from `start_hz` to `stop_hz`.
#[derive(Debug, Clone, PartialEq)]
pub struct AcSweep {
    pub kind: SweepKind,
    pub points: usize,
    pub start_hz: f64,
    pub stop_hz: f64,
}

impl AcSweep {
    /// Create a sweep. Requires `points > 0`, `start_hz > 0` and `stop_hz > start_hz`.
    pub fn new(kind: SweepKind, points: usize, start_hz: f64, stop_hz: f64) -> Result<Self> {
        let valid = points > 0 && start_hz > 0.0 && stop_hz > start_hz;
        if !valid {
            return Err(SpiceError::InvalidCommand {
                command: ".ac".to_string(),
                line: 0,
                message: format!(
                    "need points > 0 and 0 < fstart < fstop (got {}, {}, {})",
                    points, start_hz, stop_hz
                ),
            });
        }
        Ok(Self {
            kind,
            points,
            start_hz,
            stop_hz,
        })
    }

    /// Total number of sweep points.
    ///
    /// Linear sweeps use `points` directly. Logarithmic sweeps use
    /// `floor(points * log_base(stop / start))`, at least 1. The floor
    /// tolerates rounding so that exact decades give whole step counts.
    pub fn step_count(&self) -> usize {
        match self.kind.base() {
            None => self.points,
            Some(base) => {
                let exact = self.points as f64 * (self.stop_hz / self.start_hz).ln() / base.ln();
                ((exact + STEP_ROUNDING).floor() as usize).max(1)
            }
        }
    }

    /// Angular frequencies (rad/s) of every point, start and stop included.
    pub fn angular_frequencies(&self) -> Vec<f64> {
        let steps = self.step_count();
        let start = 2.0 * PI * self.start_hz;
        let stop = 2.0 * PI * self.stop_hz;
        if steps == 1 {
            return vec![start];
        }

        let last = (steps - 1) as f64;
        (0..steps)
            .map(|i| {
                let t = i as f64 / last;
                match self.kind {
                    SweepKind::Linear => start + (stop - start) * t,
                    SweepKind::Decade | SweepKind::Octave => start * (stop / start).powf(t),
                }
            })
            .collect()
    }

    /// Frequencies (Hz) of every point.
    pub fn frequencies(&self) -> Vec<f64> {
        self.angular_frequencies()
            .into_iter()
            .map(|omega| omega / (2.0 * PI))
            .collect()
    }
}

/// What to do when one sweep point fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepPolicy {
    /// Stop and return the error
    #[default]
    Abort,
    /// Record the error for that point and keep going
    Continue,
}

/// Result of one sweep point.
#[derive(Debug)]
pub struct SweepPoint {
    pub step: usize,
    pub frequency_hz: f64,
    pub omega: f64,
    /// Probe values in probe order, or the reason the point failed
    pub outcome: Result<Vec<f64>>,
}

fn measure_point(solver: &mut CircuitSolver, omega: f64, probes: &[Probe]) -> Result<Vec<f64>> {
    solver.solve(omega)?;
    probes.iter().map(|p| p.evaluate(solver)).collect()
}

/// Solve at every sweep frequency and evaluate `probes` at each.
pub fn run_sweep(
    solver: &mut CircuitSolver,
    sweep: &AcSweep,
    probes: &[Probe],
    policy: SweepPolicy,
) -> Result<Vec<SweepPoint>> {
    let omegas = sweep.angular_frequencies();
    debug!(
        "AC sweep: {} points from {} Hz to {} Hz ({:?})",
        omegas.len(),
        sweep.start_hz,
        sweep.stop_hz,
        sweep.kind
    );

    let mut points = Vec::with_capacity(omegas.len());
    for (step, omega) in omegas.into_iter().enumerate() {
        let frequency_hz = omega / (2.0 * PI);
        let outcome = measure_point(solver, omega, probes).map_err(|source| SpiceError::SweepStep {
            step,
            frequency: frequency_hz,
            source: Box::new(source),
        });

        match (outcome, policy) {
            (Err(err), SweepPolicy::Abort) => return Err(err),
            (Err(err), SweepPolicy::Continue) => {
                warn!("{}", err);
                points.push(SweepPoint {
                    step,
                    frequency_hz,
                    omega,
                    outcome: Err(err),
                });
            }
            (Ok(values), _) => {
                debug!("step {} at {:.6} Hz: {:?}", step, frequency_hz, values);
                points.push(SweepPoint {
                    step,
                    frequency_hz,
                    omega,
                    outcome: Ok(values),
                });
            }
        }
    }

    Ok(points)
}
