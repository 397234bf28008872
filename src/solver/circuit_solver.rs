//! Label-aware circuit solver.

use std::collections::HashMap;

use num_complex::Complex64;

use crate::circuit::{Circuit, NodeIndex};
use crate::components::{Component, Passive};
use crate::error::{Result, SpiceError};

use super::mna::{self, MnaProblem};
use super::solution::MnaSolution;
use super::{DC_INDUCTOR_RESISTANCE, DEFAULT_PIVOT_TOLERANCE};

/// Configuration for the circuit solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Pivots with magnitude at or below this are treated as zero.
    pub pivot_tolerance: f64,
    /// Resistance (ohms) standing in for an inductor at DC.
    pub dc_inductor_resistance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
            dc_inductor_resistance: DC_INDUCTOR_RESISTANCE,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute pivot tolerance.
    ///
    /// The default of 0 only rejects exactly-zero pivot columns. The
    /// threshold is absolute, so it must sit well below the smallest
    /// conductance in the circuit.
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    /// Set the resistance used in place of an inductor at `omega = 0`.
    ///
    /// This approximates the short circuit an ideal inductor is at DC.
    /// Smaller values are closer to ideal but spread the matrix over a
    /// wider range of magnitudes.
    pub fn with_dc_inductor_resistance(mut self, resistance: f64) -> Self {
        self.dc_inductor_resistance = resistance;
        self
    }
}

/// Solver state.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverState {
    /// No valid solution: never solved, or the last solve failed.
    Unsolved,
    /// Solved at angular frequency `omega` (rad/s).
    SolvedAt { omega: f64, solution: MnaSolution },
}

/// Label -> index bookkeeping derived from a circuit.
#[derive(Debug, Clone, Default)]
struct Topology {
    node_map: HashMap<String, NodeIndex>,
    /// Non-ground labels in index order
    node_labels: Vec<String>,
    voltage_source_ids: HashMap<String, usize>,
    opamp_ids: HashMap<String, usize>,
}

impl Topology {
    fn build(circuit: &Circuit) -> Self {
        let mut topology = Self::default();
        topology
            .node_map
            .insert(circuit.ground().to_string(), NodeIndex::Ground);

        for element in circuit.elements() {
            for label in element.component.nodes() {
                if !topology.node_map.contains_key(label) {
                    let index = NodeIndex::Node(topology.node_labels.len());
                    topology.node_map.insert(label.to_string(), index);
                    topology.node_labels.push(label.to_string());
                }
            }

            match element.component {
                Component::VoltageSource(_) => {
                    let id = topology.voltage_source_ids.len();
                    topology.voltage_source_ids.insert(element.name.clone(), id);
                }
                Component::OpAmp(_) => {
                    let id = topology.opamp_ids.len();
                    topology.opamp_ids.insert(element.name.clone(), id);
                }
                Component::Passive(_) | Component::CurrentSource(_) => {}
            }
        }

        topology
    }

    fn node(&self, label: &str) -> Result<NodeIndex> {
        self.node_map
            .get(label)
            .copied()
            .ok_or_else(|| SpiceError::UnknownNode {
                node: label.to_string(),
            })
    }

    fn pair(&self, nodes: &[String; 2]) -> Result<(NodeIndex, NodeIndex)> {
        Ok((self.node(&nodes[0])?, self.node(&nodes[1])?))
    }
}

/// Solves a labelled [`Circuit`] one frequency at a time.
///
/// Node labels are numbered in order of first appearance while scanning the
/// elements in declaration order; the ground label always maps to
/// [`NodeIndex::Ground`]. Every [`solve`](Self::solve) rebuilds the MNA
/// problem from scratch and replaces the previous solution.
///
/// # Example
///
/// ```
/// use linspice_core::{Circuit, CircuitSolver, Component};
///
/// let circuit = Circuit::new()
///     .with("V1", Component::voltage_source("in", "0", 10.0, 0.0))?
///     .with("R1", Component::resistor("in", "out", 1e3))?
///     .with("R2", Component::resistor("out", "0", 1e3))?;
///
/// let mut solver = CircuitSolver::new(circuit);
/// solver.solve(0.0)?;
/// assert!((solver.node_voltage("out")?.re - 5.0).abs() < 1e-9);
/// # Ok::<(), linspice_core::SpiceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CircuitSolver {
    circuit: Circuit,
    config: SolverConfig,
    topology: Topology,
    state: SolverState,
}

impl CircuitSolver {
    /// Create a solver with default configuration.
    pub fn new(circuit: Circuit) -> Self {
        Self::with_config(circuit, SolverConfig::default())
    }

    /// Create a solver with custom configuration.
    pub fn with_config(circuit: Circuit, config: SolverConfig) -> Self {
        let topology = Topology::build(&circuit);
        Self {
            circuit,
            config,
            topology,
            state: SolverState::Unsolved,
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn state(&self) -> &SolverState {
        &self.state
    }

    pub fn is_solved(&self) -> bool {
        matches!(self.state, SolverState::SolvedAt { .. })
    }

    /// Frequency of the current solution, if any.
    pub fn solution_omega(&self) -> Option<f64> {
        match &self.state {
            SolverState::SolvedAt { omega, .. } => Some(*omega),
            SolverState::Unsolved => None,
        }
    }

    /// The current solution, if any.
    pub fn solution(&self) -> Option<&MnaSolution> {
        match &self.state {
            SolverState::SolvedAt { solution, .. } => Some(solution),
            SolverState::Unsolved => None,
        }
    }

    /// Label -> index map, ground included.
    pub fn node_map(&self) -> &HashMap<String, NodeIndex> {
        &self.topology.node_map
    }

    /// Non-ground labels in index order.
    pub fn node_labels(&self) -> &[String] {
        &self.topology.node_labels
    }

    /// Apply a topology change.
    ///
    /// The node map is rebuilt afterwards. If the solver held a solution it
    /// is re-solved at the same frequency; otherwise it stays unsolved.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Circuit) -> R) -> Result<R> {
        let result = f(&mut self.circuit);
        self.topology = Topology::build(&self.circuit);
        match self.solution_omega() {
            Some(omega) => self.solve(omega)?,
            None => self.state = SolverState::Unsolved,
        }
        Ok(result)
    }

    /// Add a component, then re-map and re-solve as in [`edit`](Self::edit).
    pub fn add_component(&mut self, name: impl Into<String>, component: Component) -> Result<()> {
        self.edit(|circuit| circuit.add(name, component))?
    }

    /// Remove a component, then re-map and re-solve as in [`edit`](Self::edit).
    pub fn remove_component(&mut self, name: &str) -> Result<Component> {
        if !self.circuit.contains(name) {
            return Err(SpiceError::UnknownComponent {
                name: name.to_string(),
            });
        }
        self.edit(|circuit| circuit.remove(name))?
            .ok_or_else(|| SpiceError::UnknownComponent {
                name: name.to_string(),
            })
    }

    fn admittance_of(&self, passive: &Passive, omega: f64) -> Complex64 {
        passive
            .admittance(omega)
            .unwrap_or_else(|| Complex64::new(1.0 / self.config.dc_inductor_resistance, 0.0))
    }

    /// Build the MNA problem for angular frequency `omega`.
    pub fn problem_at(&self, omega: f64) -> Result<MnaProblem> {
        let mut problem = MnaProblem::new();

        for element in self.circuit.elements() {
            match &element.component {
                Component::Passive(passive) => problem.admittances.push(mna::Admittance {
                    nodes: self.topology.pair(passive.nodes())?,
                    y: self.admittance_of(passive, omega),
                }),
                Component::VoltageSource(source) => {
                    problem.voltage_sources.push(mna::VoltageSource {
                        nodes: self.topology.pair(&source.nodes)?,
                        value: source.value_at(omega),
                    })
                }
                Component::CurrentSource(source) => {
                    problem.current_sources.push(mna::CurrentSource {
                        nodes: self.topology.pair(&source.nodes)?,
                        value: source.value_at(omega),
                    })
                }
                Component::OpAmp(op) => problem.opamps.push(mna::OpAmp {
                    non_inverting: self.topology.node(&op.non_inverting)?,
                    inverting: self.topology.node(&op.inverting)?,
                    output: self.topology.node(&op.output)?,
                }),
            }
        }

        Ok(problem)
    }

    /// Solve at angular frequency `omega` (rad/s). `0.0` is DC.
    ///
    /// On failure the solver is left [`Unsolved`](SolverState::Unsolved).
    pub fn solve(&mut self, omega: f64) -> Result<()> {
        self.state = SolverState::Unsolved;

        let problem = self.problem_at(omega)?;
        let solution = problem
            .solve_with_tolerance(self.config.pivot_tolerance)
            .map_err(|err| match err {
                SpiceError::SingularMatrix { .. } => SpiceError::OperatingPoint {
                    omega,
                    source: Box::new(err),
                },
                other => other,
            })?;

        self.state = SolverState::SolvedAt { omega, solution };
        Ok(())
    }

    fn solved(&self) -> Result<(f64, &MnaSolution)> {
        match &self.state {
            SolverState::SolvedAt { omega, solution } => Ok((*omega, solution)),
            SolverState::Unsolved => Err(SpiceError::NotSolved),
        }
    }

    fn component(&self, name: &str) -> Result<&Component> {
        self.circuit
            .get(name)
            .ok_or_else(|| SpiceError::UnknownComponent {
                name: name.to_string(),
            })
    }

    fn element_id(ids: &HashMap<String, usize>, name: &str) -> Result<usize> {
        ids.get(name).copied().ok_or_else(|| SpiceError::UnknownComponent {
            name: name.to_string(),
        })
    }

    /// `V(pos) - V(neg)` by node label.
    pub fn voltage_between(&self, pos: &str, neg: &str) -> Result<Complex64> {
        let (_, solution) = self.solved()?;
        solution.voltage(self.topology.node(pos)?, self.topology.node(neg)?)
    }

    /// Voltage of a node relative to ground.
    pub fn node_voltage(&self, label: &str) -> Result<Complex64> {
        self.voltage_between(label, self.circuit.ground())
    }

    /// Voltage across an element: first terminal minus second, or the
    /// output-to-ground voltage of an op-amp.
    pub fn voltage(&self, name: &str) -> Result<Complex64> {
        match self.component(name)? {
            Component::Passive(passive) => {
                let [a, b] = passive.nodes();
                self.voltage_between(a, b)
            }
            Component::VoltageSource(source) => {
                self.voltage_between(&source.nodes[0], &source.nodes[1])
            }
            Component::CurrentSource(source) => {
                self.voltage_between(&source.nodes[0], &source.nodes[1])
            }
            Component::OpAmp(op) => self.node_voltage(&op.output),
        }
    }

    /// Current through an element.
    ///
    /// Passive elements: `V * Y`. Voltage sources: the solved branch current,
    /// flowing into the positive terminal. Current sources: the negated
    /// source value. Op-amps: the solved output current.
    pub fn current(&self, name: &str) -> Result<Complex64> {
        let (omega, solution) = self.solved()?;
        match self.component(name)? {
            Component::Passive(passive) => {
                Ok(self.voltage(name)? * self.admittance_of(passive, omega))
            }
            Component::VoltageSource(_) => {
                solution.voltage_source_current(Self::element_id(&self.topology.voltage_source_ids, name)?)
            }
            Component::CurrentSource(source) => Ok(Complex64::new(-source.value_at(omega), 0.0)),
            Component::OpAmp(_) => {
                solution.opamp_current(Self::element_id(&self.topology.opamp_ids, name)?)
            }
        }
    }

    /// Power `V * I` of an element. Summed over all elements this is zero.
    pub fn power(&self, name: &str) -> Result<Complex64> {
        Ok(self.voltage(name)? * self.current(name)?)
    }
}
