//! # Linspice Core
//!
//! A linear circuit solver based on Modified Nodal Analysis.
//!
//! This library provides:
//! - A dense complex matrix and Gaussian elimination with partial pivoting
//! - MNA system assembly for resistors, capacitors, inductors, independent
//!   sources and ideal op-amps
//! - A stateful solver that maps named circuits onto the MNA system and
//!   answers voltage, current and power queries
//! - DC operating point and AC sweep analyses with probes
//! - Readers for a SPICE-like netlist and a legacy resistor netlist
//!
//! ## Architecture
//!
//! - [`matrix`] - Dense matrix container
//! - [`circuit`] - Named element collection and validation
//! - [`components`] - Element models and their admittances
//! - [`solver`] - MNA assembly, elimination and the circuit solver
//! - [`analysis`] - Probes, operating point and frequency sweeps
//! - [`netlist`] - Netlist readers
//! - [`report`] - Plain-text output
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! linspice filter.cir
//! linspice --legacy divider.txt -o report.txt
//! ```
//!
//! ### Library
//!
//! ```
//! use linspice_core::{netlist, CircuitSolver};
//!
//! let netlist = netlist::parse("divider\nV1 1 0 10\nR1 1 2 1k\nR2 2 0 1k\n")?;
//! let mut solver = CircuitSolver::new(netlist.circuit);
//! solver.solve(0.0)?;
//! assert!((solver.node_voltage("2")?.re - 5.0).abs() < 1e-9);
//! # Ok::<(), linspice_core::SpiceError>(())
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmNetlistSim } from 'linspice_core';
//!
//! const sim = new WasmNetlistSim(netlistText);
//! console.log(sim.run());
//! ```
//!
//! ## Solution Method
//!
//! For a circuit with `n` non-ground nodes, `m` voltage sources and `k`
//! op-amps, the solver assembles `A x = z` with `A` of size `(n+m+k)²`:
//!
//! 1. Stamp element admittances at angular frequency `omega` into `G`
//! 2. Stamp source and op-amp incidences into `B` and `C`
//! 3. Solve `[A | z]` by Gaussian elimination with partial pivoting
//!
//! At `omega = 0` capacitors are open and inductors are replaced by a tiny
//! resistance.

pub mod analysis;
pub mod circuit;
pub mod components;
pub mod error;
pub mod matrix;
pub mod netlist;
pub mod report;
pub mod solver;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use components::Component;
pub use error::{Result, SpiceError};
pub use matrix::Matrix;
pub use solver::{CircuitSolver, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmNetlistSim;
