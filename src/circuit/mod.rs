//! Circuit representation and validation.
//!
//! A [`Circuit`] holds named components that reference nodes by label. It is
//! the input to the [`CircuitSolver`](crate::solver::CircuitSolver), which
//! maps labels to matrix indices.

mod graph;
mod types;
mod validate;

pub use graph::{Circuit, Element, DEFAULT_GROUND};
pub use types::*;
pub use validate::validate_circuit;
