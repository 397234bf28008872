//! Circuit validation.

use crate::error::{Result, SpiceError};

use super::Circuit;

/// Validate a circuit before simulation.
///
/// Checks:
/// - The circuit has at least one component
/// - At least one component is connected to the ground label
///
/// Floating nodes and conflicting ideal sources are left to the solver,
/// which reports them as a singular system.
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    if circuit.is_empty() {
        return Err(SpiceError::InvalidTopology {
            message: "Circuit has no components".to_string(),
        });
    }

    let grounded = circuit
        .elements()
        .iter()
        .any(|e| e.component.nodes().contains(&circuit.ground()));

    if !grounded {
        return Err(SpiceError::MissingGround {
            ground: circuit.ground().to_string(),
        });
    }

    Ok(())
}
