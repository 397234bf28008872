//! Ideal operational amplifier model.
//!
//! The op-amp is modeled as a voltage source of unconstrained value between
//! ground and the output node, plus the constraint V+ = V-. This assumes the
//! device runs with negative feedback. The assumption is not checked:
//! swapping the inputs of an op-amp gives the same solution.

/// An ideal operational amplifier.
#[derive(Debug, Clone, PartialEq)]
pub struct OpAmp {
    /// Non-inverting (+) input node
    pub non_inverting: String,
    /// Inverting (-) input node
    pub inverting: String,
    /// Output node
    pub output: String,
}

impl OpAmp {
    /// Create a new op-amp.
    pub fn new(
        non_inverting: impl Into<String>,
        inverting: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            non_inverting: non_inverting.into(),
            inverting: inverting.into(),
            output: output.into(),
        }
    }
}
