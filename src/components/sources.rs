//! Voltage and current sources.

/// An ideal independent voltage source.
///
/// Voltage sources require an extra row/column in the MNA matrix for the
/// branch current. The source enforces: V+ - V- = value
#[derive(Debug, Clone, PartialEq)]
pub struct VoltageSource {
    pub nodes: [String; 2], // [positive, negative]
    /// Value used for DC analysis (omega = 0)
    pub dc_value: f64,
    /// Amplitude used for AC analysis (omega > 0)
    pub ac_value: f64,
}

impl VoltageSource {
    /// Create a new voltage source.
    pub fn new(nodes: [String; 2], dc_value: f64, ac_value: f64) -> Self {
        Self {
            nodes,
            dc_value,
            ac_value,
        }
    }

    /// Excitation at the given angular frequency.
    pub fn value_at(&self, omega: f64) -> f64 {
        if omega == 0.0 {
            self.dc_value
        } else {
            self.ac_value
        }
    }
}

/// An ideal independent current source.
///
/// Current sources add directly to the RHS vector of the MNA equations.
/// A positive value pushes current out of the source into the positive node.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSource {
    pub nodes: [String; 2], // [positive, negative]
    pub dc_value: f64,
    pub ac_value: f64,
}

impl CurrentSource {
    /// Create a new current source.
    pub fn new(nodes: [String; 2], dc_value: f64, ac_value: f64) -> Self {
        Self {
            nodes,
            dc_value,
            ac_value,
        }
    }

    /// Excitation at the given angular frequency.
    pub fn value_at(&self, omega: f64) -> f64 {
        if omega == 0.0 {
            self.dc_value
        } else {
            self.ac_value
        }
    }
}
