//! Linear passive components: Resistor, Capacitor, Inductor.

use num_complex::Complex64;

/// An ideal resistor.
#[derive(Debug, Clone, PartialEq)]
pub struct Resistor {
    pub nodes: [String; 2],
    /// Resistance in ohms
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(nodes: [String; 2], resistance: f64) -> Self {
        Self { nodes, resistance }
    }

    /// Admittance `1/R`, independent of frequency.
    pub fn admittance(&self, _omega: f64) -> Complex64 {
        Complex64::new(1.0 / self.resistance, 0.0)
    }
}

/// An ideal capacitor.
///
/// At DC the admittance is zero, so a capacitor is an open circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct Capacitor {
    pub nodes: [String; 2],
    /// Capacitance in farads
    pub capacitance: f64,
}

impl Capacitor {
    /// Create a new capacitor.
    pub fn new(nodes: [String; 2], capacitance: f64) -> Self {
        Self { nodes, capacitance }
    }

    /// Admittance `jωC`.
    pub fn admittance(&self, omega: f64) -> Complex64 {
        Complex64::new(0.0, omega * self.capacitance)
    }
}

/// An ideal inductor.
///
/// The admittance `1/(jωL)` is undefined at `omega = 0`. The circuit solver
/// substitutes a small stand-in resistance there (see
/// [`SolverConfig::dc_inductor_resistance`](crate::solver::SolverConfig)).
#[derive(Debug, Clone, PartialEq)]
pub struct Inductor {
    pub nodes: [String; 2],
    /// Inductance in henries
    pub inductance: f64,
}

impl Inductor {
    /// Create a new inductor.
    pub fn new(nodes: [String; 2], inductance: f64) -> Self {
        Self { nodes, inductance }
    }

    /// Admittance `1/(jωL)`, or `None` at DC.
    pub fn admittance(&self, omega: f64) -> Option<Complex64> {
        if omega == 0.0 {
            return None;
        }
        Some(Complex64::new(0.0, omega * self.inductance).inv())
    }
}
