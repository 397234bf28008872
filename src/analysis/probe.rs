//! Probes: named measurements evaluated against a solved circuit.

use std::fmt;

use num_complex::Complex64;

use crate::error::{Result, SpiceError};
use crate::solver::CircuitSolver;

/// How a complex quantity is reduced to a single real number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComplexView {
    /// Real part at DC, magnitude otherwise
    #[default]
    Default,
    Real,
    Imaginary,
    Magnitude,
    /// Argument in radians
    Phase,
}

impl ComplexView {
    /// Parse a view suffix as written after the probe letter (`re`, `im`,
    /// `mag`, `ph`). The empty suffix is [`ComplexView::Default`].
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_lowercase().as_str() {
            "" => Some(Self::Default),
            "re" => Some(Self::Real),
            "im" => Some(Self::Imaginary),
            "mag" => Some(Self::Magnitude),
            "ph" => Some(Self::Phase),
            _ => None,
        }
    }

    /// Suffix used when rendering probe names.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Default => "",
            Self::Real => "re",
            Self::Imaginary => "im",
            Self::Magnitude => "mag",
            Self::Phase => "p",
        }
    }

    /// Reduce `value`, measured at angular frequency `omega`.
    pub fn apply(&self, value: Complex64, omega: f64) -> f64 {
        match self {
            Self::Default if omega == 0.0 => value.re,
            Self::Default | Self::Magnitude => value.norm(),
            Self::Real => value.re,
            Self::Imaginary => value.im,
            Self::Phase => value.arg(),
        }
    }
}

/// What a probe measures.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    /// Node voltage relative to ground
    NodeVoltage(String),
    /// `V(pos) - V(neg)`
    VoltageBetween(String, String),
    /// Voltage across a named element
    ElementVoltage(String),
    /// Current through a named element
    Current(String),
    /// Power of a named element
    Power(String),
}

/// A measurement plus the way its complex value is reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    pub measurement: Measurement,
    pub view: ComplexView,
}

impl Probe {
    pub fn new(measurement: Measurement, view: ComplexView) -> Self {
        Self { measurement, view }
    }

    pub fn node_voltage(node: impl Into<String>, view: ComplexView) -> Self {
        Self::new(Measurement::NodeVoltage(node.into()), view)
    }

    pub fn voltage_between(pos: impl Into<String>, neg: impl Into<String>, view: ComplexView) -> Self {
        Self::new(Measurement::VoltageBetween(pos.into(), neg.into()), view)
    }

    pub fn element_voltage(element: impl Into<String>, view: ComplexView) -> Self {
        Self::new(Measurement::ElementVoltage(element.into()), view)
    }

    pub fn current(element: impl Into<String>, view: ComplexView) -> Self {
        Self::new(Measurement::Current(element.into()), view)
    }

    pub fn power(element: impl Into<String>, view: ComplexView) -> Self {
        Self::new(Measurement::Power(element.into()), view)
    }

    /// Display name, e.g. `V(2)`, `V(2, 3)`, `Imag(R1)`.
    pub fn name(&self) -> String {
        let view = self.view.suffix();
        match &self.measurement {
            Measurement::NodeVoltage(node) => format!("V{}({})", view, node),
            Measurement::VoltageBetween(pos, neg) => format!("V{}({}, {})", view, pos, neg),
            Measurement::ElementVoltage(name) => format!("V{}({})", view, name),
            Measurement::Current(name) => format!("I{}({})", view, name),
            Measurement::Power(name) => format!("P{}({})", view, name),
        }
    }

    /// The complex value of the measurement.
    pub fn measure(&self, solver: &CircuitSolver) -> Result<Complex64> {
        match &self.measurement {
            Measurement::NodeVoltage(node) => solver.node_voltage(node),
            Measurement::VoltageBetween(pos, neg) => solver.voltage_between(pos, neg),
            Measurement::ElementVoltage(name) => solver.voltage(name),
            Measurement::Current(name) => solver.current(name),
            Measurement::Power(name) => solver.power(name),
        }
    }

    /// Measure and reduce to a real number at the solver's current frequency.
    pub fn evaluate(&self, solver: &CircuitSolver) -> Result<f64> {
        let wrap = |source: SpiceError| SpiceError::ProbeFailed {
            probe: self.name(),
            source: Box::new(source),
        };
        let omega = solver.solution_omega().ok_or_else(|| wrap(SpiceError::NotSolved))?;
        let value = self.measure(solver).map_err(wrap)?;
        Ok(self.view.apply(value, omega))
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
