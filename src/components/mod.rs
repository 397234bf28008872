//! Component models for linear circuit analysis.
//!
//! This module provides models for all supported circuit components:
//! - Passive: Resistor, Capacitor, Inductor
//! - Sources: Voltage Source, Current Source
//! - Active: ideal Op-Amp
//!
//! Every component falls into exactly one of four roles in the MNA
//! formulation, which is what the [`Component`] variants encode.

mod linear;
mod opamp;
mod sources;

pub use linear::{Capacitor, Inductor, Resistor};
pub use opamp::OpAmp;
pub use sources::{CurrentSource, VoltageSource};

use num_complex::Complex64;

/// A two-terminal element whose behavior is an admittance `Y(omega)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Passive {
    Resistor(Resistor),
    Capacitor(Capacitor),
    Inductor(Inductor),
}

impl Passive {
    /// Terminal node labels.
    pub fn nodes(&self) -> &[String; 2] {
        match self {
            Passive::Resistor(r) => &r.nodes,
            Passive::Capacitor(c) => &c.nodes,
            Passive::Inductor(l) => &l.nodes,
        }
    }

    /// Admittance at `omega`, or `None` where it is undefined (inductor at DC).
    pub fn admittance(&self, omega: f64) -> Option<Complex64> {
        match self {
            Passive::Resistor(r) => Some(r.admittance(omega)),
            Passive::Capacitor(c) => Some(c.admittance(omega)),
            Passive::Inductor(l) => l.admittance(omega),
        }
    }
}

/// A circuit component.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Passive(Passive),
    VoltageSource(VoltageSource),
    CurrentSource(CurrentSource),
    OpAmp(OpAmp),
}

impl Component {
    /// Create a resistor between `a` and `b`.
    pub fn resistor(a: impl Into<String>, b: impl Into<String>, resistance: f64) -> Self {
        Component::Passive(Passive::Resistor(Resistor::new(
            [a.into(), b.into()],
            resistance,
        )))
    }

    /// Create a capacitor between `a` and `b`.
    pub fn capacitor(a: impl Into<String>, b: impl Into<String>, capacitance: f64) -> Self {
        Component::Passive(Passive::Capacitor(Capacitor::new(
            [a.into(), b.into()],
            capacitance,
        )))
    }

    /// Create an inductor between `a` and `b`.
    pub fn inductor(a: impl Into<String>, b: impl Into<String>, inductance: f64) -> Self {
        Component::Passive(Passive::Inductor(Inductor::new(
            [a.into(), b.into()],
            inductance,
        )))
    }

    /// Create a voltage source driving `pos` relative to `neg`.
    pub fn voltage_source(
        pos: impl Into<String>,
        neg: impl Into<String>,
        dc_value: f64,
        ac_value: f64,
    ) -> Self {
        Component::VoltageSource(VoltageSource::new([pos.into(), neg.into()], dc_value, ac_value))
    }

    /// Create a current source pushing current into `pos`.
    pub fn current_source(
        pos: impl Into<String>,
        neg: impl Into<String>,
        dc_value: f64,
        ac_value: f64,
    ) -> Self {
        Component::CurrentSource(CurrentSource::new([pos.into(), neg.into()], dc_value, ac_value))
    }

    /// Create an ideal op-amp.
    pub fn opamp(
        non_inverting: impl Into<String>,
        inverting: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Component::OpAmp(OpAmp::new(non_inverting, inverting, output))
    }

    /// All node labels this component touches, in topology-mapping order.
    ///
    /// Two-terminal elements list their first then second node; op-amps list
    /// non-inverting input, inverting input, output.
    pub fn nodes(&self) -> Vec<&str> {
        match self {
            Component::Passive(p) => p.nodes().iter().map(String::as_str).collect(),
            Component::VoltageSource(v) => v.nodes.iter().map(String::as_str).collect(),
            Component::CurrentSource(i) => i.nodes.iter().map(String::as_str).collect(),
            Component::OpAmp(op) => vec![
                op.non_inverting.as_str(),
                op.inverting.as_str(),
                op.output.as_str(),
            ],
        }
    }

    /// Human-readable component kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Component::Passive(Passive::Resistor(_)) => "resistor",
            Component::Passive(Passive::Capacitor(_)) => "capacitor",
            Component::Passive(Passive::Inductor(_)) => "inductor",
            Component::VoltageSource(_) => "voltage source",
            Component::CurrentSource(_) => "current source",
            Component::OpAmp(_) => "op-amp",
        }
    }
}
