//! Parsed netlist representation.

use crate::analysis::{AcSweep, Probe};
use crate::circuit::Circuit;

/// Everything a SPICE-style netlist describes.
#[derive(Debug, Clone)]
pub struct Netlist {
    /// First line of the file
    pub title: String,
    /// Elements in declaration order
    pub circuit: Circuit,
    /// `.ac` sweep, if requested; otherwise a DC operating point is computed
    pub ac: Option<AcSweep>,
    /// `.print` probes in the order written
    pub probes: Vec<Probe>,
}

impl Netlist {
    /// Create an empty netlist with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            circuit: Circuit::new(),
            ac: None,
            probes: Vec::new(),
        }
    }
}
