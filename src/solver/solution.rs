//! Read-only view over a solved MNA system.

use num_complex::Complex64;

use crate::circuit::NodeIndex;
use crate::error::{Result, SpiceError};
use crate::matrix::Matrix;

/// Solution vector `x = [v; j]` with accessors that understand its layout.
///
/// Rows `0..n` are node voltages, the next `voltage_source_count` rows are
/// voltage source currents and the remaining rows are op-amp output currents.
#[derive(Debug, Clone, PartialEq)]
pub struct MnaSolution {
    values: Matrix<Complex64>,
    node_count: usize,
    voltage_source_count: usize,
}

impl MnaSolution {
    /// Wrap a solved `(n + m) x 1` column.
    pub fn new(values: Matrix<Complex64>, node_count: usize, voltage_source_count: usize) -> Self {
        Self {
            values,
            node_count,
            voltage_source_count,
        }
    }

    fn row(&self, index: usize) -> Result<Complex64> {
        self.values.get(index, 0).copied()
    }

    /// Voltage of `node` relative to ground. Ground itself is 0 V.
    pub fn node_voltage(&self, node: NodeIndex) -> Result<Complex64> {
        match node {
            NodeIndex::Ground => Ok(Complex64::new(0.0, 0.0)),
            NodeIndex::Node(i) if i < self.node_count => self.row(i),
            NodeIndex::Node(i) => Err(SpiceError::OutOfRange {
                what: "node",
                index: i,
                limit: self.node_count,
            }),
        }
    }

    /// `V(pos) - V(neg)`.
    pub fn voltage(&self, pos: NodeIndex, neg: NodeIndex) -> Result<Complex64> {
        Ok(self.node_voltage(pos)? - self.node_voltage(neg)?)
    }

    /// Current through voltage source `id`, flowing into its positive terminal.
    pub fn voltage_source_current(&self, id: usize) -> Result<Complex64> {
        if id >= self.voltage_source_count {
            return Err(SpiceError::OutOfRange {
                what: "voltage source",
                index: id,
                limit: self.voltage_source_count,
            });
        }
        self.row(self.node_count + id)
    }

    /// Output current of op-amp `id`.
    pub fn opamp_current(&self, id: usize) -> Result<Complex64> {
        let limit = self.opamp_count();
        if id >= limit {
            return Err(SpiceError::OutOfRange {
                what: "op-amp",
                index: id,
                limit,
            });
        }
        self.row(self.node_count + self.voltage_source_count + id)
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn voltage_source_count(&self) -> usize {
        self.voltage_source_count
    }

    pub fn opamp_count(&self) -> usize {
        self.values
            .height()
            .saturating_sub(self.node_count + self.voltage_source_count)
    }

    /// All unknowns in solution order.
    pub fn values(&self) -> &[Complex64] {
        self.values.as_slice()
    }

    /// The raw `(n + m) x 1` column.
    pub fn as_matrix(&self) -> &Matrix<Complex64> {
        &self.values
    }
}
