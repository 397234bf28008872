//! Error types for the linspice circuit solver.
//!
//! This module provides a unified error type [`SpiceError`] that covers
//! all error conditions that can occur during matrix assembly, solving,
//! measurement, netlist parsing, and frequency sweeps.

use thiserror::Error;

/// Result type alias using [`SpiceError`].
pub type Result<T> = std::result::Result<T, SpiceError>;

/// Unified error type for all linspice operations.
#[derive(Error, Debug)]
pub enum SpiceError {
    // ============ Matrix / Solver Errors ============
    /// Element access outside of the matrix
    #[error("Index ({row}, {col}) outside of {height}x{width} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    /// Operands of a matrix operation have incompatible shapes
    #[error("Dimension mismatch in {operation}: {left} vs {right}")]
    DimensionMismatch {
        operation: &'static str,
        left: String,
        right: String,
    },

    /// Gaussian elimination found no usable pivot
    #[error("Singular matrix (no pivot in column {column}) - circuit may have a floating node, conflicting ideal sources or no ground")]
    SingularMatrix { column: usize },

    /// Query against an index the solution does not contain
    #[error("{what} index {index} out of range (limit {limit})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        limit: usize,
    },

    // ============ Circuit / Measurement Errors ============
    /// Node label not present in the circuit
    #[error("Node '{node}' not found in circuit")]
    UnknownNode { node: String },

    /// Component name not present in the circuit
    #[error("Component '{name}' not found in circuit")]
    UnknownComponent { name: String },

    /// Duplicate component name
    #[error("Duplicate component name '{name}'")]
    DuplicateComponent { name: String },

    /// Measurement requested before a successful solve
    #[error("Circuit has not been solved")]
    NotSolved,

    /// No element touches the ground label
    #[error("Circuit has no element connected to ground node '{ground}'")]
    MissingGround { ground: String },

    /// Invalid circuit topology
    #[error("Invalid circuit topology: {message}")]
    InvalidTopology { message: String },

    /// Operating point could not be computed at a given frequency
    #[error("Could not compute operating point at omega = {omega} rad/s: {source}")]
    OperatingPoint {
        omega: f64,
        #[source]
        source: Box<SpiceError>,
    },

    // ============ Netlist Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Invalid component definition
    #[error("Invalid component '{name}' at line {line}: {message}")]
    InvalidComponent {
        name: String,
        line: usize,
        message: String,
    },

    /// Unknown component type
    #[error("Unknown component type '{component_type}' at line {line}")]
    UnknownComponentType { component_type: String, line: usize },

    /// Malformed analysis or output command
    #[error("Invalid command '{command}' at line {line}: {message}")]
    InvalidCommand {
        command: String,
        line: usize,
        message: String,
    },

    // ============ Analysis Errors ============
    /// A probe could not be evaluated
    #[error("Probing '{probe}' failed: {source}")]
    ProbeFailed {
        probe: String,
        #[source]
        source: Box<SpiceError>,
    },

    /// A frequency sweep point failed
    #[error("Could not perform step {step} ({frequency} Hz) of AC analysis: {source}")]
    SweepStep {
        step: usize,
        frequency: f64,
        #[source]
        source: Box<SpiceError>,
    },

    // ============ I/O Errors ============
    /// Error reading a netlist file
    #[error("Failed to read netlist '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a report
    #[error("Failed to write output: {source}")]
    OutputError {
        #[source]
        source: std::io::Error,
    },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl SpiceError {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    ) -> Self {
        Self::DimensionMismatch {
            operation,
            left: format!("{}x{}", left.0, left.1),
            right: format!("{}x{}", right.0, right.1),
        }
    }

    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid component error
    pub fn invalid_component(name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidComponent {
            name: name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an invalid command error
    pub fn invalid_command(command: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidCommand {
            command: command.into(),
            line,
            message: message.into(),
        }
    }

    /// Check whether this error (or the error it wraps) is a singular system.
    pub fn is_singular(&self) -> bool {
        match self {
            Self::SingularMatrix { .. } => true,
            Self::OperatingPoint { source, .. }
            | Self::ProbeFailed { source, .. }
            | Self::SweepStep { source, .. } => source.is_singular(),
            _ => false,
        }
    }
}
