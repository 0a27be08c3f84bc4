//! Error types for the dcspice solver.
//!
//! This module provides a unified error type [`SpiceError`] that covers
//! all error conditions that can occur while reading a netlist, parsing it,
//! validating the circuit, and solving the MNA system.

use thiserror::Error;

/// Result type alias using [`SpiceError`].
pub type Result<T> = std::result::Result<T, SpiceError>;

/// Unified error type for all dcspice operations.
#[derive(Error, Debug)]
pub enum SpiceError {
    // ============ Input Errors ============
    /// No netlist path was given
    #[error("Please give the name of a valid SPICE file as input")]
    MissingInput,

    /// Netlist file could not be opened or read
    #[error("Failed to read circuit file '{path}': {source}")]
    NotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ Netlist Parsing Errors ============
    /// Circuit block markers missing/out of order, or a component line is
    /// structurally wrong. `line` is 0 when the problem is not tied to a line.
    #[error("Malformed circuit file (line {line}): {message}")]
    MalformedInput { line: usize, message: String },

    /// Component kind is not one of R, I, V
    #[error("Unsupported element '{name}' at line {line}: only V, I, R elements are permitted")]
    UnsupportedElement { name: String, line: usize },

    /// Duplicate component name (only raised in strict mode)
    #[error("Duplicate component name '{name}' at line {line}")]
    DuplicateComponent { name: String, line: usize },

    // ============ Circuit Validation Errors ============
    /// Component magnitude cannot be stamped
    #[error("Invalid value for component '{component}': {message}")]
    InvalidValue { component: String, message: String },

    // ============ Solve Errors ============
    /// System matrix is singular
    #[error("circuit error: no solution")]
    NoSolution,
}

impl SpiceError {
    /// Create a malformed input error
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Whether the error was raised before any matrix work happened.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, SpiceError::NoSolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_solution_message() {
        assert_eq!(SpiceError::NoSolution.to_string(), "circuit error: no solution");
    }

    #[test]
    fn test_unsupported_element_message() {
        let err = SpiceError::UnsupportedElement {
            name: "C1".to_string(),
            line: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("C1"));
        assert!(msg.contains("only V, I, R"));
    }

    #[test]
    fn test_not_found_exposes_source() {
        use std::error::Error as _;

        let err = SpiceError::NotFound {
            path: "missing.ckt".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.source().is_some());
        assert!(err.is_input_error());
        assert!(SpiceError::MissingInput.is_input_error());
        assert!(SpiceError::malformed(2, "too few fields").is_input_error());
        assert!(SpiceError::invalid_value("R1", "zero").is_input_error());
        assert!(!SpiceError::NoSolution.is_input_error());
    }
}
