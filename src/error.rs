//! Error types for the PvSim module simulator.
//!
//! This module provides a unified error type [`PvError`] that covers
//! all error conditions that can occur while loading module definitions,
//! validating parameters, and exporting results.
//!
//! Numerical non-convergence is deliberately absent: the solvers accept
//! their last iterate after the iteration cap.

use thiserror::Error;

/// Result type alias using [`PvError`].
pub type Result<T> = std::result::Result<T, PvError>;

/// Unified error type for all PvSim operations.
#[derive(Error, Debug)]
pub enum PvError {
    // ============ Input Validation Errors ============
    /// Structural invariant of the module parameters violated
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Diode model tag is not one of sdm, ddm, tdm, lambert
    #[error("Unknown diode model '{tag}' (expected sdm, ddm, tdm or lambert)")]
    UnknownModel { tag: String },

    /// Parameter override could not be applied
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // ============ Module Definition Errors ============
    /// Error reading a module definition file
    #[error("Failed to read module file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed module definition document
    #[error("Malformed module definition: {message}")]
    ModuleFormat { message: String },

    /// No preset with the requested reference
    #[error("No preset module with reference '{reference}'")]
    PresetNotFound { reference: String },

    // ============ Output Errors ============
    /// Error writing exported results
    #[error("Output error: {message}")]
    OutputError { message: String },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl PvError {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create an unknown model error
    pub fn unknown_model(tag: impl Into<String>) -> Self {
        Self::UnknownModel { tag: tag.into() }
    }
}

impl From<serde_json::Error> for PvError {
    fn from(err: serde_json::Error) -> Self {
        Self::ModuleFormat {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for PvError {
    fn from(err: std::io::Error) -> Self {
        Self::OutputError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = PvError::invalid_input("Isc and Voc must be positive");
        assert_eq!(err.to_string(), "Invalid input: Isc and Voc must be positive");
    }

    #[test]
    fn test_unknown_model_message() {
        let err = PvError::unknown_model("quad");
        assert!(err.to_string().contains("'quad'"));
    }
}
