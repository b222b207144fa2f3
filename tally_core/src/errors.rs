//! # Error Types
//!
//! Structured error types for tally_core.
//!
//! The calculator engine itself never returns these: malformed key sequences
//! are silent no-ops and arithmetic failures put the engine into its sticky
//! `Error` display state. `CalcError` covers everything around the engine:
//! parsing operator and function identifiers, and reading or writing the
//! key-value store that backs history and UI preferences.
//!
//! ## Example
//!
//! ```rust
//! use tally_core::errors::{CalcError, CalcResult};
//!
//! fn parse_digit(token: &str) -> CalcResult<char> {
//!     match token.chars().next() {
//!         Some(c) if token.len() == 1 && c.is_ascii_digit() => Ok(c),
//!         _ => Err(CalcError::invalid_input("digit", token, "Expected a single digit")),
//!     }
//! }
//!
//! assert!(parse_digit("7").is_ok());
//! assert_eq!(parse_digit("x").unwrap_err().error_code(), "INVALID_INPUT");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for tally_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for everything outside the engine's state machine.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (wrong shape, out of range, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// An operator, function or action name was not recognized
    #[error("Unknown {kind}: '{name}'")]
    UnknownIdentifier { kind: String, name: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Store is locked by another process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownIdentifier error
    pub fn unknown_identifier(kind: impl Into<String>, name: impl Into<String>) -> Self {
        CalcError::UnknownIdentifier {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError from any displayable cause
    pub fn serialization(reason: impl std::fmt::Display) -> Self {
        CalcError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownIdentifier { .. } => "UNKNOWN_IDENTIFIER",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::unknown_identifier("operator", "%");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"UnknownIdentifier\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::unknown_identifier("function", "cbrt").error_code(), "UNKNOWN_IDENTIFIER");
        assert_eq!(CalcError::serialization("bad json").error_code(), "SERIALIZATION_ERROR");
        assert_eq!(CalcError::file_locked("a", "b", "c").error_code(), "FILE_LOCKED");
    }

    #[test]
    fn test_only_lock_errors_are_recoverable() {
        assert!(CalcError::file_locked("store.json", "pid 42", "now").is_recoverable());
        assert!(!CalcError::file_error("open", "store.json", "denied").is_recoverable());
    }

    #[test]
    fn test_display_message() {
        let error = CalcError::unknown_identifier("operator", "%");
        assert_eq!(error.to_string(), "Unknown operator: '%'");
    }
}
