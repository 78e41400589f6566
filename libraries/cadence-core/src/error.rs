/// Core error types for Cadence
use thiserror::Error;

/// Result type alias using `CadenceError`
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Core error type for Cadence
///
/// Raised by the validation layer before anything touches storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CadenceError {
    /// A single field failed validation
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        /// Public name of the offending field
        field: &'static str,
        /// Human readable reason
        reason: String,
    },

    /// The request as a whole is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CadenceError {
    /// Create a field validation error
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
