//! Shared Error Types
//!
//! Errors produced while validating client input, before a request reaches
//! the service layer.
//!
//! # Error Categories
//!
//! - `Invalid` - A field failed a validation rule
//! - `Malformed` - The request body or query string could not be decoded
//!
//! # Usage
//!
//! ```rust
//! use conduit::shared::error::InputError;
//!
//! let error = InputError::invalid("title", "can't be blank");
//! assert_eq!(error.to_string(), "title can't be blank");
//! ```
use thiserror::Error;

/// Client input errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A single field failed validation
    #[error("{field} {message}")]
    Invalid {
        /// The field that failed validation
        field: String,
        /// Human-readable reason, phrased to follow the field name
        message: String,
    },

    /// The payload could not be decoded at all
    #[error("malformed request: {message}")]
    Malformed {
        /// Decoder message
        message: String,
    },
}

impl InputError {
    /// Create a new field validation error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new decoding error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for InputError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}
