//! Shared Error Types
//!
//! This module defines error types raised by the platform-agnostic stampbook
//! types: value objects, page index bucketing and request validation.
//! These errors carry no transport information; the backend maps them onto
//! HTTP status codes.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - A required field is missing or malformed
//!
//! # Usage
//!
//! ```rust
//! use stampbook::shared::error::SharedError;
//!
//! let error = SharedError::validation("location.name", "must not be empty");
//! assert!(error.to_string().contains("location.name"));
//! ```
use thiserror::Error;

/// Errors shared by every layer of the stampbook
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// Dotted path of the offending field, e.g. `attractions[2].geocode.lat`
        field: String,
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the offending field for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationError { field, .. } => Some(field),
            Self::SerializationError { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Reject empty or whitespace-only text
///
/// Returns the trimmed value so callers can store it directly.
pub fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, SharedError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation(field, "must not be empty"));
    }
    Ok(trimmed)
}
