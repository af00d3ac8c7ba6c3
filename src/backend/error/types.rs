/**
 * Backend Error Types
 *
 * This module defines the error taxonomy every handler and service returns.
 * Collaborator-specific errors (store, identity, storage, generation,
 * search) are converted into these variants in `conversion.rs`, so a
 * client always receives a tagged reason rather than raw upstream text.
 *
 * # Error Categories
 *
 * - `Validation` - a required field is missing or malformed (400)
 * - `NotFound` - unknown user, book or profile on a read (404)
 * - `CollaboratorUnavailable` - an external service failed (503)
 * - `Conflict` - the request collides with existing data (409)
 * - `StateError` / `SerializationError` - internal failures (500)
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use stampbook::backend::error::BackendError;
///
/// let err = BackendError::not_found("book 42");
/// assert_eq!(err.kind(), "not_found");
///
/// let err = BackendError::collaborator("places", "connection reset");
/// assert_eq!(err.status_code().as_u16(), 503);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., malformed multipart body)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// The addressed user, book or profile does not exist
    #[error("Not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// An external collaborator failed or is not configured
    #[error("{collaborator} unavailable: {message}")]
    CollaboratorUnavailable {
        /// Which collaborator failed (store, identity, storage, ...)
        collaborator: &'static str,
        /// Short client-facing description
        message: String,
    },

    /// The request conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Startup or wiring failure (database unreachable, bad migration)
    #[error("State error: {message}")]
    StateError { message: String },

    /// Validation or serialization error from the shared types
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a validation error for `field`
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SharedError(SharedError::validation(field, message))
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn collaborator(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::CollaboratorUnavailable {
            collaborator,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a new state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::StateError {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::CollaboratorUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::StateError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable tag for the failure reason
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HandlerError { .. } => "bad_request",
            Self::NotFound { .. } => "not_found",
            Self::CollaboratorUnavailable { .. } => "collaborator_unavailable",
            Self::Conflict { .. } => "conflict",
            Self::SharedError(SharedError::ValidationError { .. }) => "validation",
            Self::StateError { .. } | Self::SharedError(_) | Self::SerializationError(_) => "internal",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::StateError { message } | Self::Conflict { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_keeps_status() {
        let error = BackendError::handler(StatusCode::UNAUTHORIZED, "email or password is incorrect");
        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(error.kind(), "bad_request");
        assert_eq!(error.message(), "email or password is incorrect");
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(BackendError::not_found("book").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            BackendError::collaborator("places", "timeout").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(BackendError::conflict("taken").status_code(), StatusCode::CONFLICT);
        assert_eq!(BackendError::state("boom").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            BackendError::validation("city", "must not be empty").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(BackendError::validation("city", "empty").kind(), "validation");
        assert_eq!(BackendError::not_found("book").kind(), "not_found");
        assert_eq!(BackendError::collaborator("identity", "down").kind(), "collaborator_unavailable");
        assert_eq!(BackendError::conflict("dup").kind(), "conflict");
        assert_eq!(BackendError::state("oops").kind(), "internal");
    }

    #[test]
    fn test_from_shared_error() {
        let backend_error: BackendError = SharedError::validation("field", "message").into();
        assert!(matches!(backend_error, BackendError::SharedError(_)));
        assert!(backend_error.message().contains("field"));
    }

    #[test]
    fn test_collaborator_message_names_collaborator() {
        let error = BackendError::collaborator("image generation", "not configured");
        assert_eq!(error.message(), "image generation unavailable: not configured");
    }
}
