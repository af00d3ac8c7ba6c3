/**
 * Error Conversion
 *
 * Collaborator errors are converted into [`BackendError`] here. The raw
 * upstream error is logged at the conversion point; the client only sees
 * the tagged reason and a short message.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "book 8c7e... not found",
 *   "kind": "not_found",
 *   "status": 404
 * }
 * ```
 */

use axum::response::{IntoResponse, Json, Response};

use crate::backend::assets::{AssetError, GenerationError, ObjectStoreError};
use crate::backend::auth::IdentityError;
use crate::backend::error::types::BackendError;
use crate::backend::places::{PlaceSearchError, RecommendError, SuggestionError};
use crate::backend::store::StoreError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", status.as_u16(), self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status.as_u16(), self);
        }

        let body = serde_json::json!({
            "error": self.message(),
            "kind": self.kind(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for BackendError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::BookNotFound { book_id, .. } => Self::not_found(format!("book {book_id}")),
            StoreError::ProfileNotFound(user_id) => Self::not_found(format!("profile for user {user_id}")),
            StoreError::Invalid(shared) => Self::SharedError(shared),
            StoreError::Database(e) => {
                tracing::error!("Store database error: {:?}", e);
                Self::collaborator("store", "database request failed")
            }
            StoreError::Encoding(e) => Self::SerializationError(e),
        }
    }
}

impl From<IdentityError> for BackendError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::DuplicateAccount(email) => Self::conflict(format!("an account already exists for {email}")),
            IdentityError::InvalidCredentials(message) => Self::validation("credentials", message),
            IdentityError::Unavailable(message) => {
                tracing::error!("Identity provider error: {}", message);
                Self::collaborator("identity", "account service unavailable")
            }
        }
    }
}

impl From<ObjectStoreError> for BackendError {
    fn from(err: ObjectStoreError) -> Self {
        match err {
            ObjectStoreError::InvalidKey(key) => Self::state(format!("invalid object key {key}")),
            ObjectStoreError::Io(e) => {
                tracing::error!("Object storage error: {:?}", e);
                Self::collaborator("object storage", "failed to store file")
            }
        }
    }
}

impl From<GenerationError> for BackendError {
    fn from(err: GenerationError) -> Self {
        tracing::error!("Image generation error: {}", err);
        Self::collaborator("image generation", "image service request failed")
    }
}

impl From<AssetError> for BackendError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::GeneratorUnavailable => Self::collaborator("image generation", "not configured"),
            AssetError::EmptyUpload(field) => Self::validation(field, "must not be empty"),
            AssetError::Generation(e) => e.into(),
            AssetError::Storage(e) => e.into(),
        }
    }
}

impl From<SuggestionError> for BackendError {
    fn from(err: SuggestionError) -> Self {
        tracing::error!("Attraction suggestion error: {}", err);
        Self::collaborator("attraction suggestions", "suggestion service request failed")
    }
}

impl From<PlaceSearchError> for BackendError {
    fn from(err: PlaceSearchError) -> Self {
        tracing::error!("Place search error: {}", err);
        Self::collaborator("place search", "place search request failed")
    }
}

impl From<RecommendError> for BackendError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::Invalid(shared) => Self::SharedError(shared),
            RecommendError::SearchUnavailable => Self::collaborator("place search", "not configured"),
            RecommendError::Suggestion(e) => e.into(),
        }
    }
}
