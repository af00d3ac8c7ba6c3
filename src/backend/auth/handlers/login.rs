/**
 * Login Handler
 *
 * POST /auth/login
 *
 * Unknown emails and wrong passwords produce the same 401 so the endpoint
 * cannot be used to discover registered addresses.
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse};
use crate::backend::auth::identity::IdentityError;
use crate::backend::error::BackendError;
use crate::backend::server::state::SharedIdentity;

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - unknown email or wrong password
/// * `503 Service Unavailable` - identity provider failed
pub async fn login(
    State(identity): State<SharedIdentity>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, BackendError> {
    tracing::info!("Login request for: {}", request.email);

    let user_id = match identity.authenticate(&request.email, &request.password).await {
        Ok(id) => id,
        Err(IdentityError::InvalidCredentials(_)) => {
            tracing::warn!("Invalid credentials for: {}", request.email);
            return Err(BackendError::handler(
                StatusCode::UNAUTHORIZED,
                "email or password is incorrect",
            ));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(LoginResponse {
        user_id,
        email: request.email.trim().to_ascii_lowercase(),
    }))
}
