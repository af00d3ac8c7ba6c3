/**
 * Create Account Handler
 *
 * POST /auth/create
 *
 * # Process
 *
 * 1. Create the account through the identity provider
 * 2. Write the profile document under `users/{uid}`
 * 3. If the profile write fails, delete the account again so a retry with
 *    the same email is not rejected as a duplicate
 *
 * # Errors
 *
 * * `400 Bad Request` - email without '@' or password shorter than 6 chars
 * * `409 Conflict` - an account already exists for this email
 * * `503 Service Unavailable` - identity provider or store failed
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{CreateAccountRequest, CreateAccountResponse};
use crate::backend::auth::identity::NewAccount;
use crate::backend::error::BackendError;
use crate::backend::server::state::{SharedIdentity, SharedStore};

/// Create account handler
///
/// # Example Request
///
/// ```http
/// POST /auth/create HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "ana@example.com",
///   "password": "secret12",
///   "display_name": "Ana"
/// }
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "message": "User created successfully",
///   "user_id": "3f2b0c9e8d7a4b6c9e1f0a2b3c4d5e6f",
///   "email": "ana@example.com"
/// }
/// ```
pub async fn create_account(
    State(identity): State<SharedIdentity>,
    State(store): State<SharedStore>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<Json<CreateAccountResponse>, BackendError> {
    tracing::info!("Create account request for: {}", request.email);

    let account = NewAccount {
        email: request.email.clone(),
        password: request.password.clone(),
        display_name: request.display_name.clone(),
    };
    let user_id = identity.create_account(&account).await?;

    let profile = request.profile();
    if let Err(e) = store.put_profile(&user_id, &profile).await {
        tracing::error!("Failed to write profile for {}: {}", user_id, e);
        if let Err(rollback) = identity.delete_account(&user_id).await {
            tracing::error!("Failed to roll back account {}: {}", user_id, rollback);
        }
        return Err(e.into());
    }

    tracing::info!("Account created: {} ({})", user_id, profile.email);

    Ok(Json(CreateAccountResponse {
        message: "User created successfully".to_string(),
        user_id,
        email: profile.email,
    }))
}
