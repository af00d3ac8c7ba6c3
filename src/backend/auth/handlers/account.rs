/**
 * Profile Handlers
 *
 * - `GET /account/{uid}` - read the profile document
 * - `POST /account/update?uid=` - merge `bio` / `profile_photo`
 */

use axum::{
    extract::{Path, Query, State},
    response::Json,
};

use crate::backend::auth::handlers::types::{UidQuery, UpdateAccountRequest, UpdateAccountResponse};
use crate::backend::error::BackendError;
use crate::backend::server::state::SharedStore;
use crate::shared::{require_text, UserProfile};

pub async fn get_account(
    State(store): State<SharedStore>,
    Path(uid): Path<String>,
) -> Result<Json<UserProfile>, BackendError> {
    let profile = store.get_profile(&uid).await?;
    Ok(Json(profile))
}

/// Update account handler
///
/// An empty body is accepted and returns the profile unchanged.
pub async fn update_account(
    State(store): State<SharedStore>,
    Query(query): Query<UidQuery>,
    Json(update): Json<UpdateAccountRequest>,
) -> Result<Json<UpdateAccountResponse>, BackendError> {
    let uid = require_text("uid", &query.uid)?;

    let profile = if update.is_empty() {
        store.get_profile(uid).await?
    } else {
        tracing::debug!("Updating profile for {}", uid);
        store.update_profile(uid, &update).await?
    };

    Ok(Json(UpdateAccountResponse {
        message: "User updated successfully".to_string(),
        user_id: uid.to_string(),
        profile,
    }))
}
