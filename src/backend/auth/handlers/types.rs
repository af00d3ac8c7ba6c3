/**
 * Account Handler Types
 *
 * Request and response bodies for the account endpoints.
 */

use serde::{Deserialize, Serialize};

use crate::shared::{ProfileUpdate, UserProfile};

/// Create account request
#[derive(Deserialize, Serialize, Debug)]
pub struct CreateAccountRequest {
    pub email: String,
    /// Plain password (hashed by the identity provider)
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
}

impl CreateAccountRequest {
    /// Profile document written beside the user's books
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            email: self.email.trim().to_ascii_lowercase(),
            display_name: self.display_name.clone(),
            bio: None,
            profile_photo: self.profile_photo.clone(),
        }
    }
}

/// Returned by account creation
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateAccountResponse {
    pub message: String,
    pub user_id: String,
    pub email: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub user_id: String,
    pub email: String,
}

/// `?uid=` query of the update endpoint
#[derive(Deserialize, Debug)]
pub struct UidQuery {
    pub uid: String,
}

/// Update account request; absent fields are left untouched
pub type UpdateAccountRequest = ProfileUpdate;

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateAccountResponse {
    pub message: String,
    pub user_id: String,
    pub profile: UserProfile,
}
