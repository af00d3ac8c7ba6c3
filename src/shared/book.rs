/**
 * Book, Profile and Place Types
 *
 * Records stored under `users/{uid}` and the read-only place projection
 * returned by the recommendation endpoint.
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::geo::Geocode;
use crate::shared::pages::PageIndex;

/// Identifier the store assigns to a new book
pub type BookId = Uuid;

/// Opaque user identifier issued by the identity provider
pub type UserId = String;

/// A user's trip book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Public URL of the cover illustration
    pub cover: String,
    /// `None` until the book is seeded or stamped for the first time
    #[serde(default)]
    pub pages: Option<PageIndex>,
    pub city: String,
    pub state: String,
}

/// Book listing entry, without page contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: BookId,
    pub city: String,
    pub state: String,
    pub cover: String,
}

impl BookSummary {
    pub fn of(id: BookId, book: &Book) -> Self {
        Self {
            id,
            city: book.city.clone(),
            state: book.state.clone(),
            cover: book.cover.clone(),
        }
    }
}

/// Profile document stored at `users/{uid}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.bio.is_none() && self.profile_photo.is_none()
    }

    /// Apply the provided fields onto `profile`
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(bio) = &self.bio {
            profile.bio = Some(bio.clone());
        }
        if let Some(photo) = &self.profile_photo {
            profile.profile_photo = Some(photo.clone());
        }
    }
}

/// A recommended attraction resolved through place search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub display_name: String,
    pub google_maps_uri: String,
    pub geocode: Geocode,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub photo_uri: Option<String>,
}
