//! Places Module
//!
//! Attraction recommendations for a city.
//!
//! - **`suggest`** - `AttractionSuggester` trait and the genai-backed suggester
//! - **`search`** - `PlaceSearch` trait and the Google Places client
//! - **`recommender`** - combines the two into a list of [`Place`]s
//! - **`handlers`** - `GET /travel/rec`
//!
//! [`Place`]: crate::shared::Place

/// Attraction name suggestions
pub mod suggest;

/// Place text search
pub mod search;

/// Recommendation flow
pub mod recommender;

/// HTTP handlers
pub mod handlers;

pub use handlers::travel_rec;
pub use recommender::{PlaceRecommender, RecommendError};
pub use search::{project_place, GooglePlacesClient, PlaceSearch, PlaceSearchError, RawPlace};
pub use suggest::{parse_place_names, AttractionSuggester, GenaiSuggester, SuggestionError};
