/**
 * Recommendation Handler
 *
 * GET /travel/rec?city=&state=&keywords=
 */

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use super::recommender::PlaceRecommender;
use crate::backend::error::BackendError;
use crate::shared::Place;

#[derive(Debug, Deserialize)]
pub struct TravelRecQuery {
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub keywords: Option<String>,
    /// Sent by clients; recommendations are not personalized
    #[serde(default)]
    pub uid: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TravelRecResponse {
    pub places: Vec<Place>,
}

pub async fn travel_rec(
    State(recommender): State<PlaceRecommender>,
    Query(query): Query<TravelRecQuery>,
) -> Result<Json<TravelRecResponse>, BackendError> {
    tracing::info!(
        "Recommendations for {}, {} (keywords: {:?}, uid: {:?})",
        query.city,
        query.state,
        query.keywords,
        query.uid
    );

    let places = recommender
        .recommend(&query.city, &query.state, query.keywords.as_deref())
        .await?;

    Ok(Json(TravelRecResponse { places }))
}
