/**
 * Place Recommender
 *
 * 1. Ask the suggester for attraction names in "{city}, {state}"
 * 2. Search every name as "{name} {city}, {state}" concurrently
 * 3. Keep the first result of each search that projects to a [`Place`]
 *
 * A failed or empty search drops that one attraction. A suggester failure
 * fails the whole request. Results keep the suggestion order.
 */

use std::sync::Arc;

use futures_util::future::join_all;
use thiserror::Error;

use super::search::{project_place, PlaceSearch};
use super::suggest::{AttractionSuggester, SuggestionError};
use crate::shared::{require_text, Place, SharedError};

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error(transparent)]
    Invalid(#[from] SharedError),

    #[error("place search is not configured")]
    SearchUnavailable,

    #[error(transparent)]
    Suggestion(#[from] SuggestionError),
}

#[derive(Clone)]
pub struct PlaceRecommender {
    suggester: Arc<dyn AttractionSuggester>,
    search: Option<Arc<dyn PlaceSearch>>,
    count: usize,
}

impl PlaceRecommender {
    pub fn new(suggester: Arc<dyn AttractionSuggester>, search: Option<Arc<dyn PlaceSearch>>, count: usize) -> Self {
        Self { suggester, search, count }
    }

    pub async fn recommend(&self, city: &str, state: &str, keywords: Option<&str>) -> Result<Vec<Place>, RecommendError> {
        let city = require_text("city", city)?;
        let state = require_text("state", state)?;
        let search = self.search.as_ref().ok_or(RecommendError::SearchUnavailable)?;

        let names = self
            .suggester
            .suggest(&format!("{city}, {state}"), self.count, keywords)
            .await?;
        tracing::info!(city, state, suggestions = names.len(), "searching suggested attractions");

        let searches = names.iter().map(|name| {
            let query = format!("{name} {city}, {state}");
            async move {
                match search.search_text(&query).await {
                    Ok(raw) => {
                        let place = raw.first().and_then(project_place);
                        if place.is_none() {
                            tracing::debug!(%query, "no usable place found");
                        }
                        place
                    }
                    Err(e) => {
                        tracing::warn!(%query, "place search failed: {}", e);
                        None
                    }
                }
            }
        });

        Ok(join_all(searches).await.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::places::search::{LatLng, LocalizedText, PlaceSearchError, RawPlace};
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    struct FixedSuggester(Vec<&'static str>);

    #[async_trait]
    impl AttractionSuggester for FixedSuggester {
        async fn suggest(&self, _location: &str, count: usize, _keywords: Option<&str>) -> Result<Vec<String>, SuggestionError> {
            Ok(self.0.iter().take(count).map(|s| s.to_string()).collect())
        }
    }

    struct DownSuggester;

    #[async_trait]
    impl AttractionSuggester for DownSuggester {
        async fn suggest(&self, _: &str, _: usize, _: Option<&str>) -> Result<Vec<String>, SuggestionError> {
            Err(SuggestionError::Model("rate limited".to_string()))
        }
    }

    /// Resolves queries starting with a known name; "Broken" errors out
    struct CatalogSearch;

    #[async_trait]
    impl PlaceSearch for CatalogSearch {
        async fn search_text(&self, query: &str) -> Result<Vec<RawPlace>, PlaceSearchError> {
            if query.starts_with("Broken") {
                return Err(PlaceSearchError::Status { status: 500, body: String::new() });
            }
            if query.starts_with("Nowhere") {
                return Ok(Vec::new());
            }
            let name = query.split(" Austin").next().unwrap_or(query);
            Ok(vec![RawPlace {
                display_name: Some(LocalizedText { text: Some(name.to_string()), language_code: None }),
                google_maps_uri: Some(format!("https://maps.example/{name}")),
                location: Some(LatLng { latitude: Some(30.0), longitude: Some(-97.0) }),
                ..RawPlace::default()
            }])
        }
    }

    fn recommender(suggester: Arc<dyn AttractionSuggester>) -> PlaceRecommender {
        PlaceRecommender::new(suggester, Some(Arc::new(CatalogSearch)), 5)
    }

    #[tokio::test]
    async fn test_failed_searches_are_skipped_in_order() {
        let recommender = recommender(Arc::new(FixedSuggester(vec![
            "Zilker Park",
            "Broken Bridge",
            "Nowhere Cafe",
            "Mount Bonnell",
        ])));

        let places = recommender.recommend("Austin", "TX", None).await.unwrap();
        let names: Vec<_> = places.iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, vec!["Zilker Park", "Mount Bonnell"]);
    }

    #[tokio::test]
    async fn test_suggester_failure_fails_request() {
        let recommender = recommender(Arc::new(DownSuggester));
        assert_matches!(
            recommender.recommend("Austin", "TX", None).await,
            Err(RecommendError::Suggestion(_))
        );
    }

    #[tokio::test]
    async fn test_missing_search_client() {
        let recommender = PlaceRecommender::new(Arc::new(FixedSuggester(vec!["Alamo"])), None, 5);
        assert_matches!(
            recommender.recommend("Austin", "TX", None).await,
            Err(RecommendError::SearchUnavailable)
        );
    }

    #[tokio::test]
    async fn test_blank_city_rejected() {
        let recommender = recommender(Arc::new(FixedSuggester(vec!["Alamo"])));
        assert_matches!(
            recommender.recommend(" ", "TX", None).await,
            Err(RecommendError::Invalid(_))
        );
    }
}
