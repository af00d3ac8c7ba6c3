/**
 * Place Search
 *
 * Resolves a free-text query ("Zilker Park Austin, TX") to place records
 * through the Google Places Text Search API.
 *
 * Every field of a raw record is optional; `project_place` decides whether
 * a record carries enough to become a [`Place`].
 */

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::{AppConfig, Geocode, Place};

/// Fields requested from the Places API
pub const FIELD_MASK: &str =
    "places.displayName,places.googleMapsUri,places.location,places.formattedAddress,places.rating,places.photos";

#[derive(Debug, Error)]
pub enum PlaceSearchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("places API returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTextResponse {
    #[serde(default)]
    pub places: Vec<RawPlace>,
}

/// Place record as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlace {
    pub display_name: Option<LocalizedText>,
    pub google_maps_uri: Option<String>,
    pub location: Option<LatLng>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub photos: Vec<RawPhoto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub text: Option<String>,
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPhoto {
    #[serde(default)]
    pub author_attributions: Vec<AuthorAttribution>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorAttribution {
    pub display_name: Option<String>,
    pub uri: Option<String>,
}

/// Convert a raw record into a [`Place`]
///
/// Returns `None` unless the display name, maps URI and both coordinates
/// are present. The photo URI is the first photo's first author link.
pub fn project_place(raw: &RawPlace) -> Option<Place> {
    let display_name = raw.display_name.as_ref()?.text.clone().filter(|name| !name.trim().is_empty())?;
    let google_maps_uri = raw.google_maps_uri.clone()?;
    let location = raw.location.as_ref()?;
    let geocode = Geocode {
        lat: location.latitude?,
        lng: location.longitude?,
    };

    let photo_uri = raw
        .photos
        .first()
        .and_then(|photo| photo.author_attributions.first())
        .and_then(|author| author.uri.clone());

    Some(Place {
        display_name,
        google_maps_uri,
        geocode,
        formatted_address: raw.formatted_address.clone(),
        rating: raw.rating,
        photo_uri,
    })
}

/// Text search over places
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search_text(&self, query: &str) -> Result<Vec<RawPlace>, PlaceSearchError>;
}

/// Google Places (New) Text Search client
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GooglePlacesClient {
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self, PlaceSearchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Build a client when an API key is configured
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, PlaceSearchError> {
        let Some(api_key) = config.google_api_key.as_deref() else {
            tracing::warn!("GOOGLE_API_KEY not set. Place recommendations will be disabled.");
            return Ok(None);
        };
        Self::new(
            &config.places_base_url,
            api_key,
            Duration::from_secs(config.http_timeout_secs),
        )
        .map(Some)
    }
}

#[async_trait]
impl PlaceSearch for GooglePlacesClient {
    async fn search_text(&self, query: &str) -> Result<Vec<RawPlace>, PlaceSearchError> {
        let response = self
            .http
            .post(format!("{}/v1/places:searchText", self.base_url))
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&serde_json::json!({ "textQuery": query }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlaceSearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: SearchTextResponse = response.json().await?;
        Ok(body.places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn zilker() -> serde_json::Value {
        json!({
            "displayName": { "text": "Zilker Park", "languageCode": "en" },
            "googleMapsUri": "https://maps.google.com/?cid=1",
            "location": { "latitude": 30.2669, "longitude": -97.7729 },
            "formattedAddress": "2100 Barton Springs Rd, Austin, TX",
            "rating": 4.8,
            "photos": [{ "authorAttributions": [{ "displayName": "Ana", "uri": "https://maps.google.com/contrib/1" }] }]
        })
    }

    #[test]
    fn test_project_full_record() {
        let raw: RawPlace = serde_json::from_value(zilker()).unwrap();
        let place = project_place(&raw).unwrap();
        assert_eq!(
            place,
            Place {
                display_name: "Zilker Park".to_string(),
                google_maps_uri: "https://maps.google.com/?cid=1".to_string(),
                geocode: Geocode { lat: 30.2669, lng: -97.7729 },
                formatted_address: Some("2100 Barton Springs Rd, Austin, TX".to_string()),
                rating: Some(4.8),
                photo_uri: Some("https://maps.google.com/contrib/1".to_string()),
            }
        );
    }

    #[test]
    fn test_project_tolerates_missing_optionals() {
        let raw: RawPlace = serde_json::from_value(json!({
            "displayName": { "text": "Alamo" },
            "googleMapsUri": "https://maps.google.com/?cid=2",
            "location": { "latitude": 29.42, "longitude": -98.48 },
            "photos": [{ "authorAttributions": [] }]
        }))
        .unwrap();
        let place = project_place(&raw).unwrap();
        assert_eq!(place.rating, None);
        assert_eq!(place.photo_uri, None);
        assert_eq!(place.formatted_address, None);
    }

    #[test]
    fn test_project_requires_core_fields() {
        let mut missing_uri: RawPlace = serde_json::from_value(zilker()).unwrap();
        missing_uri.google_maps_uri = None;
        assert!(project_place(&missing_uri).is_none());

        let mut missing_lng: RawPlace = serde_json::from_value(zilker()).unwrap();
        missing_lng.location = Some(LatLng { latitude: Some(30.0), longitude: None });
        assert!(project_place(&missing_lng).is_none());

        assert!(project_place(&RawPlace::default()).is_none());
    }

    #[tokio::test]
    async fn test_search_text_sends_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/places:searchText"))
            .and(header("X-Goog-Api-Key", "places-key"))
            .and(header("X-Goog-FieldMask", FIELD_MASK))
            .and(body_json(json!({ "textQuery": "Zilker Park Austin, TX" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "places": [zilker()] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GooglePlacesClient::new(&server.uri(), "places-key", Duration::from_secs(5)).unwrap();
        let places = client.search_text("Zilker Park Austin, TX").await.unwrap();
        assert_eq!(places.len(), 1);
    }

    #[tokio::test]
    async fn test_search_text_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = GooglePlacesClient::new(&server.uri(), "k", Duration::from_secs(5)).unwrap();
        assert!(client.search_text("nowhere").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_text_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key invalid"))
            .mount(&server)
            .await;

        let client = GooglePlacesClient::new(&server.uri(), "bad", Duration::from_secs(5)).unwrap();
        assert_matches!(
            client.search_text("x").await,
            Err(PlaceSearchError::Status { status: 403, .. })
        );
    }
}
