//! Common test utilities
//!
//! Builds the full router over in-memory collaborators and provides fakes
//! for the external services, so every endpoint can be driven with
//! `tower::ServiceExt::oneshot` without a network or a database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use stampbook::backend::assets::{GenerationError, ImageGenerator, ImageSize, MemoryObjectStore};
use stampbook::backend::auth::MemoryIdentity;
use stampbook::backend::places::{AttractionSuggester, PlaceSearch, PlaceSearchError, RawPlace, SuggestionError};
use stampbook::backend::places::search::{LatLng, LocalizedText};
use stampbook::backend::routes::create_router;
use stampbook::backend::store::{MemoryStore, StampbookStore, StoreError};
use stampbook::backend::{AppState, Collaborators};
use stampbook::shared::{AppConfig, Book, BookId, BookSummary, PageIndex, PageKey, ProfileUpdate, Stamp, UserProfile};

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-bytes";

/// Image generator that returns fixed bytes and counts its calls
#[derive(Debug, Default)]
pub struct FakeImageGenerator {
    pub generated: AtomicUsize,
    pub described: AtomicUsize,
    pub fail: bool,
}

impl FakeImageGenerator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn generated(&self) -> usize {
        self.generated.load(Ordering::SeqCst)
    }

    pub fn described(&self) -> usize {
        self.described.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for FakeImageGenerator {
    async fn generate_image(&self, _prompt: &str, _size: ImageSize) -> Result<Vec<u8>, GenerationError> {
        self.generated.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GenerationError::Status {
                status: 500,
                body: "upstream exploded".to_string(),
            });
        }
        Ok(PNG_BYTES.to_vec())
    }

    async fn describe_image(&self, _image: &[u8], _content_type: &str) -> Result<String, GenerationError> {
        self.described.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GenerationError::MalformedResponse("no choices".to_string()));
        }
        Ok("a red lighthouse on a rocky coast".to_string())
    }
}

/// Suggester with a canned answer
#[derive(Debug, Default)]
pub struct FakeSuggester {
    pub names: Vec<String>,
    pub fail: bool,
}

impl FakeSuggester {
    pub fn with_names(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|name| name.to_string()).collect(),
            fail: false,
        }
    }
}

#[async_trait]
impl AttractionSuggester for FakeSuggester {
    async fn suggest(&self, _location: &str, count: usize, _keywords: Option<&str>) -> Result<Vec<String>, SuggestionError> {
        if self.fail {
            return Err(SuggestionError::Model("model offline".to_string()));
        }
        Ok(self.names.iter().take(count).cloned().collect())
    }
}

/// Place search answering from a table keyed by query prefix
#[derive(Debug, Default)]
pub struct FakePlaceSearch {
    pub results: HashMap<String, Vec<RawPlace>>,
    /// Queries starting with one of these fail
    pub failing: Vec<String>,
}

impl FakePlaceSearch {
    pub fn with_place(mut self, name: &str, lat: f64, lng: f64) -> Self {
        self.results.insert(name.to_string(), vec![raw_place(name, lat, lng)]);
        self
    }

    pub fn with_failure(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }
}

#[async_trait]
impl PlaceSearch for FakePlaceSearch {
    async fn search_text(&self, query: &str) -> Result<Vec<RawPlace>, PlaceSearchError> {
        if self.failing.iter().any(|name| query.starts_with(name.as_str())) {
            return Err(PlaceSearchError::Status {
                status: 500,
                body: "quota".to_string(),
            });
        }
        Ok(self
            .results
            .iter()
            .find(|(name, _)| query.starts_with(name.as_str()))
            .map(|(_, places)| places.clone())
            .unwrap_or_default())
    }
}

pub fn raw_place(name: &str, lat: f64, lng: f64) -> RawPlace {
    RawPlace {
        display_name: Some(LocalizedText {
            text: Some(name.to_string()),
            language_code: Some("en".to_string()),
        }),
        google_maps_uri: Some(format!("https://maps.google.com/?q={}", name.replace(' ', "+"))),
        location: Some(LatLng {
            latitude: Some(lat),
            longitude: Some(lng),
        }),
        formatted_address: Some(format!("{name}, Austin, TX")),
        rating: Some(4.6),
        photos: Vec::new(),
    }
}

/// Store whose writes fail as if the database pool were exhausted
///
/// With `hang_books` set, book writes never complete instead.
#[derive(Debug, Default)]
pub struct FailingStore {
    pub inner: MemoryStore,
    pub fail_books: bool,
    pub hang_books: bool,
    pub fail_profiles: bool,
}

fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl StampbookStore for FailingStore {
    async fn create_book(&self, user_id: &str, book: &Book) -> Result<BookId, StoreError> {
        if self.hang_books {
            std::future::pending::<()>().await;
        }
        if self.fail_books {
            return Err(unavailable());
        }
        self.inner.create_book(user_id, book).await
    }

    async fn get_books(&self, user_id: &str) -> Result<Vec<BookSummary>, StoreError> {
        self.inner.get_books(user_id).await
    }

    async fn get_book(&self, user_id: &str, book_id: BookId) -> Result<Book, StoreError> {
        self.inner.get_book(user_id, book_id).await
    }

    async fn get_pages(&self, user_id: &str, book_id: BookId) -> Result<Option<PageIndex>, StoreError> {
        self.inner.get_pages(user_id, book_id).await
    }

    async fn append_stamp(&self, user_id: &str, book_id: BookId, stamp: &Stamp) -> Result<PageKey, StoreError> {
        self.inner.append_stamp(user_id, book_id, stamp).await
    }

    async fn put_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), StoreError> {
        if self.fail_profiles {
            return Err(unavailable());
        }
        self.inner.put_profile(user_id, profile).await
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, StoreError> {
        self.inner.get_profile(user_id).await
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<UserProfile, StoreError> {
        self.inner.update_profile(user_id, update).await
    }
}

/// A router plus handles on the fakes behind it
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn StampbookStore>,
    pub identity: Arc<MemoryIdentity>,
    pub objects: Arc<MemoryObjectStore>,
    pub images: Arc<FakeImageGenerator>,
}

pub struct TestAppBuilder {
    config: AppConfig,
    store: Arc<dyn StampbookStore>,
    images: Option<Arc<FakeImageGenerator>>,
    suggester: FakeSuggester,
    place_search: Option<FakePlaceSearch>,
}

impl TestAppBuilder {
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(mut self, store: impl StampbookStore + 'static) -> Self {
        self.store = Arc::new(store);
        self
    }

    pub fn images(mut self, images: FakeImageGenerator) -> Self {
        self.images = Some(Arc::new(images));
        self
    }

    pub fn without_images(mut self) -> Self {
        self.images = None;
        self
    }

    pub fn suggester(mut self, suggester: FakeSuggester) -> Self {
        self.suggester = suggester;
        self
    }

    pub fn place_search(mut self, search: FakePlaceSearch) -> Self {
        self.place_search = Some(search);
        self
    }

    pub fn build(self) -> TestApp {
        let identity = Arc::new(MemoryIdentity::with_cost(4));
        let objects = Arc::new(MemoryObjectStore::default());
        // Keep a handle on the generator even when it is not wired in
        let images = self.images.clone().unwrap_or_default();

        let collaborators = Collaborators {
            store: self.store.clone(),
            identity: identity.clone(),
            objects: objects.clone(),
            images: self.images.map(|images| images as Arc<dyn ImageGenerator>),
            suggester: Arc::new(self.suggester),
            place_search: self
                .place_search
                .map(|search| Arc::new(search) as Arc<dyn PlaceSearch>),
        };

        let state = AppState::new(self.config, collaborators, None);
        TestApp {
            router: create_router(state),
            store: self.store,
            identity,
            objects,
            images,
        }
    }
}

/// Builder defaulting to a memory store and a working image generator
pub fn test_app() -> TestAppBuilder {
    TestAppBuilder {
        config: AppConfig::default(),
        store: Arc::new(MemoryStore::new()),
        images: Some(Arc::new(FakeImageGenerator::default())),
        suggester: FakeSuggester::default(),
        place_search: None,
    }
}

impl TestApp {
    /// Send one request and decode the JSON response body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Send one request and return only the status; for non-JSON rejections
    pub async fn status(&self, request: Request<Body>) -> StatusCode {
        self.router.clone().oneshot(request).await.unwrap().status()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request(Method::POST, uri, body)).await
    }

    /// Create a book and return its id
    pub async fn create_book(&self, uid: &str, city: &str, state: &str, attractions: Value) -> String {
        let (status, body) = self
            .post_json(
                "/stampbook/create",
                serde_json::json!({ "uid": uid, "city": city, "state": state, "attractions": attractions }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create book failed: {body}");
        body["book_id"].as_str().unwrap().to_string()
    }
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub const BOUNDARY: &str = "stampbook-test-boundary";

/// A multipart body with a single file field
pub fn multipart_request(uri: &str, field: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n").as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

/// Stamp request body for `location_name`
pub fn stamp_body(uid: &str, book_id: &str, location_name: &str) -> Value {
    serde_json::json!({
        "uid": uid,
        "book_id": book_id,
        "location_name": location_name,
        "geocode": { "lat": 30.2669, "lng": -97.7729 },
        "photo_url": "memory://objects/photos/visit.jpg",
        "stamp_url": "memory://objects/stamps/sticker.png",
        "stamp_size": { "width": 120.0, "height": 90.0 },
        "stamp_transformation": { "position": { "x": 12.0, "y": 40.0 }, "scale": 1.2, "rotation": 15.0 },
        "notes": "Swam at Barton Springs after"
    })
}
