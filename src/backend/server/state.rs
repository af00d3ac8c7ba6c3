/**
 * Application State
 *
 * `AppState` holds the configuration and one handle per collaborator.
 * Everything inside is an `Arc` or a cheap clone of one, so the state is
 * cloned into every request.
 *
 * # State Extraction
 *
 * Handlers extract only the part they use (`State<BookService>`,
 * `State<SharedIdentity>`, ...) through the `FromRef` implementations below.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::assets::{AssetPipeline, ImageGenerator, ObjectStore};
use crate::backend::auth::IdentityProvider;
use crate::backend::books::BookService;
use crate::backend::places::{AttractionSuggester, PlaceRecommender, PlaceSearch};
use crate::backend::store::StampbookStore;
use crate::shared::AppConfig;

/// Store handle shared by handlers and services
pub type SharedStore = Arc<dyn StampbookStore>;

/// Identity provider handle
pub type SharedIdentity = Arc<dyn IdentityProvider>;

/// The external services the backend talks to
///
/// `images` and `place_search` are `None` when their API key is not
/// configured; requests that need them fail with 503.
pub struct Collaborators {
    pub store: SharedStore,
    pub identity: SharedIdentity,
    pub objects: Arc<dyn ObjectStore>,
    pub images: Option<Arc<dyn ImageGenerator>>,
    pub suggester: Arc<dyn AttractionSuggester>,
    pub place_search: Option<Arc<dyn PlaceSearch>>,
}

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: SharedStore,
    pub identity: SharedIdentity,
    pub books: BookService,
    pub assets: AssetPipeline,
    pub recommender: PlaceRecommender,
    /// `None` when running on the in-memory store
    pub db_pool: Option<PgPool>,
}

impl AppState {
    pub fn new(config: AppConfig, collaborators: Collaborators, db_pool: Option<PgPool>) -> Self {
        let Collaborators {
            store,
            identity,
            objects,
            images,
            suggester,
            place_search,
        } = collaborators;

        Self {
            books: BookService::new(store.clone(), config.seed_policy),
            assets: AssetPipeline::new(objects, images),
            recommender: PlaceRecommender::new(suggester, place_search, config.attraction_count),
            config: Arc::new(config),
            store,
            identity,
            db_pool,
        }
    }
}

impl FromRef<AppState> for SharedStore {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for SharedIdentity {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.identity.clone()
    }
}

impl FromRef<AppState> for BookService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.books.clone()
    }
}

impl FromRef<AppState> for AssetPipeline {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.assets.clone()
    }
}

impl FromRef<AppState> for PlaceRecommender {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.recommender.clone()
    }
}
