/**
 * Server Configuration
 *
 * Turns an [`AppConfig`] into live collaborators: the database pool (with
 * migrations applied), the stores and the outbound API clients.
 *
 * # Fallbacks
 *
 * - No `DATABASE_URL`: in-memory store and identity provider
 * - No `HYPERBOLIC_API_KEY`: cover and stamp generation return 503
 * - No `GOOGLE_API_KEY`: recommendations return 503
 *
 * A configured database that cannot be reached is a startup error.
 */

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::backend::assets::{HyperbolicClient, ImageGenerator, LocalObjectStore};
use crate::backend::auth::{MemoryIdentity, PgIdentity};
use crate::backend::error::BackendError;
use crate::backend::places::{GenaiSuggester, GooglePlacesClient, PlaceSearch};
use crate::backend::server::state::{Collaborators, SharedIdentity, SharedStore};
use crate::backend::store::{MemoryStore, PgStore};
use crate::shared::AppConfig;

/// Connect to PostgreSQL and run migrations
///
/// # Returns
///
/// - `Ok(None)` if no database URL is configured
/// - `Ok(Some(pool))` once connected and migrated
pub async fn load_database(config: &AppConfig) -> Result<Option<PgPool>, BackendError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Using the in-memory store; data will not survive a restart.");
        return Ok(None);
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            BackendError::state(format!("database connection failed: {e}"))
        })?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {:?}", e);
        BackendError::state(format!("database migration failed: {e}"))
    })?;
    tracing::info!("Database migrations completed successfully");

    Ok(Some(pool))
}

/// Build every collaborator from configuration
pub fn build_collaborators(config: &AppConfig, db_pool: Option<&PgPool>) -> Result<Collaborators, BackendError> {
    let (store, identity): (SharedStore, SharedIdentity) = match db_pool {
        Some(pool) => (Arc::new(PgStore::new(pool.clone())), Arc::new(PgIdentity::new(pool.clone()))),
        None => (Arc::new(MemoryStore::new()), Arc::new(MemoryIdentity::new())),
    };

    let objects = Arc::new(LocalObjectStore::new(&config.media_dir, &config.public_base_url));
    tracing::info!("Serving media from {}", objects.root().display());

    let images = HyperbolicClient::from_config(config)
        .map_err(|e| BackendError::state(format!("failed to build image client: {e}")))?
        .map(|client| Arc::new(client) as Arc<dyn ImageGenerator>);

    let place_search = GooglePlacesClient::from_config(config)
        .map_err(|e| BackendError::state(format!("failed to build places client: {e}")))?
        .map(|client| Arc::new(client) as Arc<dyn PlaceSearch>);

    Ok(Collaborators {
        store,
        identity,
        objects,
        images,
        suggester: Arc::new(GenaiSuggester::new(config.suggestion_model.clone())),
        place_search,
    })
}
