/**
 * Server Initialization
 *
 * 1. Connect the database (if configured) and apply migrations
 * 2. Build collaborators from configuration
 * 3. Assemble `AppState` and the router
 */

use axum::Router;

use crate::backend::error::BackendError;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{build_collaborators, load_database};
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Create and configure the Axum application
pub async fn create_app(config: AppConfig) -> Result<Router<()>, BackendError> {
    tracing::info!("Initializing stampbook backend");

    let db_pool = load_database(&config).await?;
    let collaborators = build_collaborators(&config, db_pool.as_ref())?;

    let state = AppState::new(config, collaborators, db_pool);
    tracing::info!(
        database = state.db_pool.is_some(),
        image_generation = state.assets.can_generate(),
        "collaborators ready"
    );

    Ok(create_router(state))
}
