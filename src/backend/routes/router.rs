/**
 * Router Configuration
 *
 * 1. Service banner at `/`
 * 2. API routes (see `api_routes`)
 * 3. Locally stored objects under `/media`
 * 4. JSON 404 for anything else
 *
 * Request bodies are capped at `MAX_UPLOAD_BYTES` and every request is
 * traced through `TraceLayer`.
 */

use axum::extract::{DefaultBodyLimit, State};
use axum::http::Uri;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::backend::assets::MAX_UPLOAD_BYTES;
use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Banner {
    pub service: String,
    pub version: String,
    /// "postgres" or "memory"
    pub store: String,
    pub image_generation: bool,
}

async fn service_banner(State(state): State<AppState>) -> Json<Banner> {
    Json(Banner {
        service: "stampbook".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: if state.db_pool.is_some() { "postgres" } else { "memory" }.to_string(),
        image_generation: state.assets.can_generate(),
    })
}

async fn not_found(uri: Uri) -> BackendError {
    BackendError::not_found(format!("route {}", uri.path()))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let media_dir = app_state.config.media_dir.clone();

    let router = Router::new().route("/", get(service_banner));
    let router = configure_api_routes(router);

    router
        .nest_service("/media", ServeDir::new(media_dir))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(app_state)
}
