//! # adflux-api
//!
//! REST API layer for AdFlux: the catalog listing endpoint, the storage
//! diagnostic, and read-only serving of the local media directory.

pub mod origin;
pub mod routes;

use adflux_common::config::{AppConfig, MediaConfig};
use adflux_db::AdStore;
use axum::Router;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::origin::OriginPolicy;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Catalog storage, constructed once at startup.
    pub store: Arc<dyn AdStore>,
    /// Where local media lives and under which URL prefix it is served.
    pub media: MediaConfig,
    /// How the public origin for resolved media URLs is chosen.
    pub origin: OriginPolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn AdStore>, config: &AppConfig) -> Self {
        Self {
            store,
            media: config.media.clone(),
            origin: OriginPolicy::from_config(&config.server),
        }
    }
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(routes::ads::router())
        .merge(routes::health::router());

    // "/uploads/" is mounted at "/uploads"; files are looked up relative to the media dir.
    let media_path = state.media.prefix.trim_end_matches('/').to_owned();
    let media_files = ServeDir::new(&state.media.dir);

    Router::new()
        .merge(routes::health::root_router())
        .nest("/api", api_routes)
        .nest_service(&media_path, media_files)
        .fallback(routes::not_found)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::compression::CompressionLayer::new())
        .with_state(Arc::new(state))
}
