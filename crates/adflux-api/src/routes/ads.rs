//! Catalog routes.
//!
//! GET /api/ads — every ad, newest first, with `media_url` resolved

use adflux_common::{error::AdfluxResult, models::Ad};
use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;

use crate::{AppState, origin::RequestOrigin};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/ads", get(list_ads))
}

async fn list_ads(
    State(state): State<Arc<AppState>>,
    RequestOrigin(origin): RequestOrigin,
) -> AdfluxResult<Json<Vec<Ad>>> {
    let ads = state.store.list_ads().await?;
    tracing::debug!(count = ads.len(), %origin, "Listing ads");

    let prefix = state.media.prefix.as_str();
    let ads = ads
        .into_iter()
        .map(|ad| ad.with_resolved_media(&origin, prefix))
        .collect();

    Ok(Json(ads))
}
