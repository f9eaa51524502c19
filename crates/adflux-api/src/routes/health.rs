//! Liveness and storage diagnostics.
//!
//! GET /             — process is up
//! GET /api/test-db  — round-trips a query through the connection pool

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

#[derive(Serialize)]
struct Banner {
    message: &'static str,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum DbCheck {
    Success { message: &'static str, result: i64 },
    Error { message: &'static str, error: String },
}

/// Routes mounted at the server root.
pub fn root_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(banner))
}

/// Routes nested under `/api`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/test-db", get(test_db))
}

async fn banner() -> Json<Banner> {
    Json(Banner {
        message: "AdFlux backend is running",
        timestamp: Utc::now(),
    })
}

async fn test_db(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(result) => (
            StatusCode::OK,
            Json(DbCheck::Success {
                message: "Database connection verified",
                result,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Database query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DbCheck::Error {
                    message: "Database connection failed",
                    error: e.to_string(),
                }),
            )
        }
    }
}
