//! API route modules.

pub mod ads;
pub mod health;

use adflux_common::error::AdfluxError;

/// Fallback for paths no route claims.
pub async fn not_found() -> AdfluxError {
    AdfluxError::NotFound {
        resource: "Route".into(),
    }
}
