//! Connectivity checks used by the diagnostic endpoint and `adflux check-db`.

use sqlx::{AnyPool, MySqlPool, Row};

const PING: &str = "SELECT 1 + 1 AS result";

/// Run a trivial arithmetic query and return its result (always `2`).
pub async fn ping(pool: &AnyPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(PING).fetch_one(pool).await?;
    row.try_get("result")
}

/// [`ping`] over the native MySQL pool.
pub async fn ping_mysql(pool: &MySqlPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(PING).fetch_one(pool).await?;
    row.try_get("result")
}
