//! Ads repository — read-only queries over the `ads` catalog table.

use adflux_common::models::Ad;

const LIST_ALL: &str = "SELECT * FROM ads ORDER BY id DESC";

/// Get every ad, newest identifier first.
pub async fn list_all(pool: &sqlx::AnyPool) -> Result<Vec<Ad>, sqlx::Error> {
    sqlx::query_as::<_, Ad>(LIST_ALL).fetch_all(pool).await
}

/// [`list_all`] over the native MySQL pool.
pub async fn list_all_mysql(pool: &sqlx::MySqlPool) -> Result<Vec<Ad>, sqlx::Error> {
    sqlx::query_as::<_, Ad>(LIST_ALL).fetch_all(pool).await
}
