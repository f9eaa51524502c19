//! # adflux-db
//!
//! Database layer for AdFlux. Holds the process-wide connection pool and the
//! read-only queries over the `ads` table. The backend is chosen by the URL
//! scheme: MySQL uses the native driver, PostgreSQL and SQLite go through
//! `sqlx::AnyPool`.
//!
//! Handlers never see the pool directly: they depend on [`AdStore`], which
//! [`Database`] implements and tests replace with in-memory fakes.

pub mod health;
pub mod repository;

use adflux_common::{config::DatabaseConfig, models::Ad};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{AnyPool, MySqlPool, any::AnyPoolOptions, mysql::MySqlPoolOptions};

/// Read access to the ad catalog.
#[async_trait]
pub trait AdStore: Send + Sync {
    /// All ads ordered by identifier, descending.
    async fn list_ads(&self) -> Result<Vec<Ad>, sqlx::Error>;

    /// Round-trip a trivial query; returns its result.
    async fn ping(&self) -> Result<i64, sqlx::Error>;
}

/// Shared database handle, constructed once at startup.
#[derive(Clone)]
pub enum Database {
    /// Native driver, so `TEXT`, temporal, `DECIMAL` and `JSON` columns decode.
    MySql(MySqlPool),
    /// PostgreSQL and SQLite.
    Any(AnyPool),
}

/// `true` when `url` names a MySQL-protocol server.
pub fn is_mysql_url(url: &str) -> bool {
    let scheme = url.split(':').next().unwrap_or_default();
    scheme.eq_ignore_ascii_case("mysql") || scheme.eq_ignore_ascii_case("mariadb")
}

impl Database {
    /// Open the connection pool described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let backend = config.url.split(':').next().unwrap_or_default();
        tracing::info!(backend, "Connecting to database...");

        let db = if is_mysql_url(&config.url) {
            let pool = MySqlPoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .connect(&config.url)
                .await
                .with_context(|| format!("Failed to connect to {backend} database"))?;
            Self::MySql(pool)
        } else {
            sqlx::any::install_default_drivers();
            let pool = AnyPoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .connect(&config.url)
                .await
                .with_context(|| format!("Failed to connect to {backend} database"))?;
            Self::Any(pool)
        };

        tracing::info!(backend, "Connected to database");
        Ok(db)
    }

    /// Close every pooled connection; later queries fail.
    pub async fn close(&self) {
        match self {
            Self::MySql(pool) => pool.close().await,
            Self::Any(pool) => pool.close().await,
        }
    }
}

#[async_trait]
impl AdStore for Database {
    async fn list_ads(&self) -> Result<Vec<Ad>, sqlx::Error> {
        match self {
            Self::MySql(pool) => repository::ads::list_all_mysql(pool).await,
            Self::Any(pool) => repository::ads::list_all(pool).await,
        }
    }

    async fn ping(&self) -> Result<i64, sqlx::Error> {
        match self {
            Self::MySql(pool) => health::ping_mysql(pool).await,
            Self::Any(pool) => health::ping(pool).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_urls_select_native_driver() {
        assert!(is_mysql_url("mysql://root:pw@localhost:3306/adflux"));
        assert!(is_mysql_url("MySQL://localhost/adflux"));
        assert!(is_mysql_url("mariadb://localhost/adflux"));
        assert!(!is_mysql_url("postgres://localhost/adflux"));
        assert!(!is_mysql_url("sqlite::memory:"));
        assert!(!is_mysql_url(""));
    }
}
