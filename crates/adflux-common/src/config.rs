//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > config.toml (or `--config`) > defaults
//!
//! The loaded [`AppConfig`] is a plain value: the binary builds it once and
//! hands the relevant sections to the database and API layers.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::path::Path;

use crate::media::DEFAULT_MEDIA_PREFIX;

/// Load the application configuration.
///
/// `path` overrides the optional `config.toml` in the working directory; when
/// given, the file must exist.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("config").required(false),
    };

    let cfg = defaults()?
        .add_source(file)
        // Environment variables (ADFLUX__SERVER__PORT, ADFLUX__DATABASE__URL, etc.)
        .add_source(
            config::Environment::with_prefix("ADFLUX")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    finish(cfg)
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3001)?
        .set_default("server.trust_proxy", false)?
        .set_default("database.max_connections", 10)?
        .set_default("database.min_connections", 1)?
        .set_default("media.dir", "uploads")?
        .set_default("media.prefix", DEFAULT_MEDIA_PREFIX)?
        .set_default("log.format", "pretty")
}

fn finish(cfg: config::Config) -> Result<AppConfig, ConfigError> {
    let mut app_config: AppConfig = cfg.try_deserialize()?;
    app_config.normalize()?;
    Ok(app_config)
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Validate values and bring them into canonical form.
    fn normalize(&mut self) -> Result<(), ConfigError> {
        self.server.public_url = match self.server.public_url.take() {
            Some(raw) if !raw.trim().is_empty() => Some(parse_public_url(raw.trim())?),
            _ => None,
        };

        if !is_valid_prefix(&self.media.prefix) {
            return Err(ConfigError::Message(format!(
                "media.prefix must start and end with '/' and name a path segment, got {:?}",
                self.media.prefix
            )));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Message(format!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public origin clients use to reach this server (e.g. `https://ads.example.com`).
    /// When set it is the only base used for local media URLs; otherwise the
    /// origin is taken from each request. Stored without a trailing slash.
    pub public_url: Option<String>,
    /// Honor `X-Forwarded-Proto` / `X-Forwarded-Host` from a reverse proxy.
    pub trust_proxy: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// sqlx connection URL (`mysql://`, `postgres://` or `sqlite://`)
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    /// Local directory served read-only under `prefix`.
    pub dir: String,
    /// URL path prefix for local media, e.g. `/uploads/`.
    pub prefix: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            dir: "uploads".into(),
            prefix: DEFAULT_MEDIA_PREFIX.into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

fn parse_public_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |why: &str| ConfigError::Message(format!("server.public_url {raw:?}: {why}"));

    let url = url::Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must be an origin without path, query or fragment"));
    }

    Ok(url.origin().ascii_serialization())
}

fn is_valid_prefix(prefix: &str) -> bool {
    prefix.len() > 2 && prefix.starts_with('/') && prefix.ends_with('/') && !prefix.contains("//")
}
