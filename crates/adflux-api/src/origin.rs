//! Public origin selection for resolved media URLs.
//!
//! The server is the only place media URLs are made absolute. A configured
//! `server.public_url` always wins; without one the origin comes from the
//! request itself (`http` plus the `Host` header), optionally taking scheme
//! and host from a trusted reverse proxy's `X-Forwarded-*` headers.

use adflux_common::{
    config::ServerConfig,
    error::{AdfluxError, AdfluxResult},
};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, uri::Authority},
};
use std::sync::Arc;

use crate::AppState;

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// How the origin of a request is determined.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    /// Fixed origin, already normalized by config loading (no trailing slash).
    pub public_url: Option<String>,
    pub trust_proxy: bool,
}

impl OriginPolicy {
    pub fn from_config(server: &ServerConfig) -> Self {
        Self {
            public_url: server.public_url.clone(),
            trust_proxy: server.trust_proxy,
        }
    }

    /// Origin (`scheme://host[:port]`) clients should use for this request.
    pub fn origin_for(&self, parts: &Parts) -> AdfluxResult<String> {
        if let Some(public_url) = &self.public_url {
            return Ok(public_url.clone());
        }

        let scheme = self
            .forwarded(parts, X_FORWARDED_PROTO)
            .map(str::to_ascii_lowercase)
            .filter(|proto| proto == "http" || proto == "https")
            .or_else(|| parts.uri.scheme_str().map(str::to_owned))
            .unwrap_or_else(|| "http".to_owned());

        let host = self
            .forwarded(parts, X_FORWARDED_HOST)
            .or_else(|| header_str(parts, header::HOST.as_str()))
            .map(str::to_owned)
            .or_else(|| parts.uri.authority().map(|a| a.as_str().to_owned()))
            .ok_or_else(|| AdfluxError::BadRequest {
                message: "Missing Host header".into(),
            })?;

        // Reject anything that is not a bare host[:port] before echoing it into URLs.
        let authority: Authority = host.parse().map_err(|_| AdfluxError::BadRequest {
            message: format!("Invalid host {host:?}"),
        })?;
        if authority.as_str().contains('@') {
            return Err(AdfluxError::BadRequest {
                message: format!("Invalid host {host:?}"),
            });
        }

        Ok(format!("{scheme}://{authority}"))
    }

    /// First value of a proxy header, only when proxies are trusted.
    fn forwarded<'a>(&self, parts: &'a Parts, name: &str) -> Option<&'a str> {
        if !self.trust_proxy {
            return None;
        }
        header_str(parts, name)
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

/// Extractor yielding the public origin for the current request.
pub struct RequestOrigin(pub String);

impl FromRequestParts<Arc<AppState>> for RequestOrigin {
    type Rejection = AdfluxError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        state.origin.origin_for(parts).map(RequestOrigin)
    }
}
