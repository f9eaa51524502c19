//! Advertisement catalog entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::media::resolve_media_url;

/// Kind of media an ad carries.
///
/// Only `image` and `video` are interpreted by clients; any other stored tag
/// is kept verbatim so it round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AdType {
    Image,
    Video,
    Other(String),
}

impl AdType {
    pub fn as_str(&self) -> &str {
        match self {
            AdType::Image => "image",
            AdType::Video => "video",
            AdType::Other(other) => other,
        }
    }
}

impl From<String> for AdType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "image" => AdType::Image,
            "video" => AdType::Video,
            _ => AdType::Other(value),
        }
    }
}

impl From<AdType> for String {
    fn from(value: AdType) -> Self {
        match value {
            AdType::Other(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for AdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the `ads` table.
///
/// `media_url` holds whatever storage holds until [`Ad::with_resolved_media`]
/// derives the client-facing value. The text columns are nullable in storage
/// and a NULL serializes as `null`. Columns beyond the known five are carried
/// in `extra` and serialized alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    pub id: i64,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub ad_type: Option<AdType>,
    pub media_url: Option<String>,
    pub target_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ad {
    /// Column names decoded into typed fields; everything else lands in `extra`.
    pub const COLUMNS: [&'static str; 5] = ["id", "title", "type", "media_url", "target_url"];

    /// Consume the stored row and return the response form with `media_url`
    /// resolved against `base` and `prefix`.
    pub fn with_resolved_media(mut self, base: &str, prefix: &str) -> Self {
        self.media_url = self
            .media_url
            .map(|stored| resolve_media_url(&stored, base, prefix));
        self
    }
}
