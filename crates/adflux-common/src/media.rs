//! Media URL resolution.
//!
//! A stored `media_url` is either an external URL, used as-is, or a filename
//! (or relative path) under the server's local media directory. Local
//! references are turned into absolute URLs by prefixing the public origin
//! and the media path prefix:
//!
//! ```text
//! "car.png"                       -> "http://host:3001/uploads/car.png"
//! "https://cdn.example.com/x.mp4" -> "https://cdn.example.com/x.mp4"
//! "//cdn.example.com/y.png"       -> "//cdn.example.com/y.png"
//! ""                              -> ""
//! ```
//!
//! Resolution is pure string work: no URL parsing, encoding, path
//! normalization, or filesystem lookups, so it cannot fail.

/// Path prefix under which local media files are served.
pub const DEFAULT_MEDIA_PREFIX: &str = "/uploads/";

/// Whether a stored reference already is a fetchable URL.
///
/// Anything starting with `http` (case-insensitive) or a protocol-relative
/// `//` counts as external.
pub fn is_external(media_url: &str) -> bool {
    let bytes = media_url.as_bytes();
    bytes.starts_with(b"//") || (bytes.len() >= 4 && bytes[..4].eq_ignore_ascii_case(b"http"))
}

/// Resolve a stored media reference against a public origin.
///
/// `base` is `scheme://host[:port]` without a trailing slash and `prefix` is
/// the media path prefix (e.g. `/uploads/`). Empty and external values are
/// returned unchanged.
pub fn resolve_media_url(media_url: &str, base: &str, prefix: &str) -> String {
    if media_url.is_empty() || is_external(media_url) {
        return media_url.to_owned();
    }

    let mut resolved = String::with_capacity(base.len() + prefix.len() + media_url.len());
    resolved.push_str(base);
    resolved.push_str(prefix);
    resolved.push_str(media_url);
    resolved
}
