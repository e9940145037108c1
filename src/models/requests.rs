//! Request DTOs for the cache server API
//!
//! Defines the query string accepted by `/set` and `/get`.

use serde::Deserialize;

/// Query parameters for `/set?key=..&expire=..` and `/get?key=..`
///
/// Both fields are optional at the parsing layer so that a missing key is
/// reported as a 400 by the cache rather than rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheQuery {
    /// The cache key
    #[serde(default)]
    pub key: Option<String>,
    /// Optional TTL such as `30s` or `1h30m`
    #[serde(default)]
    pub expire: Option<String>,
}

impl CacheQuery {
    /// Returns the key, or an empty string if none was given.
    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or_default()
    }
}
