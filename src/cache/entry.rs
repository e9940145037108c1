//! Cache Entry Module
//!
//! Defines the stored unit: key, JSON value and absolute expiration.

use chrono::{DateTime, Utc};
use serde_json::Value;

// == Expiry ==
/// Absolute expiration of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Entry stays live until overwritten
    Never,
    /// Entry is live strictly before this instant
    At(DateTime<Utc>),
}

impl Expiry {
    /// Returns true if the entry is still live at `now`.
    ///
    /// Boundary condition: an entry whose expiration equals `now` is expired.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        match self {
            Expiry::Never => true,
            Expiry::At(expire_at) => now < *expire_at,
        }
    }
}

// == Cache Entry ==
/// A single cache entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The key the entry is stored under
    pub key: String,
    /// The stored value, returned verbatim
    pub value: Value,
    /// When the entry stops being visible
    pub expire_at: Expiry,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(key: impl Into<String>, value: Value, expire_at: Expiry) -> Self {
        Self {
            key: key.into(),
            value,
            expire_at,
        }
    }

    // == Is Live ==
    /// Returns true if the entry may be served at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_at.is_live_at(now)
    }
}
