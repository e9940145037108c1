//! In-Memory Store
//!
//! Concurrent in-process backing store built on `DashMap`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{BackingStore, StoreError};

// == Stored Bytes ==
#[derive(Debug, Clone)]
struct StoredBytes {
    bytes: Vec<u8>,
    /// Native expiry derived from the TTL hint, None = keep until deleted
    reclaim_at: Option<Instant>,
}

impl StoredBytes {
    fn is_reclaimable(&self, now: Instant) -> bool {
        self.reclaim_at.is_some_and(|at| now >= at)
    }
}

// == Memory Store ==
/// Sharded in-memory store.
///
/// Each key lives in one shard guarded by its own lock, so single-key
/// operations are atomic and unrelated keys rarely contend.
#[derive(Debug)]
pub struct MemoryStore {
    entries: DashMap<String, StoredBytes>,
    honor_ttl_hints: bool,
}

impl MemoryStore {
    /// Creates an empty store that drops entries once their TTL hint elapses.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            honor_ttl_hints: true,
        }
    }

    /// Creates an empty store that keeps entries until explicitly deleted.
    pub fn ignoring_ttl_hints() -> Self {
        Self {
            entries: DashMap::new(),
            honor_ttl_hints: false,
        }
    }

    /// Returns true if `key` is physically present, expired or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of physically stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackingStore for MemoryStore {
    async fn raw_get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let now = Instant::now();
        // Atomically drop the entry if its hint elapsed; a concurrent
        // overwrite with a fresh hint is left alone.
        self.entries
            .remove_if(key, |_, stored| stored.is_reclaimable(now));

        Ok(self.entries.get(key).map(|stored| stored.bytes.clone()))
    }

    async fn raw_set(
        &self,
        key: &str,
        bytes: Vec<u8>,
        ttl_hint: Option<Duration>,
    ) -> Result<(), StoreError> {
        let reclaim_at = if self.honor_ttl_hints {
            ttl_hint.and_then(|ttl| Instant::now().checked_add(ttl))
        } else {
            None
        };

        self.entries
            .insert(key.to_string(), StoredBytes { bytes, reclaim_at });
        Ok(())
    }

    async fn raw_delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
