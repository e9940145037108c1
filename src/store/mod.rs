//! Backing Store Module
//!
//! Raw byte storage the TTL cache delegates to. The cache never relies on a
//! store's own expiry for correctness; TTL hints only let a store reclaim
//! space early.

mod memory;
mod redis_store;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

// == Store Error ==
/// Failure reported by a backing store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Redis command or connection failure
    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),

    /// Store could not serve the request. None of the bundled stores
    /// produce it; it is for `BackingStore` implementations outside this
    /// crate that have no richer error of their own.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

// == Backing Store Trait ==
/// Key-value store holding opaque bytes.
///
/// Implementations must be safe for concurrent use and provide atomic
/// single-key reads, writes and deletes.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Returns the bytes stored under `key`, or `None` if absent.
    async fn raw_get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `bytes` under `key`, replacing any previous value.
    ///
    /// `ttl_hint` is a reclamation hint; stores without native expiry may
    /// ignore it.
    async fn raw_set(
        &self,
        key: &str,
        bytes: Vec<u8>,
        ttl_hint: Option<Duration>,
    ) -> Result<(), StoreError>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn raw_delete(&self, key: &str) -> Result<(), StoreError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;
}
