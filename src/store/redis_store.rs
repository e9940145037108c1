//! Redis Store
//!
//! Backing store on a remote Redis server, reached through a reconnecting
//! multiplexed connection.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::info;

use super::{BackingStore, StoreError};

/// Redis-backed store.
///
/// The connection manager is cheap to clone; every call works on its own
/// clone so concurrent requests share one multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Opens a connection to `url` (e.g. `redis://:password@host:6379/0`).
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;
        info!("Connected to Redis");

        Ok(Self { connection })
    }
}

/// Rounds the hint up to whole milliseconds so Redis never drops an entry
/// before it expires at the cache level. Redis also rejects a zero `PX`.
fn hint_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_nanos().div_ceil(1_000_000))
        .unwrap_or(u64::MAX)
        .max(1)
}

#[async_trait]
impl BackingStore for RedisStore {
    async fn raw_get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut conn = self.connection.clone();
        let bytes: Option<Vec<u8>> = conn.get(key).await?;
        Ok(bytes)
    }

    async fn raw_set(
        &self,
        key: &str,
        bytes: Vec<u8>,
        ttl_hint: Option<Duration>,
    ) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        match ttl_hint {
            Some(ttl) => {
                let _: () = conn.pset_ex(key, bytes, hint_millis(ttl)).await?;
            }
            None => {
                let _: () = conn.set(key, bytes).await?;
            }
        }
        Ok(())
    }

    async fn raw_delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let _: i64 = conn.del(key).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        redis::cmd("PING").query_async::<()>(&mut conn).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
