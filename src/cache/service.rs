//! TTL Cache Service
//!
//! Stores JSON values with an optional time-to-live on top of any
//! [`BackingStore`]. Expiration is always enforced here at read time; an
//! expired entry seen by a read is deleted from the store on the spot, so no
//! background sweeper is needed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use serde_json::Value;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::codec;
use crate::cache::entry::{CacheEntry, Expiry};
use crate::error::{CacheError, Result};
use crate::store::{BackingStore, StoreError};

/// Bound on a ping when neither the caller nor the cache sets a timeout.
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

// == Operation Context ==
/// Deadline and cancellation signal for one cache operation.
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    /// Upper bound for the whole operation; falls back to the service default
    pub timeout: Option<Duration>,
    /// Aborts the in-flight store call when cancelled
    pub cancel: Option<CancellationToken>,
}

impl OpContext {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            cancel: None,
        }
    }

    pub fn with_cancel(cancel: CancellationToken) -> Self {
        Self {
            timeout: None,
            cancel: Some(cancel),
        }
    }
}

// == TTL Cache ==
/// TTL-aware cache over a shared backing store.
///
/// Cloning is cheap and every clone talks to the same store. The service
/// keeps no per-key state, so concurrent callers never wait on each other
/// here; per-key ordering is whatever the store provides.
#[derive(Clone)]
pub struct TtlCache {
    store: Arc<dyn BackingStore>,
    clock: Arc<dyn Clock>,
    default_timeout: Option<Duration>,
}

impl TtlCache {
    // == Constructor ==
    /// Creates a cache over an already-connected store, using system time and
    /// no default timeout.
    pub fn new(store: Arc<dyn BackingStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            default_timeout: None,
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Bounds every store call that has no caller-provided timeout.
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Returns the backing store.
    pub fn store(&self) -> &Arc<dyn BackingStore> {
        &self.store
    }

    // == Put ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// `ttl` of `None` or zero means the entry never expires.
    pub async fn put(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()> {
        self.put_with(&OpContext::default(), key, value, ttl).await
    }

    /// Like [`TtlCache::put`], bounded by `ctx`.
    pub async fn put_with(
        &self,
        ctx: &OpContext,
        key: &str,
        value: Value,
        ttl: Option<Duration>,
    ) -> Result<()> {
        validate_key(key)?;
        let deadline = self.deadline(ctx);

        let ttl = ttl.filter(|ttl| !ttl.is_zero());
        let expire_at = match ttl {
            None => Expiry::Never,
            Some(ttl) => {
                let at = TimeDelta::from_std(ttl)
                    .ok()
                    .and_then(|delta| self.clock.now().checked_add_signed(delta))
                    .ok_or_else(|| {
                        CacheError::InvalidArgument(format!("ttl {:?} out of range", ttl))
                    })?;
                Expiry::At(at)
            }
        };

        let entry = CacheEntry::new(key, value, expire_at);
        let bytes = codec::encode(&entry).map_err(|e| CacheError::Encoding(e.to_string()))?;

        self.bounded(ctx, deadline, "put", self.store.raw_set(key, bytes, ttl))
            .await?;

        debug!("Stored key '{}' (ttl: {:?})", key, ttl);
        Ok(())
    }

    // == Get ==
    /// Returns the live value stored under `key`, or `None` if the key is
    /// absent or expired.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.get_with(&OpContext::default(), key).await
    }

    /// Like [`TtlCache::get`], bounded by `ctx`.
    pub async fn get_with(&self, ctx: &OpContext, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;
        let deadline = self.deadline(ctx);

        let Some(bytes) = self
            .bounded(ctx, deadline, "get", self.store.raw_get(key))
            .await?
        else {
            debug!("Key '{}' not found", key);
            return Ok(None);
        };

        let entry = codec::decode(&bytes).map_err(|e| CacheError::CorruptEntry {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        if entry.key != key {
            return Err(CacheError::CorruptEntry {
                key: key.to_string(),
                reason: format!("stored under key '{}'", entry.key),
            });
        }

        if entry.is_live_at(self.clock.now()) {
            return Ok(Some(entry.value));
        }

        debug!("Key '{}' expired, evicting", key);
        // The delete shares the read's deadline, so an eviction never
        // stretches the operation past what the caller allowed.
        if let Err(e) = self
            .bounded(ctx, deadline, "delete", self.store.raw_delete(key))
            .await
        {
            warn!("Failed to delete expired key '{}': {}", key, e);
        }
        Ok(None)
    }

    // == Ping ==
    /// Checks that the backing store answers within the default timeout,
    /// or [`PING_TIMEOUT`] when the cache has none.
    pub async fn ping(&self) -> Result<()> {
        self.ping_with(&OpContext::default()).await
    }

    /// Like [`TtlCache::ping`], bounded by `ctx`.
    pub async fn ping_with(&self, ctx: &OpContext) -> Result<()> {
        let deadline = self
            .deadline(ctx)
            .or_else(|| Some((Instant::now() + PING_TIMEOUT, PING_TIMEOUT)));
        self.bounded(ctx, deadline, "ping", self.store.ping()).await
    }

    // == Deadline ==
    /// Fixes the operation's deadline once, before its first store call.
    fn deadline(&self, ctx: &OpContext) -> Option<(Instant, Duration)> {
        ctx.timeout
            .or(self.default_timeout)
            .map(|budget| (Instant::now() + budget, budget))
    }

    // == Bounded Store Call ==
    /// Runs one store call under the operation's deadline and cancellation.
    async fn bounded<T, F>(
        &self,
        ctx: &OpContext,
        deadline: Option<(Instant, Duration)>,
        op: &'static str,
        call: F,
    ) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, StoreError>>,
    {
        let timed = async {
            match deadline {
                Some((at, after)) => match tokio::time::timeout_at(at, call).await {
                    Ok(result) => result.map_err(CacheError::from),
                    Err(_) => Err(CacheError::Timeout { op, after }),
                },
                None => call.await.map_err(CacheError::from),
            }
        };

        match &ctx.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(CacheError::Cancelled { op }),
                result = timed => result,
            },
            None => timed.await,
        }
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidArgument("missing key".to_string()));
    }
    Ok(())
}
