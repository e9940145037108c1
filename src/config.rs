//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::TtlPolicy;

/// Which backing store the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// In-process concurrent map
    #[default]
    Memory,
    /// Remote Redis server at `REDIS_URL`
    Redis,
}

impl StoreBackend {
    /// Parses a backend name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(StoreBackend::Memory),
            "redis" => Some(StoreBackend::Redis),
            _ => None,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Backing store selection
    pub store_backend: StoreBackend,
    /// Redis connection URL, including credentials and database
    pub redis_url: String,
    /// Per-operation store deadline in milliseconds, 0 = unbounded
    pub op_timeout_ms: u64,
    /// Treatment of unusable TTLs
    pub ttl_policy: TtlPolicy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_URL` - Redis URL (default: redis://127.0.0.1:6379/0)
    /// - `OP_TIMEOUT_MS` - Store call deadline, 0 disables (default: 5000)
    /// - `TTL_POLICY` - `lenient` or `strict` (default: lenient)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            store_backend: env::var("CACHE_BACKEND")
                .ok()
                .and_then(|v| StoreBackend::from_name(&v))
                .unwrap_or(defaults.store_backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            op_timeout_ms: env::var("OP_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.op_timeout_ms),
            ttl_policy: env::var("TTL_POLICY")
                .ok()
                .and_then(|v| TtlPolicy::from_name(&v))
                .unwrap_or(defaults.ttl_policy),
        }
    }

    /// Returns the per-operation deadline, if any.
    pub fn op_timeout(&self) -> Option<Duration> {
        (self.op_timeout_ms > 0).then(|| Duration::from_millis(self.op_timeout_ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            store_backend: StoreBackend::Memory,
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            op_timeout_ms: 5000,
            ttl_policy: TtlPolicy::Lenient,
        }
    }
}
