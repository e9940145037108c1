//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::{codec, TtlCache, TtlPolicy};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{CacheQuery, ErrorResponse, HealthResponse};
use crate::store::BackingStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// TTL cache over the shared backing store
    pub cache: TtlCache,
    /// How unusable `expire` values are treated
    pub ttl_policy: TtlPolicy,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: TtlCache, ttl_policy: TtlPolicy) -> Self {
        Self { cache, ttl_policy }
    }

    /// Creates a new AppState over `store`, configured from `config`.
    pub fn from_config(store: Arc<dyn BackingStore>, config: &Config) -> Self {
        let cache = TtlCache::new(store).with_default_timeout(config.op_timeout());
        Self::new(cache, config.ttl_policy)
    }
}

/// Handler for PUT /set
///
/// Stores the JSON request body under `key`. An empty body stores `null`.
pub async fn set_handler(
    State(state): State<AppState>,
    Query(query): Query<CacheQuery>,
    body: Bytes,
) -> Result<StatusCode> {
    if query.key().is_empty() {
        return Err(CacheError::InvalidArgument("missing key".to_string()));
    }

    let value = codec::value_from_body(&body)
        .map_err(|e| CacheError::InvalidArgument(format!("invalid payload: {}", e)))?;
    let ttl = state.ttl_policy.resolve(query.expire.as_deref())?;

    state.cache.put(query.key(), value, ttl).await?;

    Ok(StatusCode::CREATED)
}

/// Handler for GET /get
///
/// Returns the stored value as the response body, or 404 if the key is
/// absent or expired.
pub async fn get_handler(
    State(state): State<AppState>,
    Query(query): Query<CacheQuery>,
) -> Result<Response> {
    match state.cache.get(query.key()).await? {
        Some(value) => Ok(Json(value).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Key not found")),
        )
            .into_response()),
    }
}

/// Handler for GET /health
///
/// Reports whether the backing store answers a ping within the cache's
/// default timeout.
pub async fn health_handler(State(state): State<AppState>) -> Response {
    let backend = state.cache.store().name();
    match state.cache.ping().await {
        Ok(()) => Json(HealthResponse::healthy(backend)).into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse::unhealthy(backend, e.to_string())),
        )
            .into_response(),
    }
}
