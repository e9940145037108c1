//! Error types for the cache server
//!
//! Provides unified error handling using thiserror. Every variant maps to
//! exactly one HTTP status.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;
use crate::store::StoreError;

// == Cache Error Enum ==
/// Unified error type for the cache server.
///
/// A missing or expired key is not an error; lookups report it as `None`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Bad caller input: missing key, invalid payload or ttl
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Value could not be serialized for storage
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Stored bytes exist but cannot be read back
    #[error("Corrupt entry for key '{key}': {reason}")]
    CorruptEntry { key: String, reason: String },

    /// Backing store read, write or delete failed
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// The caller's deadline elapsed before the store answered
    #[error("{op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },

    /// The caller abandoned the operation
    #[error("{op} cancelled")]
    Cancelled { op: &'static str },
}

impl CacheError {
    /// Returns the HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::Encoding(_)
            | CacheError::CorruptEntry { .. }
            | CacheError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            CacheError::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
