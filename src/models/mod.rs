//! Request and Response models for the cache server API
//!
//! This module defines the query parameters and JSON bodies used by the
//! HTTP transport.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::CacheQuery;
pub use responses::{ErrorResponse, HealthResponse};
