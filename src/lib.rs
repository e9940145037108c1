//! TTL Cache - a JSON key-value cache server
//!
//! Stores JSON values with optional expiration on top of an in-memory or
//! Redis backing store. Expired entries are hidden on read and lazily
//! deleted.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use api::AppState;
pub use cache::{OpContext, TtlCache};
pub use config::Config;
pub use error::CacheError;
