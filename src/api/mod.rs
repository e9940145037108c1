//! API Module
//!
//! HTTP handlers and routing for the cache server.
//!
//! # Endpoints
//! - `PUT /set?key=<key>[&expire=<ttl>]` - Store the JSON body under a key
//! - `GET /get?key=<key>` - Retrieve the stored JSON value
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
