//! API Module
//!
//! HTTP handlers and routing for the cache server.
//!
//! # Endpoints
//! - `GET /:key` - Retrieve a value as plain text
//! - `POST /:key` - Store the request body under a key
//! - `GET /size` - Approximate entry count
//! - `GET /size/precise` - Exact entry count
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
