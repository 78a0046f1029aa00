//! Request and Response models for the cache server API
//!
//! This module defines request validation and the JSON bodies returned by
//! the informational endpoints.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{GetRequest, SetRequest, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
