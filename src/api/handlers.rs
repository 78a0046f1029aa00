//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};

use crate::cache::{CacheEngine, CacheStats};
use crate::config::EngineConfig;
use crate::error::{CacheError, Result};
use crate::models::{GetRequest, HealthResponse, SetRequest, StatsResponse};

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The cache engine
    pub engine: CacheEngine,
    /// Metrics sink the engine reports into
    pub stats: Arc<CacheStats>,
}

impl AppState {
    /// Creates a new AppState from an engine and the stats sink it was built with.
    pub fn new(engine: CacheEngine, stats: Arc<CacheStats>) -> Self {
        Self { engine, stats }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the stats sink and injects it into a fresh engine.
    pub fn from_config(config: &EngineConfig) -> Self {
        let stats = Arc::new(CacheStats::new());
        let engine = CacheEngine::new(config, stats.clone());
        Self::new(engine, stats)
    }
}

/// Handler for GET /:key
///
/// Returns the live value as plain text.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<String> {
    let req = GetRequest { key };
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state
        .engine
        .get(&req.key)
        .await
        .ok_or(CacheError::NotFound(req.key))
}

/// Handler for POST /:key
///
/// Stores the request body under the key and echoes it back.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<String> {
    let req = SetRequest::from_body(key, &body).map_err(CacheError::InvalidRequest)?;
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.engine.set(req.key, req.value.clone()).await;
    Ok(req.value)
}

/// Handler for requests without a key (GET or POST /)
pub async fn missing_key_handler() -> Result<String> {
    Err(CacheError::InvalidRequest(
        "Must provide a key in the path".to_string(),
    ))
}

/// Handler for GET /size
///
/// Returns the approximate entry count as a decimal number.
pub async fn size_handler(State(state): State<AppState>) -> String {
    state.engine.size().await.to_string()
}

/// Handler for GET /size/precise
///
/// Returns the exact entry count, counting every shard.
pub async fn size_precise_handler(State(state): State<AppState>) -> String {
    state.engine.size_precise().to_string()
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let snapshot = state.stats.snapshot();
    Json(StatsResponse::new(
        &snapshot,
        state.engine.size().await,
        state.engine.size_precise(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState::from_config(&EngineConfig::default())
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let echoed = set_handler(
            State(state.clone()),
            Path("test_key".to_string()),
            Bytes::from_static(b"test_value"),
        )
        .await
        .unwrap();
        assert_eq!(echoed, "test_value");

        let value = get_handler(State(state), Path("test_key".to_string()))
            .await
            .unwrap();
        assert_eq!(value, "test_value");
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_set_rejects_invalid_utf8() {
        let state = test_state();

        let result = set_handler(
            State(state.clone()),
            Path("binary".to_string()),
            Bytes::from_static(&[0xc3, 0x28]),
        )
        .await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
        assert_eq!(state.engine.size_precise(), 0);
    }

    #[tokio::test]
    async fn test_size_handlers() {
        let state = test_state();
        state.engine.set("a", "1").await;
        state.engine.set("b", "2").await;
        state.engine.counter().settle().await.unwrap();

        assert_eq!(size_handler(State(state.clone())).await, "2");
        assert_eq!(size_precise_handler(State(state)).await, "2");
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        state.engine.set("k", "v").await;
        state.engine.get("k").await;
        state.engine.get("missing").await;

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 1);
        assert_eq!(response.misses, 1);
        assert_eq!(response.size_precise, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_missing_key_handler() {
        let result = missing_key_handler().await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }
}
