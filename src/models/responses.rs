//! Response DTOs for the cache server API
//!
//! Defines the JSON bodies of the informational and error responses.

use serde::Serialize;

use crate::cache::StatsSnapshot;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of `get` calls that returned a value
    pub hits: u64,
    /// Number of `get` calls that found nothing live
    pub misses: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Entries removed by readers
    pub lazy_expirations: u64,
    /// Entries removed by the vacuum
    pub swept_expirations: u64,
    /// Completed vacuum passes
    pub vacuum_cycles: u64,
    /// Exact count written to the counter by the latest vacuum pass
    pub last_reconciled: u64,
    /// Approximate live entry count
    pub size: usize,
    /// Exact structural entry count
    pub size_precise: usize,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a stats snapshot and both sizes
    pub fn new(stats: &StatsSnapshot, size: usize, size_precise: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            hit_rate: stats.hit_rate(),
            lazy_expirations: stats.lazy_expirations,
            swept_expirations: stats.swept_expirations,
            vacuum_cycles: stats.vacuum_cycles,
            last_reconciled: stats.last_reconciled,
            size,
            size_precise,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = StatsSnapshot {
            hits: 80,
            misses: 20,
            last_reconciled: 9,
            ..StatsSnapshot::default()
        };
        let resp = StatsResponse::new(&stats, 7, 9);
        assert_eq!(resp.last_reconciled, 9);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.size, 7);
        assert_eq!(resp.size_precise, 9);
    }

    #[test]
    fn test_stats_response_serialize() {
        let resp = StatsResponse::new(&StatsSnapshot::default(), 0, 0);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["hit_rate"], 0.0);
        assert!(json.get("swept_expirations").is_some());
        assert!(json.get("size_precise").is_some());
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
