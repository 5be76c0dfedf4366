//! Response DTOs for the chat gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;

/// Response body for the chat endpoint (POST /api/chat)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant answer, disclaimer included
    pub message: String,
    /// Services that contributed to the answer
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    /// Follow-up questions related to the topic of the question
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

/// Diagnostic data attached to a chat response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Time spent handling this request, in milliseconds
    pub response_time: u64,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,
    /// True when the answer was served from the response cache
    pub cached: bool,
}

impl ChatResponse {
    /// Returns a copy marked as served from cache, timed for the current request.
    pub fn as_cached(&self, response_time: u64) -> Self {
        let mut response = self.clone();
        if let Some(metadata) = response.metadata.as_mut() {
            metadata.cached = true;
            metadata.response_time = response_time;
        }
        response
    }

    pub fn is_cached(&self) -> bool {
        self.metadata.as_ref().map(|m| m.cached).unwrap_or(false)
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Entries dropped after their TTL elapsed
    pub expired_removed: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expired_removed: stats.expired_removed,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the cache eviction endpoints (DELETE /cache, DELETE /cache/:key)
#[derive(Debug, Clone, Serialize)]
pub struct EvictResponse {
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl EvictResponse {
    pub fn key(key: &str, removed: bool) -> Self {
        let message = if removed {
            format!("Key '{}' removed", key)
        } else {
            format!("Key '{}' was not cached", key)
        };
        Self {
            message,
            removed: usize::from(removed),
        }
    }

    pub fn cleared(removed: usize) -> Self {
        Self {
            message: "Cache cleared".to_string(),
            removed,
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
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
