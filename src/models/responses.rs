//! Response DTOs for the service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::budget::{MemoryUsage, ResourceCounts};
use crate::cache::CacheReport;
use crate::telemetry::{HealthReport, SystemSample};

/// Response body for the stats endpoint (GET /stats)
///
/// Flattens the cache counters together with process memory usage.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of writes
    pub sets: u64,
    /// Number of deletions
    pub deletes: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Current number of entries in cache
    pub entries: usize,
    /// Total size of stored payloads in bytes
    pub payload_bytes: usize,
    /// Process memory usage, when available on this platform
    pub memory: Option<MemoryUsage>,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a cache report and process memory
    pub fn new(report: CacheReport, memory: Option<MemoryUsage>) -> Self {
        Self {
            hits: report.stats.hits,
            misses: report.stats.misses,
            sets: report.stats.sets,
            deletes: report.stats.deletes,
            hit_rate: report.stats.hit_rate,
            entries: report.size,
            payload_bytes: report.payload_bytes,
            memory,
        }
    }
}

/// Response body for the memory report endpoint (GET /memory)
#[derive(Debug, Clone, Serialize)]
pub struct MemoryReportResponse {
    /// Timestamp of report generation in RFC 3339 format
    pub generated_at: String,
    /// Process memory usage, when available
    pub process: Option<MemoryUsage>,
    /// Latest host-level sample, when one has been taken
    pub system: Option<SystemSample>,
    /// Live handle and side-cache counts
    pub resources: ResourceCounts,
    /// Current number of entries in the main cache
    pub cached_entries: usize,
}

impl MemoryReportResponse {
    /// Creates a new MemoryReportResponse from its component snapshots
    pub fn new(
        process: Option<MemoryUsage>,
        system: Option<SystemSample>,
        resources: ResourceCounts,
        cached_entries: usize,
    ) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            process,
            system,
            resources,
            cached_entries,
        }
    }
}

/// Response body for bulk invalidation (POST /cache/clear)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Number of entries removed
    pub cleared: usize,
}

impl ClearResponse {
    /// Creates a new ClearResponse for the given removal count
    pub fn new(cleared: usize) -> Self {
        Self {
            message: format!("Cleared {} cache entries", cleared),
            cleared,
        }
    }
}

/// Response body for single-key removal (DELETE /cache/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status: healthy, degraded or unhealthy
    pub status: String,
    /// Composite score between 0 and 100
    pub score: u8,
    /// Suggested actions when metrics drift out of range
    pub recommendations: Vec<String>,
    /// Current timestamp in RFC 3339 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse from a computed health report
    pub fn new(report: HealthReport) -> Self {
        Self {
            status: report.status,
            score: report.score,
            recommendations: report.recommendations,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
