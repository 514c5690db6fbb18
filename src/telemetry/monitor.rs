//! Performance Monitor Module
//!
//! Front door of the telemetry subsystem. Owns the request tracker and the
//! system sampler, shares the cache stats recorder with the cache facade,
//! and assembles the report, realtime and health views handed out over the
//! API. Reports read the cached system sample; only the background sampling
//! cadence touches the OS.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{StatsRecorder, StatsSnapshot};
use crate::telemetry::health::{health_report, HealthInputs, HealthReport};
use crate::telemetry::system::{SystemSample, SystemSampler};
use crate::telemetry::tracker::{
    QueryStats, RequestRecord, RequestStats, RequestTracker, SLOW_THRESHOLD,
};

// == Performance Report ==
/// Full telemetry view for `GET /report`.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub generated_at: DateTime<Utc>,
    pub uptime_secs: u64,
    pub requests: RequestStats,
    pub queries: QueryStats,
    pub history: Vec<RequestRecord>,
    pub system: Option<SystemSample>,
    pub cache: StatsSnapshot,
    pub health: HealthReport,
}

// == Realtime Snapshot ==
/// Cheap counters-only view for `GET /realtime`.
#[derive(Debug, Clone, Serialize)]
pub struct RealtimeSnapshot {
    pub timestamp: DateTime<Utc>,
    pub uptime_secs: u64,
    pub requests_total: u64,
    pub avg_response_ms: f64,
    pub error_rate_pct: f64,
    pub cache_hit_rate_pct: f64,
    pub memory_used_pct: Option<f64>,
}

// == Performance Monitor ==
/// Aggregates request, query, system and cache telemetry.
#[derive(Debug)]
pub struct PerformanceMonitor {
    tracker: RequestTracker,
    sampler: SystemSampler,
    cache_stats: Arc<StatsRecorder>,
    started_at: Instant,
}

impl PerformanceMonitor {
    // == Constructor ==
    /// Creates a monitor reading cache behavior from the shared recorder.
    pub fn new(cache_stats: Arc<StatsRecorder>) -> Self {
        Self::with_slow_threshold(cache_stats, SLOW_THRESHOLD)
    }

    /// Creates a monitor with a custom slow-operation threshold.
    pub fn with_slow_threshold(cache_stats: Arc<StatsRecorder>, slow_threshold: Duration) -> Self {
        Self {
            tracker: RequestTracker::new(slow_threshold),
            sampler: SystemSampler::new(),
            cache_stats,
            started_at: Instant::now(),
        }
    }

    // == Record ==
    /// Records one served request.
    pub fn record_request(&self, duration: Duration, success: bool) {
        self.tracker.record_request(duration, success);
    }

    /// Records one named query.
    pub fn record_query(&self, name: &str, duration: Duration) {
        self.tracker.record_query(name, duration);
    }

    // == Sample System ==
    /// Takes a fresh system reading; run on the background cadence.
    pub fn sample_system(&self) -> Option<SystemSample> {
        self.sampler.sample()
    }

    /// Cached system reading, if any sampling has happened yet.
    pub fn latest_sample(&self) -> Option<SystemSample> {
        self.sampler.latest()
    }

    // == Uptime ==
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    // == Health ==
    /// Health score, status and advice from the current state.
    pub fn health(&self) -> HealthReport {
        health_report(&self.health_inputs())
    }

    fn health_inputs(&self) -> HealthInputs {
        let requests = self.tracker.request_stats();
        HealthInputs {
            avg_response_ms: requests.avg_response_ms,
            error_rate: requests.error_rate,
            memory_used_pct: self.sampler.latest().map(|sample| sample.memory_used_pct),
            cache_hit_rate: self.cache_stats.hit_rate(),
            slow_query_count: self.tracker.slow_query_count(),
        }
    }

    // == Report ==
    /// Full telemetry report.
    pub fn report(&self) -> PerformanceReport {
        PerformanceReport {
            generated_at: Utc::now(),
            uptime_secs: self.uptime_secs(),
            requests: self.tracker.request_stats(),
            queries: self.tracker.query_stats(),
            history: self.tracker.history(),
            system: self.sampler.latest(),
            cache: self.cache_stats.snapshot(),
            health: self.health(),
        }
    }

    // == Realtime ==
    /// Counters-only snapshot; never refreshes the system reading.
    pub fn realtime(&self) -> RealtimeSnapshot {
        let requests = self.tracker.request_stats();

        RealtimeSnapshot {
            timestamp: Utc::now(),
            uptime_secs: self.uptime_secs(),
            requests_total: requests.total,
            avg_response_ms: round2(requests.avg_response_ms),
            error_rate_pct: round2(requests.error_rate * 100.0),
            cache_hit_rate_pct: round2(self.cache_stats.hit_rate() * 100.0),
            memory_used_pct: self
                .sampler
                .latest()
                .map(|sample| round2(sample.memory_used_pct)),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
