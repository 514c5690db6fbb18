//! Telemetry Module
//!
//! Performance observation for the service: bounded request and query
//! latency tracking, periodic system sampling, and additive-tier health
//! scoring rolled up by the performance monitor.

mod health;
mod monitor;
mod system;
mod tracker;

// Re-export public types
pub use health::{
    health_report, health_score, health_status, recommendations, HealthInputs, HealthReport,
};
pub use monitor::{PerformanceMonitor, PerformanceReport, RealtimeSnapshot};
pub use system::{SystemSample, SystemSampler};
pub use tracker::{
    QueryStats, RequestRecord, RequestStats, RequestTracker, SlowQuery, REQUEST_HISTORY_CAP,
    REQUEST_SAMPLE_CAP, SLOW_QUERY_CAP, SLOW_THRESHOLD,
};
