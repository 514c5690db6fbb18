//! API Handlers
//!
//! HTTP request handlers for each reporting and administration endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use regex::Regex;

use crate::budget::{BudgetLimits, ResourceBudget};
use crate::cache::AdvancedCache;
use crate::error::{Result, ServiceError};
use crate::models::{
    ClearRequest, ClearResponse, DeleteResponse, HealthResponse, MemoryReportResponse,
    StatsResponse,
};
use crate::telemetry::{PerformanceMonitor, PerformanceReport, RealtimeSnapshot};

/// Application state shared across all handlers.
///
/// Holds the cache, the resource budget and the performance monitor,
/// each behind an Arc so middleware and background tasks can share them.
#[derive(Clone)]
pub struct AppState {
    /// Main application cache
    pub cache: Arc<AdvancedCache>,
    /// Timer, interval and listener budget
    pub budget: Arc<ResourceBudget>,
    /// Request and query telemetry
    pub monitor: Arc<PerformanceMonitor>,
    /// TTL applied to cached GET responses
    pub response_ttl: Duration,
}

impl AppState {
    /// Creates a new AppState from already-constructed components.
    pub fn new(
        cache: Arc<AdvancedCache>,
        budget: Arc<ResourceBudget>,
        monitor: Arc<PerformanceMonitor>,
        response_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            budget,
            monitor,
            response_ttl,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Wires the monitor to the cache's stats recorder so health scoring
    /// sees live hit rates.
    pub fn from_config(config: &crate::config::Config) -> Self {
        let cache = Arc::new(AdvancedCache::new(
            Duration::from_secs(config.cache_default_ttl),
            Duration::from_secs(config.session_ttl),
        ));
        let budget = Arc::new(ResourceBudget::new(
            BudgetLimits {
                one_shot: config.timer_cap,
                repeating: config.interval_cap,
                listeners: config.listener_cap,
                cache_entries: config.budget_cache_cap,
            },
            Duration::from_secs(config.budget_cache_ttl),
        ));
        let monitor = Arc::new(PerformanceMonitor::with_slow_threshold(
            cache.stats_handle(),
            Duration::from_millis(config.slow_threshold_ms),
        ));
        Self::new(
            cache,
            budget,
            monitor,
            Duration::from_secs(config.response_ttl),
        )
    }
}

/// Handler for GET /stats
///
/// Returns cache counters plus process memory usage.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let report = state.cache.report().await;
    let memory = state.budget.memory_usage();

    Json(StatsResponse::new(report, memory))
}

/// Handler for GET /memory
///
/// Composes process memory, the latest host sample and live resource
/// counts into one report. Fields the platform cannot provide are null.
pub async fn memory_handler(State(state): State<AppState>) -> Json<MemoryReportResponse> {
    let process = state.budget.memory_usage();
    let system = state.monitor.latest_sample();
    let resources = state.budget.counts();
    let cached_entries = state.cache.size().await;

    Json(MemoryReportResponse::new(
        process,
        system,
        resources,
        cached_entries,
    ))
}

/// Handler for GET /report
///
/// Returns the full performance report: request and query statistics,
/// sampling history, slow queries and the health assessment.
pub async fn report_handler(State(state): State<AppState>) -> Json<PerformanceReport> {
    Json(state.monitor.report())
}

/// Handler for GET /realtime
///
/// Returns the cheap dashboard snapshot without touching history buffers.
pub async fn realtime_handler(State(state): State<AppState>) -> Json<RealtimeSnapshot> {
    Json(state.monitor.realtime())
}

/// Handler for GET /health
///
/// Returns the composite health score with its status word.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.monitor.health()))
}

/// Handler for POST /cache/clear
///
/// With a pattern, removes matching keys; without one, empties the cache.
pub async fn clear_cache_handler(
    State(state): State<AppState>,
    Json(req): Json<ClearRequest>,
) -> Result<Json<ClearResponse>> {
    // Validate request
    if let Some(error_msg) = req.validate() {
        return Err(ServiceError::InvalidRequest(error_msg));
    }

    let cleared = match req.pattern.as_deref() {
        Some(pattern) => {
            let regex = Regex::new(pattern)
                .map_err(|e| ServiceError::InvalidRequest(format!("Invalid pattern: {}", e)))?;
            state.cache.clear_pattern(&regex).await
        }
        None => {
            let size = state.cache.size().await;
            state.cache.clear().await;
            size
        }
    };

    Ok(Json(ClearResponse::new(cleared)))
}

/// Handler for DELETE /cache/:key
///
/// Removes a single key, answering 404 when it is absent.
pub async fn delete_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.cache.del(&key).await {
        return Err(ServiceError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(key)))
}
