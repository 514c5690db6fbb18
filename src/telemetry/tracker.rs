//! Request Tracking Module
//!
//! Collects request and query latency observations in bounded buffers.
//! Response-time averages are computed over a sliding window of recent
//! samples; totals and error counts run for the lifetime of the tracker.
//! Slow operations are logged the moment they are recorded.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::warn;

/// Number of recent response-time samples kept for the average.
pub const REQUEST_SAMPLE_CAP: usize = 1000;

/// Number of timestamped request records kept.
pub const REQUEST_HISTORY_CAP: usize = 100;

/// Number of slow queries kept.
pub const SLOW_QUERY_CAP: usize = 50;

/// Latency above which a request or query counts as slow.
pub const SLOW_THRESHOLD: Duration = Duration::from_millis(1000);

// == Records ==
/// One tracked request.
#[derive(Debug, Clone, Serialize)]
pub struct RequestRecord {
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub success: bool,
}

/// One slow query observation.
#[derive(Debug, Clone, Serialize)]
pub struct SlowQuery {
    pub name: String,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}

// == Aggregates ==
/// Request-side aggregates for reports.
#[derive(Debug, Clone, Serialize)]
pub struct RequestStats {
    pub total: u64,
    pub errors: u64,
    /// errors / total, 0.0 before any traffic
    pub error_rate: f64,
    /// Average over the recent sample window, 0.0 before any traffic
    pub avg_response_ms: f64,
    pub slow_requests: u64,
}

/// Query-side aggregates for reports.
#[derive(Debug, Clone, Serialize)]
pub struct QueryStats {
    pub total: u64,
    pub slow: Vec<SlowQuery>,
}

#[derive(Debug, Default)]
struct TrackerInner {
    samples: VecDeque<u64>,
    history: VecDeque<RequestRecord>,
    slow_queries: VecDeque<SlowQuery>,
    request_count: u64,
    error_count: u64,
    slow_request_count: u64,
    query_count: u64,
}

// == Request Tracker ==
/// Bounded latency bookkeeping for requests and queries.
#[derive(Debug)]
pub struct RequestTracker {
    inner: RwLock<TrackerInner>,
    slow_threshold: Duration,
}

impl RequestTracker {
    // == Constructor ==
    /// Creates a tracker with the given slow-operation threshold.
    pub fn new(slow_threshold: Duration) -> Self {
        Self {
            inner: RwLock::new(TrackerInner::default()),
            slow_threshold,
        }
    }

    // == Record Request ==
    /// Records one request observation.
    ///
    /// Feeds the sample window (oldest samples fall out past the cap), the
    /// timestamped history, and the running totals. A request past the slow
    /// threshold is logged immediately.
    pub fn record_request(&self, duration: Duration, success: bool) {
        let duration_ms = duration.as_millis() as u64;
        let is_slow = duration > self.slow_threshold;

        if is_slow {
            warn!(duration_ms, success, "Slow request");
        }

        let mut inner = self.inner.write();
        inner.request_count += 1;
        if !success {
            inner.error_count += 1;
        }
        if is_slow {
            inner.slow_request_count += 1;
        }

        inner.samples.push_back(duration_ms);
        while inner.samples.len() > REQUEST_SAMPLE_CAP {
            inner.samples.pop_front();
        }

        inner.history.push_back(RequestRecord {
            timestamp: Utc::now(),
            duration_ms,
            success,
        });
        while inner.history.len() > REQUEST_HISTORY_CAP {
            inner.history.pop_front();
        }
    }

    // == Record Query ==
    /// Records one named query observation; slow ones are logged and kept.
    pub fn record_query(&self, name: &str, duration: Duration) {
        let duration_ms = duration.as_millis() as u64;
        let is_slow = duration > self.slow_threshold;

        if is_slow {
            warn!(query = name, duration_ms, "Slow query");
        }

        let mut inner = self.inner.write();
        inner.query_count += 1;

        if is_slow {
            inner.slow_queries.push_back(SlowQuery {
                name: name.to_string(),
                duration_ms,
                timestamp: Utc::now(),
            });
            while inner.slow_queries.len() > SLOW_QUERY_CAP {
                inner.slow_queries.pop_front();
            }
        }
    }

    // == Request Stats ==
    /// Aggregated request view.
    pub fn request_stats(&self) -> RequestStats {
        let inner = self.inner.read();

        let error_rate = if inner.request_count == 0 {
            0.0
        } else {
            inner.error_count as f64 / inner.request_count as f64
        };

        let avg_response_ms = if inner.samples.is_empty() {
            0.0
        } else {
            inner.samples.iter().sum::<u64>() as f64 / inner.samples.len() as f64
        };

        RequestStats {
            total: inner.request_count,
            errors: inner.error_count,
            error_rate,
            avg_response_ms,
            slow_requests: inner.slow_request_count,
        }
    }

    // == Query Stats ==
    /// Aggregated query view, slow list oldest-first.
    pub fn query_stats(&self) -> QueryStats {
        let inner = self.inner.read();
        QueryStats {
            total: inner.query_count,
            slow: inner.slow_queries.iter().cloned().collect(),
        }
    }

    // == History ==
    /// Timestamped request records, oldest-first.
    pub fn history(&self) -> Vec<RequestRecord> {
        self.inner.read().history.iter().cloned().collect()
    }

    /// Number of slow queries currently retained.
    pub fn slow_query_count(&self) -> usize {
        self.inner.read().slow_queries.len()
    }
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new(SLOW_THRESHOLD)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_starts_empty() {
        let tracker = RequestTracker::default();
        let stats = tracker.request_stats();

        assert_eq!(stats.total, 0);
        assert_eq!(stats.error_rate, 0.0);
        assert_eq!(stats.avg_response_ms, 0.0);
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn test_average_over_samples() {
        let tracker = RequestTracker::default();

        tracker.record_request(Duration::from_millis(100), true);
        tracker.record_request(Duration::from_millis(300), true);

        let stats = tracker.request_stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.avg_response_ms, 200.0);
    }

    #[test]
    fn test_error_rate() {
        let tracker = RequestTracker::default();

        for _ in 0..8 {
            tracker.record_request(Duration::from_millis(10), true);
        }
        tracker.record_request(Duration::from_millis(10), false);
        tracker.record_request(Duration::from_millis(10), false);

        let stats = tracker.request_stats();
        assert_eq!(stats.errors, 2);
        assert!((stats.error_rate - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sample_window_is_bounded() {
        let tracker = RequestTracker::default();

        // Old slow samples fall out of the window
        for _ in 0..REQUEST_SAMPLE_CAP {
            tracker.record_request(Duration::from_millis(900), true);
        }
        for _ in 0..REQUEST_SAMPLE_CAP {
            tracker.record_request(Duration::from_millis(100), true);
        }

        let stats = tracker.request_stats();
        assert_eq!(stats.total, 2 * REQUEST_SAMPLE_CAP as u64);
        assert_eq!(stats.avg_response_ms, 100.0);
    }

    #[test]
    fn test_history_is_bounded_and_keeps_newest() {
        let tracker = RequestTracker::default();

        for i in 0..(REQUEST_HISTORY_CAP + 5) {
            tracker.record_request(Duration::from_millis(i as u64), true);
        }

        let history = tracker.history();
        assert_eq!(history.len(), REQUEST_HISTORY_CAP);
        // The five oldest records were dropped
        assert_eq!(history[0].duration_ms, 5);
        assert_eq!(history.last().unwrap().duration_ms, (REQUEST_HISTORY_CAP + 4) as u64);
    }

    #[test]
    fn test_slow_requests_are_counted() {
        let tracker = RequestTracker::default();

        tracker.record_request(Duration::from_millis(1500), true);
        tracker.record_request(Duration::from_millis(200), true);

        assert_eq!(tracker.request_stats().slow_requests, 1);
    }

    #[test]
    fn test_threshold_is_strictly_greater() {
        let tracker = RequestTracker::default();

        tracker.record_request(Duration::from_millis(1000), true);

        assert_eq!(tracker.request_stats().slow_requests, 0);
    }

    #[test]
    fn test_slow_queries_retained_up_to_cap() {
        let tracker = RequestTracker::default();

        tracker.record_query("fast", Duration::from_millis(20));
        for i in 0..(SLOW_QUERY_CAP + 3) {
            tracker.record_query(&format!("slow-{}", i), Duration::from_millis(1200));
        }

        let stats = tracker.query_stats();
        assert_eq!(stats.total, (SLOW_QUERY_CAP + 4) as u64);
        assert_eq!(stats.slow.len(), SLOW_QUERY_CAP);
        // Oldest slow entries were dropped
        assert_eq!(stats.slow[0].name, "slow-3");
    }

    #[test]
    fn test_custom_threshold() {
        let tracker = RequestTracker::new(Duration::from_millis(100));

        tracker.record_query("borderline", Duration::from_millis(150));

        assert_eq!(tracker.slow_query_count(), 1);
    }
}
