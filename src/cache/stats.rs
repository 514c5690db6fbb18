//! Cache Statistics Module
//!
//! Tracks cache usage counters: hits, misses, sets and deletes, with the
//! derived hit rate. The recorder is shared between the cache facade (which
//! feeds it) and the performance monitor (which reads it), so the counters
//! live behind one lock and snapshot/reset are atomic with respect to each
//! other. Counters only grow between resets.

use parking_lot::RwLock;
use serde::Serialize;

// == Counters ==
#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    hits: u64,
    misses: u64,
    sets: u64,
    deletes: u64,
}

impl Counters {
    fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Snapshot ==
/// Point-in-time view of the counters, for reports.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key absent, expired, or undecodable)
    pub misses: u64,
    /// Number of successful writes
    pub sets: u64,
    /// Number of removals, pattern invalidations included
    pub deletes: u64,
    /// hits / (hits + misses), 0.0 when nothing has been read yet
    pub hit_rate: f64,
}

// == Stats Recorder ==
/// Shared cache usage counters.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    counters: RwLock<Counters>,
}

impl StatsRecorder {
    // == Constructor ==
    /// Creates a recorder with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&self) {
        self.counters.write().hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&self) {
        self.counters.write().misses += 1;
    }

    // == Record Set ==
    /// Increments the set counter.
    pub fn record_set(&self) {
        self.counters.write().sets += 1;
    }

    // == Record Delete ==
    /// Increments the delete counter.
    pub fn record_delete(&self) {
        self.counters.write().deletes += 1;
    }

    // == Add Deletes ==
    /// Adds `count` deletions at once (pattern-based invalidation).
    pub fn add_deletes(&self, count: u64) {
        self.counters.write().deletes += count;
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing has been read yet.
    pub fn hit_rate(&self) -> f64 {
        self.counters.read().hit_rate()
    }

    // == Snapshot ==
    /// Returns a consistent view of all counters.
    ///
    /// Taken under the same lock `reset` writes through, so a snapshot never
    /// observes a half-reset state.
    pub fn snapshot(&self) -> StatsSnapshot {
        let counters = self.counters.read();
        StatsSnapshot {
            hits: counters.hits,
            misses: counters.misses,
            sets: counters.sets,
            deletes: counters.deletes,
            hit_rate: counters.hit_rate(),
        }
    }

    // == Reset ==
    /// Zeroes every counter in one step.
    pub fn reset(&self) {
        *self.counters.write() = Counters::default();
    }
}
