//! Budget Side Cache Module
//!
//! Small bounded TTL cache owned by the resource budget, independent of the
//! main application cache. Capacity is enforced by insertion-order eviction:
//! when full, the entry inserted longest ago is dropped, regardless of how
//! recently it was read. Overwriting a key keeps its original position.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;

use crate::cache::TimedEntry;

/// Default capacity of the side cache.
pub const SIDE_CACHE_CAP: usize = 50;

/// Default TTL for side cache entries.
pub const SIDE_CACHE_TTL: Duration = Duration::from_secs(300);

// == Side Cache ==
/// Insertion-order bounded TTL cache for loose JSON values.
#[derive(Debug)]
pub struct SideCache {
    inner: Mutex<SideCacheInner>,
}

#[derive(Debug)]
struct SideCacheInner {
    entries: HashMap<String, TimedEntry<Value>>,
    /// Insertion order, front = oldest
    order: VecDeque<String>,
    cap: usize,
    default_ttl: Duration,
}

impl SideCache {
    // == Constructor ==
    /// Creates a side cache with the given capacity and default TTL.
    pub fn new(cap: usize, default_ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(SideCacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
                cap,
                default_ttl,
            }),
        }
    }

    // == Set ==
    /// Stores a value, evicting the oldest insertion when at capacity.
    ///
    /// Overwriting an existing key replaces value and TTL but does not move
    /// the key to the back of the eviction order.
    pub fn set(&self, key: &str, value: Value, ttl: Option<Duration>) {
        let mut inner = self.inner.lock();
        let ttl = ttl.unwrap_or(inner.default_ttl);

        if inner.entries.contains_key(key) {
            inner.entries.insert(key.to_string(), TimedEntry::new(value, ttl));
            return;
        }

        while inner.entries.len() >= inner.cap {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
        }

        inner.entries.insert(key.to_string(), TimedEntry::new(value, ttl));
        inner.order.push_back(key.to_string());
    }

    // == Get ==
    /// Retrieves a value. Expired entries are removed on read.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut inner = self.inner.lock();

        let expired = match inner.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => return None,
        };

        if expired {
            inner.entries.remove(key);
            inner.order.retain(|k| k != key);
            return None;
        }

        inner.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Clear ==
    /// Removes entries whose key contains `fragment`, or everything when
    /// `fragment` is `None`. Returns the number of entries removed.
    pub fn clear(&self, fragment: Option<&str>) -> usize {
        let mut inner = self.inner.lock();

        match fragment {
            None => {
                let removed = inner.entries.len();
                inner.entries.clear();
                inner.order.clear();
                removed
            }
            Some(fragment) => {
                let matching: Vec<String> = inner
                    .entries
                    .keys()
                    .filter(|key| key.contains(fragment))
                    .cloned()
                    .collect();

                for key in &matching {
                    inner.entries.remove(key);
                }
                inner.order.retain(|key| !matching.contains(key));
                matching.len()
            }
        }
    }

    // == Length ==
    /// Number of live entries; expired ones are pruned before counting.
    pub fn len(&self) -> usize {
        let mut inner = self.inner.lock();

        let stale: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            inner.entries.remove(key);
        }
        if !stale.is_empty() {
            inner.order.retain(|key| !stale.contains(key));
        }

        inner.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SideCache {
    fn default() -> Self {
        Self::new(SIDE_CACHE_CAP, SIDE_CACHE_TTL)
    }
}
