//! Advanced Cache Module
//!
//! High-level caching facade combining the timed store, usage statistics,
//! key derivation and the payload codec. Every operation on this surface is
//! total: storage faults are logged and reported as `false`/`None`, never
//! raised. Only errors from caller-supplied computations propagate.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::cache::codec::{self, EncodedValue};
use crate::cache::keys;
use crate::cache::{StatsRecorder, StatsSnapshot, TimedKeyStore};

/// Default TTL applied when a write does not specify one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default TTL for session-scoped entries.
pub const SESSION_TTL: Duration = Duration::from_secs(1800);

// == Cache Report ==
/// Introspection view returned by [`AdvancedCache::report`].
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    /// Usage counters and hit rate
    pub stats: StatsSnapshot,
    /// Number of live entries
    pub size: usize,
    /// Live keys
    pub keys: Vec<String>,
    /// Sum of serialized payload sizes (pre-encoding), in bytes
    pub payload_bytes: usize,
}

// == Advanced Cache ==
/// Application-level cache for the wallet backend.
///
/// Wraps a [`TimedKeyStore`] of encoded payloads behind an async lock,
/// records usage in a shared [`StatsRecorder`], and deduplicates concurrent
/// cache-fill computations per key.
pub struct AdvancedCache {
    store: RwLock<TimedKeyStore<EncodedValue>>,
    stats: Arc<StatsRecorder>,
    /// Per-key gates serializing concurrent cache-fill computations
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    default_ttl: Duration,
    session_ttl: Duration,
}

impl AdvancedCache {
    // == Constructor ==
    /// Creates a cache with the given default and session TTLs.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL applied when a write does not specify one
    /// * `session_ttl` - TTL applied to session-scoped entries
    pub fn new(default_ttl: Duration, session_ttl: Duration) -> Self {
        Self {
            store: RwLock::new(TimedKeyStore::new()),
            stats: Arc::new(StatsRecorder::new()),
            in_flight: Mutex::new(HashMap::new()),
            default_ttl,
            session_ttl,
        }
    }

    // == Stats Handle ==
    /// Returns the shared stats recorder, for components that report on
    /// cache behavior without going through the facade.
    pub fn stats_handle(&self) -> Arc<StatsRecorder> {
        Arc::clone(&self.stats)
    }

    // == Set ==
    /// Stores a serializable value under `key`.
    ///
    /// Uses the default TTL when `ttl` is `None`. Returns `false` (after
    /// logging) when the value cannot be serialized; the cache content is
    /// unchanged in that case.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) -> bool {
        let Some(encoded) = codec::encode(value) else {
            return false;
        };

        let ttl = ttl.unwrap_or(self.default_ttl);
        self.store.write().await.set(key.to_string(), encoded, ttl);
        self.stats.record_set();
        true
    }

    // == Get ==
    /// Retrieves and decodes the value under `key`.
    ///
    /// Absent, expired and undecodable entries all count as misses and
    /// return `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let stored = {
            let mut store = self.store.write().await;
            store.get(key).cloned()
        };

        let Some(stored) = stored else {
            self.stats.record_miss();
            return None;
        };

        match codec::decode(&stored) {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Get Many ==
    /// Retrieves several keys at once.
    ///
    /// Each key is looked up independently with [`get`](Self::get)
    /// semantics; the result maps every requested key to its outcome.
    pub async fn get_many<T: DeserializeOwned>(
        &self,
        keys: &[&str],
    ) -> HashMap<String, Option<T>> {
        let mut results = HashMap::with_capacity(keys.len());
        for key in keys {
            results.insert(key.to_string(), self.get(key).await);
        }
        results
    }

    // == Delete ==
    /// Removes the entry under `key`. Returns whether an entry was present.
    pub async fn del(&self, key: &str) -> bool {
        let removed = self.store.write().await.del(key);
        if removed {
            self.stats.record_delete();
        }
        removed
    }

    // == Clear Pattern ==
    /// Removes every live entry whose key matches `pattern`.
    ///
    /// Returns the number of entries removed; the amount is added to the
    /// delete counter in one step.
    pub async fn clear_pattern(&self, pattern: &Regex) -> usize {
        let removed = {
            let mut store = self.store.write().await;
            let matching: Vec<String> = store
                .keys()
                .into_iter()
                .filter(|key| pattern.is_match(key))
                .collect();

            for key in &matching {
                store.del(key);
            }
            matching.len()
        };

        if removed > 0 {
            self.stats.add_deletes(removed as u64);
        }
        removed
    }

    // == Cached ==
    /// Memoizes an async computation under a key derived from `prefix` and
    /// `args`.
    ///
    /// Structurally equal `args` reuse the same entry. Inputs that cannot be
    /// serialized are treated as uncacheable: the computation runs directly.
    pub async fn cached<T, E, A, F, Fut>(
        &self,
        prefix: &str,
        args: &A,
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<T, E>
    where
        A: Serialize,
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match keys::try_cache_key(prefix, args) {
            Some(key) => self.cached_keyed(&key, ttl, compute).await,
            None => compute().await,
        }
    }

    // == Cached (explicit key) ==
    /// Memoizes an async computation under an explicit key.
    ///
    /// Concurrent calls for the same key are deduplicated: one caller runs
    /// the computation while the rest wait on a per-key gate and then read
    /// the freshly cached value. Errors from the computation propagate
    /// unchanged and are never cached, so the next caller retries.
    pub async fn cached_keyed<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let gate = {
            let mut in_flight = self.in_flight.lock();
            Arc::clone(
                in_flight
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
            )
        };

        let result = {
            let _guard = gate.lock().await;

            if let Some(value) = self.get(key).await {
                Ok(value)
            } else {
                let result = compute().await;
                if let Ok(value) = &result {
                    self.set(key, value, ttl).await;
                }
                result
            }
        };

        // Drop the gate entry once no other caller holds it, keyed by
        // identity so a racing re-registration is left alone.
        let mut in_flight = self.in_flight.lock();
        if in_flight
            .get(key)
            .map_or(false, |current| Arc::ptr_eq(current, &gate))
        {
            in_flight.remove(key);
        }

        result
    }

    // == Session Helpers ==
    /// Stores a session-scoped value under `session:{id}:{field}`.
    pub async fn session_set<T: Serialize>(&self, session_id: &str, field: &str, value: &T) -> bool {
        let key = session_key(session_id, field);
        self.set(&key, value, Some(self.session_ttl)).await
    }

    /// Retrieves a session-scoped value.
    pub async fn session_get<T: DeserializeOwned>(
        &self,
        session_id: &str,
        field: &str,
    ) -> Option<T> {
        self.get(&session_key(session_id, field)).await
    }

    /// Removes a session-scoped value.
    pub async fn session_del(&self, session_id: &str, field: &str) -> bool {
        self.del(&session_key(session_id, field)).await
    }

    /// Removes every entry belonging to a session. Returns the count.
    pub async fn clear_session(&self, session_id: &str) -> usize {
        let pattern = match Regex::new(&format!("^session:{}:", regex::escape(session_id))) {
            Ok(pattern) => pattern,
            Err(_) => return 0,
        };
        self.clear_pattern(&pattern).await
    }

    // == Report ==
    /// Returns the introspection view: counters, live size, keys and
    /// aggregate payload bytes.
    pub async fn report(&self) -> CacheReport {
        let (keys, payload_bytes, size) = {
            let mut store = self.store.write().await;
            let keys = store.keys();
            let payload_bytes = store.values().map(|stored| stored.size_bytes).sum();
            let size = store.len();
            (keys, payload_bytes, size)
        };

        CacheReport {
            stats: self.stats.snapshot(),
            size,
            keys,
            payload_bytes,
        }
    }

    // == Size ==
    /// Number of live entries.
    pub async fn size(&self) -> usize {
        let mut store = self.store.write().await;
        store.sweep_expired();
        store.len()
    }

    // == Clear ==
    /// Empties the store and zeroes the counters.
    pub async fn clear(&self) {
        self.store.write().await.clear();
        self.stats.reset();
    }

    // == Sweep ==
    /// Drops expired entries in bulk. Returns the number removed.
    ///
    /// Run periodically by the background sweep task; reads between sweeps
    /// still apply lazy expiry on their own.
    pub async fn sweep(&self) -> usize {
        self.store.write().await.sweep_expired()
    }
}

impl Default for AdvancedCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, SESSION_TTL)
    }
}

impl std::fmt::Debug for AdvancedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvancedCache")
            .field("default_ttl", &self.default_ttl)
            .field("session_ttl", &self.session_ttl)
            .finish_non_exhaustive()
    }
}

fn session_key(session_id: &str, field: &str) -> String {
    format!("session:{}:{}", session_id, field)
}
