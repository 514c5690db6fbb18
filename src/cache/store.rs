//! Timed Key Store Module
//!
//! Process-local key/value engine combining HashMap storage with per-entry
//! TTL expiration. Expired entries are dropped lazily on read and in bulk by
//! the periodic sweep; an expired key is indistinguishable from an absent one.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::TimedEntry;

// == Timed Key Store ==
/// TTL-bounded key/value storage.
///
/// The store is unbounded in entry count; freshness is the only eviction
/// criterion. Callers serialize access through a surrounding lock.
#[derive(Debug, Default)]
pub struct TimedKeyStore<V> {
    /// Key-value storage
    entries: HashMap<String, TimedEntry<V>>,
}

impl<V> TimedKeyStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    // == Set ==
    /// Stores a key-value pair with the given TTL.
    ///
    /// If the key already exists, the value is overwritten and the TTL is
    /// reset (last write wins).
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Time-to-live for this entry
    pub fn set(&mut self, key: String, value: V, ttl: Duration) {
        self.entries.insert(key, TimedEntry::new(value, ttl));
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if present and not expired. An expired entry is
    /// removed on the spot and reported as absent.
    ///
    /// # Arguments
    /// * `key` - The key to retrieve
    pub fn get(&mut self, key: &str) -> Option<&V> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.entries.remove(key);
                return None;
            }
        }

        self.entries.get(key).map(|entry| &entry.value)
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether a live entry was present;
    /// an expired straggler is dropped but reported as absent.
    ///
    /// # Arguments
    /// * `key` - The key to delete
    pub fn del(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => !entry.is_expired(),
            None => false,
        }
    }

    // == Keys ==
    /// Lists the live keys.
    ///
    /// Expired entries are pruned first so the listing never exposes a key
    /// that a subsequent `get` would refuse.
    pub fn keys(&mut self) -> Vec<String> {
        self.sweep_expired();
        self.entries.keys().cloned().collect()
    }

    // == Values ==
    /// Iterates over live values (after pruning expired entries).
    pub fn values(&mut self) -> impl Iterator<Item = &V> {
        self.sweep_expired();
        self.entries.values().map(|entry| &entry.value)
    }

    // == Sweep Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Idempotent; running it twice in a row removes nothing the second
    /// time. Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the current number of entries, expired stragglers included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_store_new() {
        let store: TimedKeyStore<String> = TimedKeyStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = TimedKeyStore::new();

        store.set("key1".to_string(), "value1".to_string(), Duration::from_secs(300));
        let value = store.get("key1");

        assert_eq!(value, Some(&"value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store: TimedKeyStore<String> = TimedKeyStore::new();

        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_delete() {
        let mut store = TimedKeyStore::new();

        store.set("key1".to_string(), "value1".to_string(), Duration::from_secs(300));

        assert!(store.del("key1"));
        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_delete_nonexistent() {
        let mut store: TimedKeyStore<String> = TimedKeyStore::new();

        assert!(!store.del("nonexistent"));
    }

    #[test]
    fn test_store_delete_expired_reports_absent() {
        let mut store = TimedKeyStore::new();

        store.set("key1".to_string(), "value1".to_string(), Duration::from_millis(50));
        sleep(Duration::from_millis(80));

        // The straggler is dropped, but as far as callers can tell it
        // was already gone
        assert!(!store.del("key1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let mut store = TimedKeyStore::new();

        store.set("key1".to_string(), "value1".to_string(), Duration::from_millis(50));
        store.set("key1".to_string(), "value2".to_string(), Duration::from_secs(300));

        sleep(Duration::from_millis(80));

        // Overwrite replaced both the value and the expiry
        assert_eq!(store.get("key1"), Some(&"value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = TimedKeyStore::new();

        store.set("key1".to_string(), "value1".to_string(), Duration::from_millis(50));

        assert!(store.get("key1").is_some());

        sleep(Duration::from_millis(80));

        // Expired entry reads as absent and is removed
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_keys_prunes_expired() {
        let mut store = TimedKeyStore::new();

        store.set("stale".to_string(), 1u32, Duration::from_millis(50));
        store.set("fresh".to_string(), 2u32, Duration::from_secs(300));

        sleep(Duration::from_millis(80));

        let keys = store.keys();
        assert_eq!(keys, vec!["fresh".to_string()]);
    }

    #[test]
    fn test_store_sweep_expired() {
        let mut store = TimedKeyStore::new();

        store.set("key1".to_string(), "value1".to_string(), Duration::from_millis(50));
        store.set("key2".to_string(), "value2".to_string(), Duration::from_secs(300));

        sleep(Duration::from_millis(80));

        let removed = store.sweep_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("key2").is_some());

        // Idempotent: nothing left to remove
        assert_eq!(store.sweep_expired(), 0);
    }

    #[test]
    fn test_store_clear() {
        let mut store = TimedKeyStore::new();

        store.set("key1".to_string(), 1u32, Duration::from_secs(300));
        store.set("key2".to_string(), 2u32, Duration::from_secs(300));

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
    }
}
