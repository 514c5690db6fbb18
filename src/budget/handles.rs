//! Resource Budget Module
//!
//! Caps the number of live deferred callbacks, repeating callbacks and
//! listener registrations the process may hold. Hitting a cap never fails
//! the new registration; the oldest live handle is evicted instead, and an
//! evicted or cancelled callback is guaranteed not to fire.
//!
//! Registration holds the registry lock across the spawn, so a task that
//! fires immediately still finds its own entry; firing removes the entry
//! first and runs the callback only when the removal actually found one.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use sysinfo::System;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::budget::side_cache::{SideCache, SIDE_CACHE_CAP, SIDE_CACHE_TTL};

/// Maximum live one-shot callbacks.
pub const ONE_SHOT_CAP: usize = 10;

/// Maximum live repeating callbacks.
pub const REPEATING_CAP: usize = 5;

/// Maximum live listener registrations.
pub const LISTENER_CAP: usize = 20;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

// == Handle Id ==
/// Opaque identifier for a budgeted resource handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(u64);

// == Budget Limits ==
/// Capacity configuration for [`ResourceBudget`].
#[derive(Debug, Clone, Copy)]
pub struct BudgetLimits {
    pub one_shot: usize,
    pub repeating: usize,
    pub listeners: usize,
    pub cache_entries: usize,
}

impl Default for BudgetLimits {
    fn default() -> Self {
        Self {
            one_shot: ONE_SHOT_CAP,
            repeating: REPEATING_CAP,
            listeners: LISTENER_CAP,
            cache_entries: SIDE_CACHE_CAP,
        }
    }
}

// == Resource Counts ==
/// Live handle counts across every managed kind.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ResourceCounts {
    pub timers: usize,
    pub intervals: usize,
    pub listeners: usize,
    pub cache_entries: usize,
}

// == Memory Usage ==
/// Process and system memory view, in whole megabytes.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MemoryUsage {
    /// Resident set of this process
    pub used_mb: u64,
    /// Address space of this process
    pub total_mb: u64,
    /// Physical memory of the machine
    pub limit_mb: u64,
}

// == Task Registry ==
struct TaskEntry {
    handle: JoinHandle<()>,
    owner: Option<String>,
}

struct TaskRegistry {
    kind: &'static str,
    entries: HashMap<u64, TaskEntry>,
    /// Registration order, front = oldest
    order: VecDeque<u64>,
    cap: usize,
}

impl TaskRegistry {
    fn new(kind: &'static str, cap: usize) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
            order: VecDeque::new(),
            cap,
        }
    }

    fn insert(&mut self, id: u64, entry: TaskEntry) {
        self.entries.insert(id, entry);
        self.order.push_back(id);
    }

    /// Aborts and drops the oldest entries until one slot is free.
    fn evict_to_fit(&mut self) {
        while self.entries.len() >= self.cap {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&oldest) {
                entry.handle.abort();
                warn!(
                    kind = self.kind,
                    evicted = oldest,
                    cap = self.cap,
                    "Handle budget reached, evicting oldest"
                );
            }
        }
    }

    fn remove(&mut self, id: u64) -> Option<TaskEntry> {
        self.order.retain(|entry| *entry != id);
        self.entries.remove(&id)
    }

    fn contains(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    fn remove_owned_by(&mut self, owner: &str) -> Vec<TaskEntry> {
        let ids: Vec<u64> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.owner.as_deref() == Some(owner))
            .map(|(id, _)| *id)
            .collect();

        ids.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    fn drain(&mut self) -> Vec<TaskEntry> {
        self.order.clear();
        self.entries.drain().map(|(_, entry)| entry).collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// == Listener Registry ==
struct ListenerEntry {
    label: String,
    teardown: Box<dyn FnOnce() + Send>,
    owner: Option<String>,
}

struct ListenerRegistry {
    entries: HashMap<u64, ListenerEntry>,
    order: VecDeque<u64>,
    cap: usize,
}

impl ListenerRegistry {
    fn new(cap: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            cap,
        }
    }

    fn insert(&mut self, id: u64, entry: ListenerEntry) -> Vec<ListenerEntry> {
        let mut evicted = Vec::new();
        while self.entries.len() >= self.cap {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if let Some(old) = self.entries.remove(&oldest) {
                warn!(
                    kind = "listener",
                    evicted = oldest,
                    label = %old.label,
                    cap = self.cap,
                    "Handle budget reached, evicting oldest"
                );
                evicted.push(old);
            }
        }

        self.entries.insert(id, entry);
        self.order.push_back(id);
        evicted
    }

    fn remove(&mut self, id: u64) -> Option<ListenerEntry> {
        self.order.retain(|entry| *entry != id);
        self.entries.remove(&id)
    }

    fn remove_owned_by(&mut self, owner: &str) -> Vec<ListenerEntry> {
        let ids: Vec<u64> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.owner.as_deref() == Some(owner))
            .map(|(id, _)| *id)
            .collect();

        ids.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    fn drain(&mut self) -> Vec<ListenerEntry> {
        self.order.clear();
        self.entries.drain().map(|(_, entry)| entry).collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// == Resource Budget ==
/// Budgeted registry of deferred work, repeating work, listener teardowns
/// and a small side cache.
pub struct ResourceBudget {
    timers: Arc<Mutex<TaskRegistry>>,
    intervals: Arc<Mutex<TaskRegistry>>,
    listeners: Mutex<ListenerRegistry>,
    side_cache: SideCache,
    next_id: AtomicU64,
    system: Mutex<System>,
}

impl ResourceBudget {
    // == Constructor ==
    /// Creates a budget with the given capacities and side cache TTL.
    pub fn new(limits: BudgetLimits, cache_ttl: Duration) -> Self {
        Self {
            timers: Arc::new(Mutex::new(TaskRegistry::new("timer", limits.one_shot))),
            intervals: Arc::new(Mutex::new(TaskRegistry::new("interval", limits.repeating))),
            listeners: Mutex::new(ListenerRegistry::new(limits.listeners)),
            side_cache: SideCache::new(limits.cache_entries, cache_ttl),
            next_id: AtomicU64::new(1),
            system: Mutex::new(System::new()),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    // == Schedule Once ==
    /// Runs `callback` once after `delay`, unless cancelled or evicted
    /// first. At capacity the oldest live one-shot is evicted and its
    /// callback never fires.
    ///
    /// # Arguments
    /// * `delay` - Time to wait before firing
    /// * `owner` - Optional owner tag for bulk release
    /// * `callback` - Work to run when the delay elapses
    pub fn schedule_once<F>(&self, delay: Duration, owner: Option<&str>, callback: F) -> HandleId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.next_id();
        let registry = Arc::clone(&self.timers);

        let mut timers = self.timers.lock();
        timers.evict_to_fit();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Remove-then-fire: a handle that was cancelled or evicted is
            // already gone, so the callback stays silent.
            let registered = registry.lock().remove(id).is_some();
            if registered {
                callback();
            }
        });
        timers.insert(
            id,
            TaskEntry {
                handle,
                owner: owner.map(String::from),
            },
        );

        HandleId(id)
    }

    // == Schedule Repeating ==
    /// Runs `callback` every `period` until cancelled or evicted. At
    /// capacity the oldest live repeating handle is evicted.
    ///
    /// Liveness is checked before each tick, not during one: a tick already
    /// dispatched when the handle is cancelled or evicted runs to
    /// completion.
    pub fn schedule_repeating<F>(
        &self,
        period: Duration,
        owner: Option<&str>,
        mut callback: F,
    ) -> HandleId
    where
        F: FnMut() + Send + 'static,
    {
        let id = self.next_id();
        let registry = Arc::clone(&self.intervals);

        let mut intervals = self.intervals.lock();
        intervals.evict_to_fit();
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                // Liveness is re-checked every tick
                if !registry.lock().contains(id) {
                    break;
                }
                callback();
            }
        });
        intervals.insert(
            id,
            TaskEntry {
                handle,
                owner: owner.map(String::from),
            },
        );

        HandleId(id)
    }

    // == Cancel ==
    /// Cancels a one-shot handle. Unknown or already-fired ids are a no-op.
    pub fn cancel_once(&self, id: HandleId) {
        if let Some(entry) = self.timers.lock().remove(id.0) {
            entry.handle.abort();
        }
    }

    /// Cancels a repeating handle. Unknown ids are a no-op. No further tick
    /// starts after this returns; a tick already in flight completes.
    pub fn cancel_repeating(&self, id: HandleId) {
        if let Some(entry) = self.intervals.lock().remove(id.0) {
            entry.handle.abort();
        }
    }

    // == Track Listener ==
    /// Registers a listener teardown hook under the listener budget.
    ///
    /// The hook runs when the registration is released, bulk-released or
    /// evicted, so the underlying listener is always detached exactly once.
    pub fn track_listener<F>(&self, label: &str, owner: Option<&str>, teardown: F) -> HandleId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.next_id();
        let evicted = self.listeners.lock().insert(
            id,
            ListenerEntry {
                label: label.to_string(),
                teardown: Box::new(teardown),
                owner: owner.map(String::from),
            },
        );

        // Teardowns run outside the lock; they are arbitrary caller code
        for entry in evicted {
            (entry.teardown)();
        }

        HandleId(id)
    }

    /// Releases a listener registration, running its teardown. Unknown ids
    /// are a no-op.
    pub fn release_listener(&self, id: HandleId) {
        let entry = self.listeners.lock().remove(id.0);
        if let Some(entry) = entry {
            (entry.teardown)();
        }
    }

    // == Release Owner ==
    /// Cancels every handle of every kind registered under `owner`.
    /// Returns the number of handles released.
    pub fn release_owner(&self, owner: &str) -> usize {
        let mut released = 0;

        for registry in [&self.timers, &self.intervals] {
            let removed = registry.lock().remove_owned_by(owner);
            released += removed.len();
            for entry in removed {
                entry.handle.abort();
            }
        }

        let removed = self.listeners.lock().remove_owned_by(owner);
        released += removed.len();
        for entry in removed {
            (entry.teardown)();
        }

        released
    }

    // == Emergency Release All ==
    /// Drops every managed resource at once: cancels all handles, runs all
    /// listener teardowns, empties the side cache and asks the allocator to
    /// return freed pages where the platform supports it. Last resort.
    pub fn emergency_release_all(&self) {
        let timer_entries = self.timers.lock().drain();
        let interval_entries = self.intervals.lock().drain();
        let listener_entries = self.listeners.lock().drain();

        let timers = timer_entries.len();
        let intervals = interval_entries.len();
        let listeners = listener_entries.len();

        for entry in timer_entries {
            entry.handle.abort();
        }
        for entry in interval_entries {
            entry.handle.abort();
        }
        for entry in listener_entries {
            (entry.teardown)();
        }

        let cache_entries = self.side_cache.clear(None);
        reclaim_allocator_memory();

        warn!(
            timers,
            intervals,
            listeners,
            cache_entries,
            "Emergency release of all managed resources"
        );
    }

    // == Side Cache ==
    /// Stores a value in the budget's side cache (default TTL 300 s).
    pub fn cache_set(&self, key: &str, value: Value, ttl: Option<Duration>) {
        self.side_cache.set(key, value, ttl);
    }

    /// Reads a value from the side cache.
    pub fn cache_get(&self, key: &str) -> Option<Value> {
        self.side_cache.get(key)
    }

    /// Clears side cache entries containing `fragment`, or all of them.
    /// Returns the number removed.
    pub fn cache_clear(&self, fragment: Option<&str>) -> usize {
        self.side_cache.clear(fragment)
    }

    // == Counts ==
    /// Live handle counts for every managed kind.
    pub fn counts(&self) -> ResourceCounts {
        ResourceCounts {
            timers: self.timers.lock().len(),
            intervals: self.intervals.lock().len(),
            listeners: self.listeners.lock().len(),
            cache_entries: self.side_cache.len(),
        }
    }

    // == Memory Usage ==
    /// Reads process and system memory. Returns `None` when the platform
    /// refuses to report, never a made-up number.
    pub fn memory_usage(&self) -> Option<MemoryUsage> {
        let pid = sysinfo::get_current_pid().ok()?;
        let mut system = self.system.lock();

        system.refresh_memory();
        if !system.refresh_process(pid) {
            return None;
        }
        let process = system.process(pid)?;

        Some(MemoryUsage {
            used_mb: bytes_to_mb(process.memory()),
            total_mb: bytes_to_mb(process.virtual_memory()),
            limit_mb: bytes_to_mb(system.total_memory()),
        })
    }
}

impl Default for ResourceBudget {
    fn default() -> Self {
        Self::new(BudgetLimits::default(), SIDE_CACHE_TTL)
    }
}

impl std::fmt::Debug for ResourceBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts = self.counts();
        f.debug_struct("ResourceBudget")
            .field("timers", &counts.timers)
            .field("intervals", &counts.intervals)
            .field("listeners", &counts.listeners)
            .field("cache_entries", &counts.cache_entries)
            .finish()
    }
}

fn bytes_to_mb(bytes: u64) -> u64 {
    (bytes as f64 / BYTES_PER_MB).round() as u64
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
fn reclaim_allocator_memory() {
    // glibc can return freed arena pages to the OS when asked
    let _ = unsafe { libc::malloc_trim(0) };
}

#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
fn reclaim_allocator_memory() {}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    fn small_budget(one_shot: usize, repeating: usize, listeners: usize) -> ResourceBudget {
        ResourceBudget::new(
            BudgetLimits {
                one_shot,
                repeating,
                listeners,
                cache_entries: SIDE_CACHE_CAP,
            },
            SIDE_CACHE_TTL,
        )
    }

    #[tokio::test]
    async fn test_one_shot_fires_after_delay() {
        let budget = ResourceBudget::default();
        let fired = Arc::new(AtomicUsize::new(0));

        let fired_clone = Arc::clone(&fired);
        budget.schedule_once(Duration::from_millis(40), None, move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(budget.counts().timers, 1);
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(budget.counts().timers, 0, "fired handle leaves the registry");
    }

    #[tokio::test]
    async fn test_cancelled_one_shot_never_fires() {
        let budget = ResourceBudget::default();
        let fired = Arc::new(AtomicUsize::new(0));

        let fired_clone = Arc::clone(&fired);
        let id = budget.schedule_once(Duration::from_millis(60), None, move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        budget.cancel_once(id);
        tokio::time::sleep(Duration::from_millis(140)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(budget.counts().timers, 0);
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let budget = ResourceBudget::default();
        let id = budget.schedule_once(Duration::from_millis(30), None, || {});

        budget.cancel_once(id);
        budget.cancel_once(id);
        budget.cancel_repeating(HandleId(9999));

        assert_eq!(budget.counts().timers, 0);
    }

    #[tokio::test]
    async fn test_one_shot_cap_evicts_oldest_silently() {
        let budget = small_budget(3, REPEATING_CAP, LISTENER_CAP);
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..4 {
            let fired_clone = Arc::clone(&fired);
            budget.schedule_once(Duration::from_millis(60), None, move || {
                fired_clone.fetch_add(1, Ordering::SeqCst);
            });
        }

        // Fourth registration pushed the first one out
        assert_eq!(budget.counts().timers, 3);

        tokio::time::sleep(Duration::from_millis(160)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 3, "evicted callback must not fire");
    }

    #[tokio::test]
    async fn test_handle_removed_before_callback_runs() {
        let budget = Arc::new(ResourceBudget::default());
        let observed = Arc::new(AtomicUsize::new(usize::MAX));

        let budget_clone = Arc::clone(&budget);
        let observed_clone = Arc::clone(&observed);
        budget.schedule_once(Duration::from_millis(40), None, move || {
            observed_clone.store(budget_clone.counts().timers, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(120)).await;

        // The callback saw its own handle already gone
        assert_eq!(observed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_repeating_ticks_until_cancelled() {
        let budget = ResourceBudget::default();
        let ticks = Arc::new(AtomicUsize::new(0));

        let ticks_clone = Arc::clone(&ticks);
        let id = budget.schedule_repeating(Duration::from_millis(30), None, move || {
            ticks_clone.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(110)).await;
        budget.cancel_repeating(id);
        let at_cancel = ticks.load(Ordering::SeqCst);
        assert!(at_cancel >= 2, "expected at least two ticks, got {}", at_cancel);

        tokio::time::sleep(Duration::from_millis(90)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), at_cancel, "no ticks after cancel");
    }

    #[tokio::test]
    async fn test_repeating_cap_evicts_oldest() {
        let budget = small_budget(ONE_SHOT_CAP, 2, LISTENER_CAP);

        let a = budget.schedule_repeating(Duration::from_secs(60), None, || {});
        let _b = budget.schedule_repeating(Duration::from_secs(60), None, || {});
        let _c = budget.schedule_repeating(Duration::from_secs(60), None, || {});

        assert_eq!(budget.counts().intervals, 2);
        // Cancelling the evicted handle is a harmless no-op
        budget.cancel_repeating(a);
        assert_eq!(budget.counts().intervals, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancel_lets_in_flight_tick_finish() {
        let budget = ResourceBudget::default();
        let entered = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));

        let entered_clone = Arc::clone(&entered);
        let completed_clone = Arc::clone(&completed);
        let id = budget.schedule_repeating(Duration::from_millis(20), None, move || {
            entered_clone.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(150));
            completed_clone.fetch_add(1, Ordering::SeqCst);
        });

        // Wait until the first tick is mid-callback, then cancel
        while entered.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        budget.cancel_repeating(id);
        assert_eq!(completed.load(Ordering::SeqCst), 0, "cancel landed mid-tick");
        assert_eq!(budget.counts().intervals, 0, "handle leaves the registry at once");

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(
            completed.load(Ordering::SeqCst),
            1,
            "tick in flight at cancel runs to completion"
        );
        assert_eq!(entered.load(Ordering::SeqCst), 1, "no tick starts after cancel");
    }

    #[tokio::test]
    async fn test_listener_release_runs_teardown_once() {
        let budget = ResourceBudget::default();
        let torn_down = Arc::new(AtomicUsize::new(0));

        let torn_clone = Arc::clone(&torn_down);
        let id = budget.track_listener("balance-updates", None, move || {
            torn_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(budget.counts().listeners, 1);
        budget.release_listener(id);
        budget.release_listener(id);

        assert_eq!(torn_down.load(Ordering::SeqCst), 1);
        assert_eq!(budget.counts().listeners, 0);
    }

    #[tokio::test]
    async fn test_listener_cap_eviction_runs_teardown() {
        let budget = small_budget(ONE_SHOT_CAP, REPEATING_CAP, 2);
        let torn_down = Arc::new(AtomicUsize::new(0));

        for label in ["a", "b", "c"] {
            let torn_clone = Arc::clone(&torn_down);
            budget.track_listener(label, None, move || {
                torn_clone.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(budget.counts().listeners, 2);
        assert_eq!(torn_down.load(Ordering::SeqCst), 1, "evicted teardown ran");
    }

    #[tokio::test]
    async fn test_release_owner_spans_all_kinds() {
        let budget = ResourceBudget::default();
        let fired = Arc::new(AtomicUsize::new(0));

        let fired_clone = Arc::clone(&fired);
        budget.schedule_once(Duration::from_millis(60), Some("page"), move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });
        budget.schedule_repeating(Duration::from_millis(60), Some("page"), || {});
        budget.track_listener("scroll", Some("page"), || {});
        budget.schedule_once(Duration::from_millis(60), Some("other"), || {});

        let released = budget.release_owner("page");
        assert_eq!(released, 3);

        let counts = budget.counts();
        assert_eq!(counts.timers, 1);
        assert_eq!(counts.intervals, 0);
        assert_eq!(counts.listeners, 0);

        tokio::time::sleep(Duration::from_millis(140)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0, "released owner's callback stayed silent");
    }

    #[tokio::test]
    async fn test_emergency_release_all() {
        let budget = ResourceBudget::default();
        let torn_down = Arc::new(AtomicUsize::new(0));

        budget.schedule_once(Duration::from_secs(60), None, || {});
        budget.schedule_repeating(Duration::from_secs(60), None, || {});
        let torn_clone = Arc::clone(&torn_down);
        budget.track_listener("x", None, move || {
            torn_clone.fetch_add(1, Ordering::SeqCst);
        });
        budget.cache_set("k", json!(1), None);

        budget.emergency_release_all();

        let counts = budget.counts();
        assert_eq!(counts.timers, 0);
        assert_eq!(counts.intervals, 0);
        assert_eq!(counts.listeners, 0);
        assert_eq!(counts.cache_entries, 0);
        assert_eq!(torn_down.load(Ordering::SeqCst), 1);
        assert_eq!(budget.cache_get("k"), None);
    }

    #[tokio::test]
    async fn test_side_cache_delegation() {
        let budget = ResourceBudget::default();

        budget.cache_set("user:1", json!({"name": "alice"}), None);
        budget.cache_set("txn:1", json!({"amount": 10}), None);

        assert_eq!(budget.cache_get("user:1"), Some(json!({"name": "alice"})));
        assert_eq!(budget.cache_clear(Some("user:")), 1);
        assert_eq!(budget.counts().cache_entries, 1);
    }

    #[tokio::test]
    async fn test_memory_usage_reports_or_declines() {
        let budget = ResourceBudget::default();

        // Either the platform reports real numbers or the call declines;
        // it never fabricates.
        if let Some(usage) = budget.memory_usage() {
            assert!(usage.used_mb > 0);
            assert!(usage.limit_mb >= usage.used_mb);
        }
    }
}
