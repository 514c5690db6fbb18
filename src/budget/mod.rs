//! Budget Module
//!
//! Bounds the process's appetite for deferred callbacks, repeating
//! callbacks, listener registrations and scratch cache entries. Every cap is
//! resolved by evicting the oldest live handle, never by failing the caller.

mod handles;
mod side_cache;

// Re-export public types
pub use handles::{
    BudgetLimits, HandleId, MemoryUsage, ResourceBudget, ResourceCounts, LISTENER_CAP,
    ONE_SHOT_CAP, REPEATING_CAP,
};
pub use side_cache::{SideCache, SIDE_CACHE_CAP, SIDE_CACHE_TTL};
