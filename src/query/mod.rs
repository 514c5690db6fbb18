//! Query Module
//!
//! Read-side query hygiene: pagination clamping ahead of the persistence
//! boundary, structural filter documents, and the cached-query wrapper
//! combining the cache facade with query latency telemetry.

mod cached;
mod filters;
mod pagination;

// Re-export public types
pub use cached::QueryLayer;
pub use filters::FilterBuilder;
pub use pagination::{paginate, Pageable, Pagination, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
