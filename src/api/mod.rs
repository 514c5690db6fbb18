//! API Module
//!
//! HTTP handlers, middleware and routing for the reporting and
//! administration REST API.
//!
//! # Endpoints
//! - `GET /stats` - Cache counters and process memory
//! - `GET /memory` - Composite memory and resource report
//! - `GET /report` - Full performance report
//! - `GET /realtime` - Cheap dashboard snapshot
//! - `GET /health` - Health score and status
//! - `POST /cache/clear` - Bulk invalidation, optionally by pattern
//! - `DELETE /cache/:key` - Single-key removal

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use middleware::{api_cache, monitor_query, track_requests, QueryName};
pub use routes::create_router;
