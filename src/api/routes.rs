//! API Routes
//!
//! Configures the Axum router with every reporting and administration
//! endpoint.

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_cache_handler, delete_key_handler, health_handler, memory_handler, realtime_handler,
    report_handler, stats_handler, AppState,
};
use super::middleware::track_requests;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /stats` - Cache counters and process memory
/// - `GET /memory` - Composite memory and resource report
/// - `GET /report` - Full performance report
/// - `GET /realtime` - Cheap dashboard snapshot
/// - `GET /health` - Health score and status
/// - `POST /cache/clear` - Bulk invalidation, optionally by pattern
/// - `DELETE /cache/:key` - Single-key removal
///
/// # Middleware
/// - Request tracking: Times every request and tags `x-response-time`
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/stats", get(stats_handler))
        .route("/memory", get(memory_handler))
        .route("/report", get(report_handler))
        .route("/realtime", get(realtime_handler))
        .route("/health", get(health_handler))
        .route("/cache/clear", post(clear_cache_handler))
        .route("/cache/:key", delete(delete_key_handler))
        .layer(from_fn_with_state(state.clone(), track_requests))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
