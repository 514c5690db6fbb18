//! API Middleware
//!
//! Tower middleware applied to routes: request timing, GET response
//! caching and per-query latency tracking. Each is a plain async
//! function wired with `axum::middleware::from_fn_with_state` so any
//! service built on this crate can attach them to its own routers.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::api::handlers::AppState;
use crate::cache::cache_key;

/// Name attached to a route so `monitor_query` can label its samples.
///
/// Attach with `route_layer(Extension(QueryName("wallet-lookup")))` on
/// the route the middleware wraps.
#[derive(Debug, Clone, Copy)]
pub struct QueryName(pub &'static str);

/// Serialized form of a cached GET response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedResponse {
    status: u16,
    content_type: Option<String>,
    body: String,
}

// == Request Tracking ==
/// Times every request and feeds the performance monitor.
///
/// Success means the response was not a 5xx; client errors still count
/// as served. Adds an `x-response-time` header to the response.
pub async fn track_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();

    let mut response = next.run(request).await;

    let elapsed = started.elapsed();
    let success = !response.status().is_server_error();
    state.monitor.record_request(elapsed, success);

    if let Ok(value) = HeaderValue::from_str(&format!("{}ms", elapsed.as_millis())) {
        response.headers_mut().insert("x-response-time", value);
    }

    response
}

// == Response Caching ==
/// Serves repeated GET requests from the cache.
///
/// Non-GET requests pass through untouched. Successful GET responses
/// with a UTF-8 body are stored under a `response:`-prefixed key for
/// the configured response TTL; later hits skip the handler entirely.
/// An `x-cache` header reports `HIT` or `MISS`.
pub async fn api_cache(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = cache_key("response", &Value::String(request.uri().to_string()));

    if let Some(cached) = state.cache.get::<CachedResponse>(&key).await {
        return rebuild_response(cached);
    }

    let response = next.run(request).await;
    let (parts, body) = response.into_parts();

    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "Failed to read response body for caching");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // Only successful, text-representable responses are worth replaying
    if parts.status.is_success() {
        if let Ok(text) = std::str::from_utf8(&bytes) {
            let entry = CachedResponse {
                status: parts.status.as_u16(),
                content_type: parts
                    .headers
                    .get(header::CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .map(String::from),
                body: text.to_string(),
            };
            state.cache.set(&key, &entry, Some(state.response_ttl)).await;
        }
    }

    let mut response = Response::from_parts(parts, Body::from(bytes));
    response
        .headers_mut()
        .insert("x-cache", HeaderValue::from_static("MISS"));
    response
}

fn rebuild_response(entry: CachedResponse) -> Response {
    let mut response = Response::new(Body::from(entry.body));
    *response.status_mut() = StatusCode::from_u16(entry.status).unwrap_or(StatusCode::OK);

    if let Some(value) = entry
        .content_type
        .and_then(|ct| HeaderValue::from_str(&ct).ok())
    {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
        .headers_mut()
        .insert("x-cache", HeaderValue::from_static("HIT"));

    response
}

// == Query Monitoring ==
/// Records the downstream latency under the route's [`QueryName`].
///
/// Slow samples land in the monitor's slow-query list the same way
/// `cached_query` reports them.
pub async fn monitor_query(
    State(state): State<AppState>,
    Extension(QueryName(name)): Extension<QueryName>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();

    let response = next.run(request).await;

    state.monitor.record_query(name, started.elapsed());
    response
}
