//! Pagination Module
//!
//! Normalizes caller-supplied paging inputs before they reach the
//! persistence boundary. Whatever arrives, the effective limit always lands
//! in `[1, max_limit]` and the page at 1 or above; missing or unparsable
//! values fall back to the defaults. Handing an unclamped limit to the
//! store is a correctness bug, not a tuning knob.

use serde::Serialize;

/// Page used when none is supplied.
pub const DEFAULT_PAGE: i64 = 1;

/// Limit used when none is supplied.
pub const DEFAULT_LIMIT: i64 = 10;

/// Upper bound for the per-page limit.
pub const MAX_LIMIT: u64 = 100;

// == Pagination ==
/// Clamped paging parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    /// Records to skip: `(page - 1) * limit`
    pub skip: u64,
}

impl Pagination {
    // == Clamped ==
    /// Builds pagination from raw numeric inputs.
    ///
    /// # Arguments
    /// * `page` - Requested page; values below 1 become 1
    /// * `limit` - Requested page size; clamped into `[1, max_limit]`
    /// * `max_limit` - Upper bound for the page size
    pub fn clamped(page: i64, limit: i64, max_limit: u64) -> Self {
        let page = page.max(1) as u64;
        let limit = limit.clamp(1, max_limit.max(1) as i64) as u64;

        Self {
            page,
            limit,
            skip: (page - 1) * limit,
        }
    }

    // == From Query ==
    /// Builds pagination from raw query-string values.
    ///
    /// Missing or unparsable values take the defaults; out-of-range numbers
    /// are clamped.
    pub fn from_query(page: Option<&str>, limit: Option<&str>, max_limit: u64) -> Self {
        let page = parse_or(page, DEFAULT_PAGE);
        let limit = parse_or(limit, DEFAULT_LIMIT);
        Self::clamped(page, limit, max_limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::clamped(DEFAULT_PAGE, DEFAULT_LIMIT, MAX_LIMIT)
    }
}

fn parse_or(raw: Option<&str>, fallback: i64) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(fallback)
}

// == Pageable ==
/// Boundary trait for query builders that understand skip/take.
pub trait Pageable: Sized {
    fn skip(self, count: u64) -> Self;
    fn take(self, count: u64) -> Self;
}

/// Applies clamped pagination to a query builder.
pub fn paginate<Q: Pageable>(query: Q, pagination: &Pagination) -> Q {
    query.skip(pagination.skip).take(pagination.limit)
}
