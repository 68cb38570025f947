//! Shared response envelope types for API handlers.
//!
//! Single resources are returned bare; lists use the [`PageResponse`]
//! envelope so clients can page through results.

use serde::Serialize;

/// Paginated list envelope: `{ "data": [...], "count": N }`.
///
/// `count` is the total number of matching rows, not the page length.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    pub count: i64,
}
