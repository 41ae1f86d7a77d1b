//! Shared response envelope types for API handlers.
//!
//! Plain list responses use a `{ "data": [...] }` envelope. Paged responses
//! (`Page` / `Slice`) are their own envelope and are returned as-is.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: persons }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
