pub mod functions;
pub mod health_route;

use axum::http::HeaderMap;

use crate::middleware_layer::request_id::REQUEST_ID_HEADER;

/// Request id set by the middleware, or `-`.
pub(crate) fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
}
