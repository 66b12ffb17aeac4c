use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::{core::app_state::AppState, routes::request_id};

/// `GET /functions`: the published function catalog.
pub async fn list_functions_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    debug!(request_id = %request_id(&headers), "list_functions_route");
    Json(state.executor.catalog()).into_response()
}
