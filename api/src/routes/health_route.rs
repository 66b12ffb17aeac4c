use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::{core::app_state::AppState, routes::request_id};

/// `GET /health`: probes the embedding provider and the vector store.
/// 200 when both answer, 503 otherwise.
pub async fn health_route(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let health = state.manager().health().await;

    if health.ok {
        debug!(request_id = %request_id(&headers), "health ok");
        (StatusCode::OK, Json(health)).into_response()
    } else {
        warn!(
            request_id = %request_id(&headers),
            embedding_ok = health.embedding.ok,
            store_ok = health.store.ok,
            "health degraded"
        );
        (StatusCode::SERVICE_UNAVAILABLE, Json(health)).into_response()
    }
}
