use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::HeaderMap,
};
use serde_json::Value;
use tracing::{debug, error};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::{functions::execute_function_request::ExecuteFunctionRequest, request_id},
};

/// `POST /functions/{function_id}`: runs one function. Functions without
/// outputs answer `null`.
pub async fn execute_function_route(
    State(state): State<Arc<AppState>>,
    Path(function_id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<ExecuteFunctionRequest>, JsonRejection>,
) -> AppResult<Json<Option<Value>>> {
    let request_id = request_id(&headers);
    let Json(req) = body?;

    debug!(
        request_id = %request_id,
        function_id = %function_id,
        "execute_function_route: start"
    );

    match state.executor.execute(&function_id, &req.parameters).await {
        Ok(result) => Ok(Json(result)),
        Err(err) => {
            if !err.is_caller_error() {
                error!(
                    request_id = %request_id,
                    function_id = %function_id,
                    error = %err,
                    "execute_function_route: provider failure"
                );
            }
            Err(AppError::from(err))
        }
    }
}
