//! HTTP surface over the function dispatcher.

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

pub use crate::core::{api_config::ApiConfig, app_state::AppState};
pub use crate::error_handler::{AppError, AppResult};

use crate::middleware_layer::request_id::ensure_request_id;
use crate::routes::{
    functions::{
        execute_function_route::execute_function_route,
        list_functions_route::list_functions_route,
    },
    health_route::health_route,
};

/// Builds the state from the environment and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let cfg = ApiConfig::from_env();
    let state = Arc::new(AppState::from_env().await?);

    let listener = TcpListener::bind(&cfg.address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %cfg.address, "api listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("api stopped");
    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/functions", get(list_functions_route))
        .route("/functions/{function_id}", post(execute_function_route))
        .route("/health", get(health_route))
        .fallback(|| async { AppError::NotFound })
        .layer(middleware::from_fn(ensure_request_id))
        .with_state(state)
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
