use std::sync::Arc;

use embedding_service::{EmbeddingConfig, HttpEmbedder};
use function_executor::FunctionExecutor;
use rag_manager::{ManagerConfig, RetrievalManager};
use rag_store::StoreConfig;
use tracing::info;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<FunctionExecutor>,
}

impl AppState {
    pub fn new(executor: Arc<FunctionExecutor>) -> Self {
        Self { executor }
    }

    /// Wires the embedding provider, vector store, manager and dispatcher from
    /// environment variables.
    pub async fn from_env() -> Result<Self, AppError> {
        let embedding_cfg = EmbeddingConfig::from_env()?;
        let store_cfg = StoreConfig::from_env()?;
        let manager_cfg = ManagerConfig::from_env()?;

        info!(
            embedding = %embedding_cfg.endpoint,
            store = ?store_cfg.backend,
            "building application state"
        );

        let embedder = Arc::new(HttpEmbedder::new(embedding_cfg)?);
        let store = rag_store::connect(&store_cfg)?;
        let manager = RetrievalManager::new(embedder, store, manager_cfg).await;

        Ok(Self::new(Arc::new(FunctionExecutor::new(Arc::new(manager)))))
    }

    pub fn manager(&self) -> &RetrievalManager {
        self.executor.manager()
    }
}
