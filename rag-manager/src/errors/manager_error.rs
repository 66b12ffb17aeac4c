//! Unified error type for the rag-manager crate.

use embedding_service::EmbeddingError;
use rag_store::StoreError;
use thiserror::Error;

/// Errors produced by the retrieval manager.
///
/// `Embedding` and `Store` are provider failures: they carry the adapter's
/// message unchanged and are never retried here.
#[derive(Debug, Error)]
pub enum RagManagerError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Embeddings backend ──────────────────────────────────────────────────
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    // ── Vector store ────────────────────────────────────────────────────────
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RagManagerError {
    /// `true` for failures raised by the embedding provider or the vector store.
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Embedding(_) | Self::Store(_))
    }
}
