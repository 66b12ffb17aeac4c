//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for vector store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// Operation targeted a collection the backend does not know.
    #[error("collection '{0}' not found")]
    CollectionNotFound(String),

    /// Vector length differs from the collection's declared size.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Payload could not be converted to or from the backend format.
    #[error("payload error: {0}")]
    Payload(String),

    /// Backend cannot serve the request (e.g. unsupported distance).
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl From<qdrant_client::QdrantError> for StoreError {
    fn from(e: qdrant_client::QdrantError) -> Self {
        StoreError::Qdrant(e.to_string())
    }
}
