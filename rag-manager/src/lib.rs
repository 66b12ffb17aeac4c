//! Retrieval manager: turns text into stored points and answers similarity
//! and metadata queries by coordinating an [`EmbeddingProvider`] with a
//! [`VectorStore`].
//!
//! [`EmbeddingProvider`]: embedding_service::EmbeddingProvider
//! [`VectorStore`]: rag_store::VectorStore

pub mod errors;
pub mod manager;
pub mod metadata;
pub mod structs;

pub use errors::manager_error::RagManagerError;
pub use manager::RetrievalManager;
pub use structs::manager_config::ManagerConfig;
pub use structs::results::{
    AddDocumentResult, BatchAddResult, DimensionSource, ManagerHealth, MetadataResults,
    SearchResults,
};
