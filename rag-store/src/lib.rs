//! Vector store adapter: named collections of points over Qdrant.
//!
//! This crate provides:
//! - [`VectorStore`], the backend-neutral contract (collections, upserts, search, scans)
//! - [`QdrantFacade`], the Qdrant implementation
//! - [`InMemoryStore`], a process-local implementation for tests and local runs
//!
//! The design is flat (no deep nesting) and splits responsibilities into focused modules.

mod config;
mod errors;
mod filters;
mod memory_store;
mod point_id;
mod qdrant_facade;
mod record;
mod store;

use std::sync::Arc;

pub use config::{DistanceKind, StoreBackend, StoreConfig};
pub use errors::StoreError;
pub use filters::{MetadataFilter, coerce_to_text};
pub use memory_store::InMemoryStore;
pub use point_id::PointIdGenerator;
pub use qdrant_facade::QdrantFacade;
pub use record::{
    CollectionInfo, NewPoint, Payload, SearchHit, StoreHealth, StoredPoint, UpsertReceipt,
};
pub use store::{DEFAULT_SEARCH_LIMIT, VectorStore};

use tracing::info;

/// Builds the store selected by `cfg.backend`.
///
/// # Errors
/// Returns `StoreError::Config`/`StoreError::Qdrant` if the client cannot be built.
pub fn connect(cfg: &StoreConfig) -> Result<Arc<dyn VectorStore>, StoreError> {
    info!(target: "rag_store", backend = ?cfg.backend, "connecting vector store");
    Ok(match cfg.backend {
        StoreBackend::Qdrant => Arc::new(QdrantFacade::new(cfg)?),
        StoreBackend::Memory => Arc::new(InMemoryStore::new()),
    })
}
