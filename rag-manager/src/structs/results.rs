//! Result shapes returned by [`crate::RetrievalManager`].

use embedding_service::HealthStatus;
use rag_store::{Payload, SearchHit, StoreHealth, StoredPoint};
use serde::Serialize;

/// A stored document: its id and the payload actually written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddDocumentResult {
    pub id: u64,
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    /// Best first.
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataResults {
    pub results: Vec<StoredPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchAddResult {
    pub status: &'static str,
    pub message: String,
    pub collection: String,
    pub count: usize,
    pub operation_id: Option<u64>,
    /// Assigned ids, in input order.
    pub ids: Vec<u64>,
}

/// Where the manager's expected dimension came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionSource {
    Probed,
    Fallback,
}

/// Snapshot of both adapters.
#[derive(Debug, Clone, Serialize)]
pub struct ManagerHealth {
    pub ok: bool,
    pub embedding_dimension: usize,
    pub dimension_source: DimensionSource,
    pub embedding: HealthStatus,
    pub store: StoreHealth,
}
