//! Core data models exchanged with the store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Point payload: string keys to arbitrary JSON values.
pub type Payload = Map<String, Value>;

/// A point to be written; the store assigns its id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPoint {
    pub vector: Vec<f32>,
    pub payload: Payload,
}

/// A point read back from a scan (vector omitted).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredPoint {
    pub id: u64,
    pub payload: Payload,
}

/// A single similarity hit. Hits are returned in descending score order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: u64,
    pub score: f32,
    pub payload: Payload,
}

/// Result of a (batch) upsert.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpsertReceipt {
    /// Assigned ids in input order.
    pub ids: Vec<u64>,
    /// Backend operation id, when the backend reports one.
    pub operation_id: Option<u64>,
}

/// Collection summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    /// Collection name.
    pub id: String,
    pub point_count: u64,
    /// `None` when the collection uses named or sparse vectors.
    pub vector_size: Option<u64>,
    pub status: String,
}

/// Connectivity probe outcome. Produced by `probe()`, which never fails.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StoreHealth {
    pub backend: &'static str,
    pub ok: bool,
    pub latency_ms: u128,
    /// Number of collections seen by the probe, when it succeeded.
    pub collections: Option<usize>,
    pub message: String,
}
