use async_trait::async_trait;

use crate::config::DistanceKind;
use crate::errors::StoreError;
use crate::filters::MetadataFilter;
use crate::record::{
    CollectionInfo, NewPoint, Payload, SearchHit, StoreHealth, StoredPoint, UpsertReceipt,
};

/// Default number of neighbours returned by [`VectorStore::search`] callers.
pub const DEFAULT_SEARCH_LIMIT: u64 = 5;

/// Operations against named collections of points.
///
/// Collections are never created implicitly: writes, searches and deletes against an
/// unknown collection fail with a backend error.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Short backend name used in logs and health output.
    fn backend(&self) -> &'static str;

    /// Creates the collection unless it already exists.
    ///
    /// Returns `true` if this call created it, `false` if it was already present.
    async fn create_collection(
        &self,
        name: &str,
        vector_size: usize,
        distance: DistanceKind,
    ) -> Result<bool, StoreError>;

    /// Deletes the collection. Returns `false` if it did not exist.
    async fn delete_collection(&self, name: &str) -> Result<bool, StoreError>;

    async fn collection_exists(&self, name: &str) -> Result<bool, StoreError>;

    async fn list_collections(&self) -> Result<Vec<String>, StoreError>;

    async fn collection_info(&self, name: &str) -> Result<CollectionInfo, StoreError>;

    /// Writes one point and returns its freshly assigned id.
    async fn upsert(
        &self,
        collection: &str,
        vector: Vec<f32>,
        payload: Payload,
    ) -> Result<u64, StoreError> {
        let receipt = self
            .upsert_batch(collection, vec![NewPoint { vector, payload }])
            .await?;
        receipt
            .ids
            .first()
            .copied()
            .ok_or_else(|| StoreError::Payload("upsert returned no id".into()))
    }

    /// Writes all points in one store operation; each point gets its own id.
    async fn upsert_batch(
        &self,
        collection: &str,
        points: Vec<NewPoint>,
    ) -> Result<UpsertReceipt, StoreError>;

    /// Nearest neighbours by the collection's distance, best first.
    ///
    /// Hits scoring below `score_threshold` are excluded; without a threshold the
    /// top `limit` hits are returned unfiltered.
    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
        score_threshold: Option<f32>,
    ) -> Result<Vec<SearchHit>, StoreError>;

    /// Exhaustive scan of points whose payload satisfies every filter constraint.
    ///
    /// No limit is applied. An empty filter matches every point.
    async fn scan_by_metadata(
        &self,
        collection: &str,
        filter: &MetadataFilter,
    ) -> Result<Vec<StoredPoint>, StoreError>;

    /// Deletes one point. Deleting an unknown id is a no-op.
    async fn delete_point(&self, collection: &str, point_id: u64) -> Result<(), StoreError>;

    /// Harmless list-collections call. Never fails.
    async fn probe(&self) -> StoreHealth;

    async fn test_connection(&self) -> bool {
        self.probe().await.ok
    }
}
