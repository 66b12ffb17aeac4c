//! Process-local [`VectorStore`] with brute-force scoring.
//!
//! Mirrors the Qdrant behaviour the rest of the workspace relies on: explicit
//! collection creation, fixed vector size per collection, id-ordered scans and
//! silent deletes of unknown ids. Dot and cosine distances are supported.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::DistanceKind;
use crate::errors::StoreError;
use crate::filters::MetadataFilter;
use crate::point_id::PointIdGenerator;
use crate::record::{
    CollectionInfo, NewPoint, Payload, SearchHit, StoreHealth, StoredPoint, UpsertReceipt,
};
use crate::store::VectorStore;

struct MemCollection {
    vector_size: usize,
    distance: DistanceKind,
    points: BTreeMap<u64, (Vec<f32>, Payload)>,
}

#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, MemCollection>>,
    ids: PointIdGenerator,
    operations: std::sync::atomic::AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_operation(&self) -> u64 {
        self.operations
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
    }
}

#[async_trait]
impl VectorStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create_collection(
        &self,
        name: &str,
        vector_size: usize,
        distance: DistanceKind,
    ) -> Result<bool, StoreError> {
        if distance == DistanceKind::Euclid {
            return Err(StoreError::Unsupported(
                "in-memory store supports cosine and dot distances".into(),
            ));
        }
        if vector_size == 0 {
            return Err(StoreError::Config("vector_size must be > 0".into()));
        }

        let mut map = self.collections.write().await;
        if map.contains_key(name) {
            return Ok(false);
        }
        map.insert(
            name.to_string(),
            MemCollection {
                vector_size,
                distance,
                points: BTreeMap::new(),
            },
        );
        debug!(target: "rag_store::memory", collection = name, vector_size, "collection created");
        Ok(true)
    }

    async fn delete_collection(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.collections.write().await.remove(name).is_some())
    }

    async fn collection_exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.collections.read().await.contains_key(name))
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn collection_info(&self, name: &str) -> Result<CollectionInfo, StoreError> {
        let map = self.collections.read().await;
        let c = map
            .get(name)
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))?;
        Ok(CollectionInfo {
            id: name.to_string(),
            point_count: c.points.len() as u64,
            vector_size: Some(c.vector_size as u64),
            status: "green".into(),
        })
    }

    async fn upsert_batch(
        &self,
        collection: &str,
        points: Vec<NewPoint>,
    ) -> Result<UpsertReceipt, StoreError> {
        let mut map = self.collections.write().await;
        let c = map
            .get_mut(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;

        // Validate the whole batch first so a bad point leaves the collection untouched.
        if let Some(bad) = points.iter().find(|p| p.vector.len() != c.vector_size) {
            return Err(StoreError::VectorSizeMismatch {
                got: bad.vector.len(),
                want: c.vector_size,
            });
        }

        let ids: Vec<u64> = points
            .into_iter()
            .map(|p| {
                let id = self.ids.next_id();
                c.points.insert(id, (p.vector, p.payload));
                id
            })
            .collect();

        Ok(UpsertReceipt {
            ids,
            operation_id: Some(self.next_operation()),
        })
    }

    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
        score_threshold: Option<f32>,
    ) -> Result<Vec<SearchHit>, StoreError> {
        let map = self.collections.read().await;
        let c = map
            .get(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;
        if vector.len() != c.vector_size {
            return Err(StoreError::VectorSizeMismatch {
                got: vector.len(),
                want: c.vector_size,
            });
        }

        let mut hits: Vec<SearchHit> = c
            .points
            .iter()
            .map(|(id, (v, payload))| SearchHit {
                id: *id,
                score: score(c.distance, &vector, v),
                payload: payload.clone(),
            })
            .filter(|h| score_threshold.is_none_or(|t| h.score >= t))
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));
        hits.truncate(limit as usize);
        Ok(hits)
    }

    async fn scan_by_metadata(
        &self,
        collection: &str,
        filter: &MetadataFilter,
    ) -> Result<Vec<StoredPoint>, StoreError> {
        let map = self.collections.read().await;
        let c = map
            .get(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;

        Ok(c.points
            .iter()
            .filter(|(_, (_, payload))| filter.matches(payload))
            .map(|(id, (_, payload))| StoredPoint {
                id: *id,
                payload: payload.clone(),
            })
            .collect())
    }

    async fn delete_point(&self, collection: &str, point_id: u64) -> Result<(), StoreError> {
        let mut map = self.collections.write().await;
        let c = map
            .get_mut(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;
        c.points.remove(&point_id);
        Ok(())
    }

    async fn probe(&self) -> StoreHealth {
        StoreHealth {
            backend: self.backend(),
            ok: true,
            latency_ms: 0,
            collections: Some(self.collections.read().await.len()),
            message: "in-memory store".into(),
        }
    }
}

fn score(distance: DistanceKind, a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    match distance {
        DistanceKind::Dot => dot,
        // Euclid collections are refused at creation.
        DistanceKind::Cosine | DistanceKind::Euclid => {
            let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
            if na == 0.0 || nb == 0.0 {
                0.0
            } else {
                dot / (na * nb)
            }
        }
    }
}
