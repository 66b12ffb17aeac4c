//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All Qdrant interactions sit behind [`VectorStore`], hiding the builder API
//! and keeping the rest of the workspace decoupled from `qdrant-client`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{
    CollectionInfo as QCollectionInfo, CreateCollectionBuilder, DeletePointsBuilder, Distance,
    PointId, PointStruct, ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder,
    Value as QValue, VectorParamsBuilder, vectors_config::Config as VectorsConfig,
};
use qdrant_client::{Payload as QPayload, Qdrant};
use tracing::{debug, info, warn};

use crate::config::{DistanceKind, StoreConfig};
use crate::errors::StoreError;
use crate::filters::{MetadataFilter, to_qdrant_filter};
use crate::point_id::PointIdGenerator;
use crate::record::{
    CollectionInfo, NewPoint, Payload, SearchHit, StoreHealth, StoredPoint, UpsertReceipt,
};
use crate::store::VectorStore;

/// Points fetched per scroll request during exhaustive scans.
const SCAN_PAGE_SIZE: u32 = 256;

/// Qdrant-backed [`VectorStore`].
pub struct QdrantFacade {
    client: Qdrant,
    ids: PointIdGenerator,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// Building the client does not touch the server.
    pub fn new(cfg: &StoreConfig) -> Result<Self, StoreError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| StoreError::Qdrant(format!("client build: {e}")))?;

        info!(
            target: "rag_store::qdrant",
            url = %cfg.qdrant_url,
            timeout_secs = cfg.timeout_secs,
            "QdrantFacade initialized"
        );

        Ok(Self {
            client,
            ids: PointIdGenerator::new(),
        })
    }
}

#[async_trait]
impl VectorStore for QdrantFacade {
    fn backend(&self) -> &'static str {
        "qdrant"
    }

    async fn create_collection(
        &self,
        name: &str,
        vector_size: usize,
        distance: DistanceKind,
    ) -> Result<bool, StoreError> {
        if self.collection_exists(name).await? {
            debug!(target: "rag_store::qdrant", collection = name, "collection already exists");
            return Ok(false);
        }

        let res = self
            .client
            .create_collection(
                CreateCollectionBuilder::new(name).vectors_config(VectorParamsBuilder::new(
                    vector_size as u64,
                    to_qdrant_distance(distance),
                )),
            )
            .await
            .map_err(|e| StoreError::Qdrant(format!("create_collection: {e}")))?;

        info!(
            target: "rag_store::qdrant",
            collection = name,
            vector_size,
            distance = ?distance,
            "collection created"
        );
        Ok(res.result)
    }

    async fn delete_collection(&self, name: &str) -> Result<bool, StoreError> {
        if !self.collection_exists(name).await? {
            return Ok(false);
        }
        let res = self
            .client
            .delete_collection(name)
            .await
            .map_err(|e| StoreError::Qdrant(format!("delete_collection: {e}")))?;
        info!(target: "rag_store::qdrant", collection = name, "collection deleted");
        Ok(res.result)
    }

    async fn collection_exists(&self, name: &str) -> Result<bool, StoreError> {
        self.client
            .collection_exists(name)
            .await
            .map_err(|e| StoreError::Qdrant(format!("collection_exists: {e}")))
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        let res = self.client.list_collections().await?;
        Ok(res.collections.into_iter().map(|c| c.name).collect())
    }

    async fn collection_info(&self, name: &str) -> Result<CollectionInfo, StoreError> {
        let res = self
            .client
            .collection_info(name)
            .await
            .map_err(|e| StoreError::Qdrant(format!("collection_info: {e}")))?;
        let info = res
            .result
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))?;

        Ok(CollectionInfo {
            id: name.to_string(),
            point_count: info.points_count.unwrap_or(0),
            vector_size: vector_size_of(&info),
            status: info.status().as_str_name().to_lowercase(),
        })
    }

    async fn upsert_batch(
        &self,
        collection: &str,
        points: Vec<NewPoint>,
    ) -> Result<UpsertReceipt, StoreError> {
        if points.is_empty() {
            debug!(target: "rag_store::qdrant", collection, "no points provided for upsert");
            return Ok(UpsertReceipt {
                ids: Vec::new(),
                operation_id: None,
            });
        }

        let mut ids = Vec::with_capacity(points.len());
        let mut structs = Vec::with_capacity(points.len());
        for p in points {
            let id = self.ids.next_id();
            let payload: QPayload = serde_json::Value::Object(p.payload)
                .try_into()
                .map_err(|e| StoreError::Payload(format!("payload convert: {e}")))?;
            structs.push(PointStruct::new(id, p.vector, payload));
            ids.push(id);
        }

        let res = self
            .client
            .upsert_points(UpsertPointsBuilder::new(collection, structs).wait(true))
            .await
            .map_err(|e| StoreError::Qdrant(format!("upsert_points: {e}")))?;

        let operation_id = res.result.and_then(|r| r.operation_id);
        debug!(
            target: "rag_store::qdrant",
            collection,
            count = ids.len(),
            operation_id = ?operation_id,
            "points upserted"
        );

        Ok(UpsertReceipt { ids, operation_id })
    }

    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
        score_threshold: Option<f32>,
    ) -> Result<Vec<SearchHit>, StoreError> {
        let mut builder = SearchPointsBuilder::new(collection, vector, limit).with_payload(true);
        if let Some(t) = score_threshold {
            builder = builder.score_threshold(t);
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| StoreError::Qdrant(format!("search_points: {e}")))?;

        let hits: Vec<SearchHit> = res
            .result
            .into_iter()
            .filter_map(|p| {
                let id = numeric_id(p.id)?;
                Some(SearchHit {
                    id,
                    score: p.score,
                    payload: qpayload_to_json(p.payload),
                })
            })
            .collect();

        debug!(target: "rag_store::qdrant", collection, hits = hits.len(), "search completed");
        Ok(hits)
    }

    async fn scan_by_metadata(
        &self,
        collection: &str,
        filter: &MetadataFilter,
    ) -> Result<Vec<StoredPoint>, StoreError> {
        let qfilter = (!filter.is_empty()).then(|| to_qdrant_filter(filter));
        let mut offset: Option<PointId> = None;
        let mut out = Vec::new();

        loop {
            let mut builder = ScrollPointsBuilder::new(collection)
                .limit(SCAN_PAGE_SIZE)
                .with_payload(true)
                .with_vectors(false);
            if let Some(f) = &qfilter {
                builder = builder.filter(f.clone());
            }
            if let Some(o) = offset.take() {
                builder = builder.offset(o);
            }

            let page = self
                .client
                .scroll(builder)
                .await
                .map_err(|e| StoreError::Qdrant(format!("scroll: {e}")))?;

            out.extend(page.result.into_iter().filter_map(|p| {
                Some(StoredPoint {
                    id: numeric_id(p.id)?,
                    payload: qpayload_to_json(p.payload),
                })
            }));

            match page.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        debug!(
            target: "rag_store::qdrant",
            collection,
            constraints = filter.equals.len(),
            points = out.len(),
            "metadata scan completed"
        );
        Ok(out)
    }

    async fn delete_point(&self, collection: &str, point_id: u64) -> Result<(), StoreError> {
        self.client
            .delete_points(
                DeletePointsBuilder::new(collection)
                    .points(vec![PointId::from(point_id)])
                    .wait(true),
            )
            .await
            .map_err(|e| StoreError::Qdrant(format!("delete_points: {e}")))?;
        debug!(target: "rag_store::qdrant", collection, point_id, "point deleted");
        Ok(())
    }

    async fn probe(&self) -> StoreHealth {
        let start = Instant::now();
        match self.client.list_collections().await {
            Ok(res) => StoreHealth {
                backend: self.backend(),
                ok: true,
                latency_ms: start.elapsed().as_millis(),
                collections: Some(res.collections.len()),
                message: "qdrant is reachable".into(),
            },
            Err(e) => {
                warn!(target: "rag_store::qdrant", error = %e, "health probe failed");
                StoreHealth {
                    backend: self.backend(),
                    ok: false,
                    latency_ms: start.elapsed().as_millis(),
                    collections: None,
                    message: e.to_string(),
                }
            }
        }
    }
}

fn to_qdrant_distance(d: DistanceKind) -> Distance {
    match d {
        DistanceKind::Cosine => Distance::Cosine,
        DistanceKind::Dot => Distance::Dot,
        DistanceKind::Euclid => Distance::Euclid,
    }
}

/// Only numeric ids are issued by this crate; UUID points written by others are skipped.
fn numeric_id(id: Option<PointId>) -> Option<u64> {
    match id?.point_id_options? {
        PointIdOptions::Num(n) => Some(n),
        PointIdOptions::Uuid(_) => None,
    }
}

/// Size of the unnamed dense vector, if the collection has one.
fn vector_size_of(info: &QCollectionInfo) -> Option<u64> {
    let vectors = info.config.as_ref()?.params.as_ref()?.vectors_config.as_ref()?;
    match vectors.config.as_ref()? {
        VectorsConfig::Params(p) => Some(p.size),
        VectorsConfig::ParamsMap(_) => None,
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into a JSON map.
fn qpayload_to_json(p: HashMap<String, QValue>) -> Payload {
    p.into_iter().map(|(k, v)| (k, v.into_json())).collect()
}
