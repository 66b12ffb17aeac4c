//! Retrieval manager: coordinates the embedding provider and the vector store.
//!
//! The manager owns no collection state of its own. Its only cached value is the
//! expected embedding dimension, learned once at construction and read-only after.
//!
//! Dimension policy: advisory. Vectors whose length differs from the expected
//! dimension are logged and still written; the store decides whether it accepts
//! them.

use std::sync::Arc;
use std::time::Instant;

use embedding_service::EmbeddingProvider;
use rag_store::{CollectionInfo, DistanceKind, MetadataFilter, NewPoint, VectorStore};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::errors::manager_error::RagManagerError;
use crate::metadata::build_payload;
use crate::structs::manager_config::ManagerConfig;
use crate::structs::results::{
    AddDocumentResult, BatchAddResult, DimensionSource, ManagerHealth, MetadataResults,
    SearchResults,
};

pub struct RetrievalManager {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    cfg: ManagerConfig,
    dimension: usize,
    dimension_source: DimensionSource,
}

impl RetrievalManager {
    /// Builds the manager and probes the provider's embedding dimension.
    ///
    /// Never fails: a failed probe falls back to `cfg.fallback_dimension`.
    pub async fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        cfg: ManagerConfig,
    ) -> Self {
        let (dimension, dimension_source) = match embedder.embed(&cfg.probe_text).await {
            Ok(v) if !v.is_empty() => (v.len(), DimensionSource::Probed),
            Ok(_) => {
                warn!(
                    target: "rag_manager::startup",
                    fallback = cfg.fallback_dimension,
                    "dimension probe returned an empty vector; using fallback"
                );
                (cfg.fallback_dimension, DimensionSource::Fallback)
            }
            Err(e) => {
                warn!(
                    target: "rag_manager::startup",
                    error = %e,
                    fallback = cfg.fallback_dimension,
                    "dimension probe failed; using fallback"
                );
                (cfg.fallback_dimension, DimensionSource::Fallback)
            }
        };

        info!(
            target: "rag_manager::startup",
            dimension,
            source = ?dimension_source,
            store = store.backend(),
            "RetrievalManager initialized"
        );

        Self {
            embedder,
            store,
            cfg,
            dimension,
            dimension_source,
        }
    }

    /// Expected embedding dimension for the process lifetime.
    pub fn embedding_dimension(&self) -> usize {
        self.dimension
    }

    pub fn dimension_source(&self) -> DimensionSource {
        self.dimension_source
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.cfg
    }

    /// Compares `vector` against the expected dimension.
    ///
    /// Returns `false` and logs a warning on mismatch; callers proceed regardless.
    pub fn check_dimension(&self, vector: &[f32]) -> bool {
        if vector.len() == self.dimension {
            return true;
        }
        warn!(
            target: "rag_manager::dimension",
            expected = self.dimension,
            got = vector.len(),
            "embedding dimension mismatch"
        );
        false
    }

    /* ------------------------------ Documents ------------------------------ */

    /// Embeds `text` and stores it with `metadata` merged into the payload.
    pub async fn add_document(
        &self,
        text: &str,
        collection: &str,
        metadata: Option<&Value>,
    ) -> Result<AddDocumentResult, RagManagerError> {
        let started = Instant::now();
        let vector = self.embedder.embed(text).await?;
        self.check_dimension(&vector);

        let payload = build_payload(text, metadata);
        let id = self.store.upsert(collection, vector, payload.clone()).await?;

        info!(
            target: "rag_manager::add",
            collection,
            point_id = id,
            latency_ms = started.elapsed().as_millis(),
            "document added"
        );
        Ok(AddDocumentResult { id, payload })
    }

    /// Embeds all `documents` in one provider call and writes them in one upsert.
    ///
    /// `metadatas` pairs with `documents` by position; missing entries mean no metadata.
    pub async fn batch_add_documents(
        &self,
        documents: &[String],
        metadatas: Option<&[Value]>,
        collection: &str,
    ) -> Result<BatchAddResult, RagManagerError> {
        if documents.is_empty() {
            return Ok(BatchAddResult {
                status: "success",
                message: "no documents to add".into(),
                collection: collection.to_string(),
                count: 0,
                operation_id: None,
                ids: Vec::new(),
            });
        }

        let started = Instant::now();
        let vectors = self.embedder.embed_batch(documents).await?;

        let points: Vec<NewPoint> = documents
            .iter()
            .zip(vectors)
            .enumerate()
            .map(|(i, (text, vector))| {
                self.check_dimension(&vector);
                let meta = metadatas.and_then(|m| m.get(i));
                NewPoint {
                    vector,
                    payload: build_payload(text, meta),
                }
            })
            .collect();

        let receipt = self.store.upsert_batch(collection, points).await?;
        let count = receipt.ids.len();

        info!(
            target: "rag_manager::add",
            collection,
            count,
            operation_id = ?receipt.operation_id,
            latency_ms = started.elapsed().as_millis(),
            "batch added"
        );

        Ok(BatchAddResult {
            status: "success",
            message: format!("added {count} documents to '{collection}'"),
            collection: collection.to_string(),
            count,
            operation_id: receipt.operation_id,
            ids: receipt.ids,
        })
    }

    /// Deletes one point. Unknown ids are a no-op.
    pub async fn delete_document(
        &self,
        collection: &str,
        point_id: u64,
    ) -> Result<(), RagManagerError> {
        self.store.delete_point(collection, point_id).await?;
        info!(target: "rag_manager::delete", collection, point_id, "document deleted");
        Ok(())
    }

    /* ------------------------------- Search -------------------------------- */

    /// Similarity search; `threshold` defaults to the configured value (0.8).
    pub async fn search(
        &self,
        query: &str,
        collection: &str,
        threshold: Option<f32>,
    ) -> Result<SearchResults, RagManagerError> {
        let started = Instant::now();
        let threshold = threshold.unwrap_or(self.cfg.default_threshold);
        let vector = self.embedder.embed(query).await?;
        self.check_dimension(&vector);

        let results = self
            .store
            .search(collection, vector, self.cfg.search_limit, Some(threshold))
            .await?;

        debug!(
            target: "rag_manager::search",
            collection,
            threshold,
            hits = results.len(),
            latency_ms = started.elapsed().as_millis(),
            "search completed"
        );
        Ok(SearchResults { results })
    }

    /// Exact-match scan. Null/empty filter values are dropped first; with nothing
    /// left, or with no such collection, the result is empty.
    pub async fn search_by_metadata(
        &self,
        collection: &str,
        filters: &Map<String, Value>,
    ) -> Result<MetadataResults, RagManagerError> {
        let filter = MetadataFilter::from_map(filters);
        if filter.is_empty() {
            debug!(target: "rag_manager::search", collection, "no usable metadata filters");
            return Ok(MetadataResults {
                results: Vec::new(),
            });
        }
        if !self.store.collection_exists(collection).await? {
            debug!(target: "rag_manager::search", collection, "collection absent");
            return Ok(MetadataResults {
                results: Vec::new(),
            });
        }

        let results = self.store.scan_by_metadata(collection, &filter).await?;
        debug!(
            target: "rag_manager::search",
            collection,
            constraints = filter.equals.len(),
            hits = results.len(),
            "metadata search completed"
        );
        Ok(MetadataResults { results })
    }

    /* ----------------------------- Collections ----------------------------- */

    /// Creates `name` with the expected dimension and cosine distance.
    ///
    /// Returns `false` if the collection already existed.
    pub async fn create_collection(&self, name: &str) -> Result<bool, RagManagerError> {
        let created = self
            .store
            .create_collection(name, self.dimension, DistanceKind::Cosine)
            .await?;
        info!(
            target: "rag_manager::collections",
            collection = name,
            vector_size = self.dimension,
            created,
            "create_collection"
        );
        Ok(created)
    }

    /// Returns `false` if the collection did not exist.
    pub async fn delete_collection(&self, name: &str) -> Result<bool, RagManagerError> {
        let deleted = self.store.delete_collection(name).await?;
        info!(target: "rag_manager::collections", collection = name, deleted, "delete_collection");
        Ok(deleted)
    }

    pub async fn collection_exists(&self, name: &str) -> Result<bool, RagManagerError> {
        Ok(self.store.collection_exists(name).await?)
    }

    pub async fn list_collections(&self) -> Result<Vec<String>, RagManagerError> {
        Ok(self.store.list_collections().await?)
    }

    pub async fn collection_info(&self, name: &str) -> Result<CollectionInfo, RagManagerError> {
        Ok(self.store.collection_info(name).await?)
    }

    /* ------------------------------- Health -------------------------------- */

    /// Probes both adapters concurrently. Never fails.
    pub async fn health(&self) -> ManagerHealth {
        let (embedding, store) = tokio::join!(self.embedder.probe(), self.store.probe());
        ManagerHealth {
            ok: embedding.ok && store.ok,
            embedding_dimension: self.dimension,
            dimension_source: self.dimension_source,
            embedding,
            store,
        }
    }
}

