//! Routes a function id plus raw parameters to the retrieval manager.
//!
//! Every handler decodes its typed request first, then checks collection state,
//! then calls the manager. Handlers that mutate a collection hold that
//! collection's lock from the state check through the mutation.

use std::sync::Arc;
use std::time::Instant;

use rag_manager::RetrievalManager;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, FunctionId, LEGACY_SEARCH_BY_PAYLOAD};
use crate::errors::DispatchError;
use crate::locks::CollectionLocks;
use crate::requests::{
    AddDocumentRequest, BatchAddRequest, CollectionRequest, DeleteByIdRequest,
    MetadataSearchRequest, SearchRequest,
};

type Outcome = Result<Option<Value>, DispatchError>;

pub struct FunctionExecutor {
    manager: Arc<RetrievalManager>,
    catalog: Catalog,
    locks: CollectionLocks,
}

impl FunctionExecutor {
    pub fn new(manager: Arc<RetrievalManager>) -> Self {
        Self {
            manager,
            catalog: Catalog::build(),
            locks: CollectionLocks::new(),
        }
    }

    /// Built once; identical on every call.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn manager(&self) -> &Arc<RetrievalManager> {
        &self.manager
    }

    /// Runs `function_id` with `params`.
    ///
    /// Returns `Ok(None)` for functions that declare no outputs.
    ///
    /// # Errors
    /// `UnknownFunction` for ids outside the routing table, `Parameter` and
    /// `CollectionState` for caller mistakes, `Provider` for downstream failures.
    pub async fn execute(&self, function_id: &str, params: &Map<String, Value>) -> Outcome {
        info!(
            target: "function_executor::dispatch",
            function_id,
            parameters = ?params,
            "execute"
        );

        let Some(function) = FunctionId::resolve(function_id) else {
            warn!(target: "function_executor::dispatch", function_id, "unknown function");
            return Err(DispatchError::UnknownFunction(function_id.to_string()));
        };
        if function_id == LEGACY_SEARCH_BY_PAYLOAD {
            warn!(
                target: "function_executor::dispatch",
                function_id,
                canonical = FunctionId::SearchByMetadata.as_str(),
                "deprecated function id"
            );
        }

        let started = Instant::now();
        let outcome = self.route(function, params).await;

        match &outcome {
            Ok(_) => debug!(
                target: "function_executor::dispatch",
                function_id = function.as_str(),
                latency_ms = started.elapsed().as_millis(),
                "execute ok"
            ),
            Err(e) if e.is_caller_error() => info!(
                target: "function_executor::dispatch",
                function_id = function.as_str(),
                code = e.code(),
                error = %e,
                "execute rejected"
            ),
            Err(e) => warn!(
                target: "function_executor::dispatch",
                function_id = function.as_str(),
                error = %e,
                "execute failed"
            ),
        }
        outcome
    }

    async fn route(&self, function: FunctionId, params: &Map<String, Value>) -> Outcome {
        match function {
            FunctionId::AddToDatabase => self.add_document(params.try_into()?).await,
            FunctionId::BatchAddToDatabase => self.batch_add(params.try_into()?).await,
            FunctionId::SearchDocuments => self.search(params.try_into()?).await,
            FunctionId::SearchByMetadata => self.search_by_metadata(params.try_into()?).await,
            FunctionId::DeleteById => self.delete_by_id(params.try_into()?).await,
            FunctionId::CollectionsList => self.list_collections().await,
            FunctionId::CreateCollection => self.create_collection(params.try_into()?).await,
            FunctionId::DeleteCollection => self.delete_collection(params.try_into()?).await,
            FunctionId::CollectionInfo => self.collection_info(params.try_into()?).await,
        }
    }

    async fn require_existing(&self, name: &str) -> Result<(), DispatchError> {
        if self.manager.collection_exists(name).await? {
            Ok(())
        } else {
            Err(DispatchError::missing_collection(name))
        }
    }

    /* ------------------------------ Documents ------------------------------ */

    async fn add_document(&self, req: AddDocumentRequest) -> Outcome {
        let _guard = self.locks.acquire(&req.collection_name).await;
        self.require_existing(&req.collection_name).await?;

        let added = self
            .manager
            .add_document(&req.text, &req.collection_name, req.metadata.as_ref())
            .await?;
        Ok(Some(json!({
            "addition_result": { "id": added.id, "payload": added.payload }
        })))
    }

    async fn batch_add(&self, req: BatchAddRequest) -> Outcome {
        let _guard = self.locks.acquire(&req.collection_name).await;
        self.require_existing(&req.collection_name).await?;

        let result = self
            .manager
            .batch_add_documents(
                &req.documents,
                req.metadatas.as_deref(),
                &req.collection_name,
            )
            .await?;
        Ok(Some(json!({ "batch_result": result })))
    }

    async fn delete_by_id(&self, req: DeleteByIdRequest) -> Outcome {
        let _guard = self.locks.acquire(&req.collection_name).await;
        self.require_existing(&req.collection_name).await?;

        self.manager
            .delete_document(&req.collection_name, req.id)
            .await?;
        Ok(None)
    }

    /* ------------------------------- Search -------------------------------- */

    async fn search(&self, req: SearchRequest) -> Outcome {
        self.require_existing(&req.collection_name).await?;
        let found = self
            .manager
            .search(&req.query, &req.collection_name, req.threshold)
            .await?;
        Ok(Some(json!({ "search_result": found.results })))
    }

    async fn search_by_metadata(&self, req: MetadataSearchRequest) -> Outcome {
        self.require_existing(&req.collection_name).await?;
        let found = self
            .manager
            .search_by_metadata(&req.collection_name, &req.metadata_filters)
            .await?;
        Ok(Some(json!({ "search_result": found.results })))
    }

    /* ----------------------------- Collections ----------------------------- */

    async fn list_collections(&self) -> Outcome {
        let names = self.manager.list_collections().await?;
        Ok(Some(json!({ "collections_list": names })))
    }

    async fn create_collection(&self, req: CollectionRequest) -> Outcome {
        let name = req.collection_name;
        let _guard = self.locks.acquire(&name).await;
        if self.manager.collection_exists(&name).await? {
            return Err(DispatchError::existing_collection(&name));
        }
        // Another process may have created it between the check and the call.
        if !self.manager.create_collection(&name).await? {
            return Err(DispatchError::existing_collection(&name));
        }
        Ok(Some(json!({ "creation_result": name })))
    }

    async fn delete_collection(&self, req: CollectionRequest) -> Outcome {
        let name = req.collection_name;
        let _guard = self.locks.acquire(&name).await;
        self.require_existing(&name).await?;
        if !self.manager.delete_collection(&name).await? {
            return Err(DispatchError::missing_collection(&name));
        }
        Ok(None)
    }

    async fn collection_info(&self, req: CollectionRequest) -> Outcome {
        self.require_existing(&req.collection_name).await?;
        let info = self.manager.collection_info(&req.collection_name).await?;
        Ok(Some(json!({ "collection_info": info })))
    }
}
