//! Function catalog and dispatcher.
//!
//! [`Catalog`] publishes the callable functions with their parameter schema.
//! [`FunctionExecutor`] validates raw parameter maps into typed requests, checks
//! collection state and forwards to [`rag_manager::RetrievalManager`].

mod catalog;
mod errors;
mod executor;
mod locks;
mod requests;

pub use catalog::{
    Catalog, FunctionDescriptor, FunctionId, LEGACY_SEARCH_BY_PAYLOAD, ParamSpec, ParamType,
    ServiceEntry,
};
pub use errors::DispatchError;
pub use executor::FunctionExecutor;
pub use locks::CollectionLocks;
pub use requests::{
    AddDocumentRequest, BatchAddRequest, CollectionRequest, DeleteByIdRequest,
    MetadataSearchRequest, SearchRequest,
};
