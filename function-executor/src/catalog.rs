//! Machine-readable description of the callable functions.
//!
//! The catalog is built once from [`FunctionId::ALL`], so every published id is
//! routable by construction.

use std::collections::BTreeMap;

use serde::Serialize;

/// Routable functions. `search_by_payload` is accepted as a legacy alias of
/// [`FunctionId::SearchByMetadata`] but never published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionId {
    AddToDatabase,
    BatchAddToDatabase,
    SearchDocuments,
    SearchByMetadata,
    DeleteById,
    CollectionsList,
    CreateCollection,
    DeleteCollection,
    CollectionInfo,
}

pub const LEGACY_SEARCH_BY_PAYLOAD: &str = "search_by_payload";

impl FunctionId {
    pub const ALL: [FunctionId; 9] = [
        FunctionId::AddToDatabase,
        FunctionId::BatchAddToDatabase,
        FunctionId::SearchDocuments,
        FunctionId::SearchByMetadata,
        FunctionId::DeleteById,
        FunctionId::CollectionsList,
        FunctionId::CreateCollection,
        FunctionId::DeleteCollection,
        FunctionId::CollectionInfo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FunctionId::AddToDatabase => "add_to_database",
            FunctionId::BatchAddToDatabase => "batch_add_to_database",
            FunctionId::SearchDocuments => "search_documents",
            FunctionId::SearchByMetadata => "search_by_metadata",
            FunctionId::DeleteById => "delete_by_id",
            FunctionId::CollectionsList => "collections_list",
            FunctionId::CreateCollection => "create_collection",
            FunctionId::DeleteCollection => "delete_collection",
            FunctionId::CollectionInfo => "collection_info",
        }
    }

    /// Resolves a caller-supplied id, including the legacy alias.
    pub fn resolve(id: &str) -> Option<FunctionId> {
        if id == LEGACY_SEARCH_BY_PAYLOAD {
            return Some(FunctionId::SearchByMetadata);
        }
        Self::ALL.into_iter().find(|f| f.as_str() == id)
    }

    pub fn descriptor(self) -> FunctionDescriptor {
        let collection = || ParamSpec::new("Collection", "collection_name", ParamType::String);
        match self {
            FunctionId::AddToDatabase => FunctionDescriptor::new(
                self,
                "Add to knowledge base",
                "Adds a document to the vector database",
                vec![
                    ParamSpec::new("Document text", "text", ParamType::String),
                    ParamSpec::new("Metadata", "metadata", ParamType::Map).optional(),
                    collection(),
                ],
                vec![
                    ParamSpec::new("Added document", "addition_result", ParamType::Map),
                ],
            ),
            FunctionId::BatchAddToDatabase => FunctionDescriptor::new(
                self,
                "Batch add to knowledge base",
                "Adds several documents with a single embedding call and one write",
                vec![
                    ParamSpec::new("Documents", "documents", ParamType::Array)
                        .of(ParamType::String),
                    ParamSpec::new("Metadata per document", "metadatas", ParamType::Array)
                        .of(ParamType::Map)
                        .optional(),
                    collection(),
                ],
                vec![ParamSpec::new("Batch result", "batch_result", ParamType::Map)],
            ),
            FunctionId::SearchDocuments => FunctionDescriptor::new(
                self,
                "Search documents",
                "Finds documents by meaning in the vector database",
                vec![
                    ParamSpec::new("Query", "query", ParamType::String),
                    ParamSpec::new("Similarity threshold", "threshold", ParamType::Number)
                        .optional(),
                    collection(),
                ],
                vec![
                    ParamSpec::new("Found documents", "search_result", ParamType::Array)
                        .of(ParamType::Map),
                ],
            ),
            FunctionId::SearchByMetadata => FunctionDescriptor::new(
                self,
                "Search by metadata",
                "Finds documents whose metadata equals every given value",
                vec![
                    ParamSpec::new("Metadata filters", "metadata_filters", ParamType::Map),
                    collection(),
                ],
                vec![
                    ParamSpec::new("Found documents", "search_result", ParamType::Array)
                        .of(ParamType::Map),
                ],
            ),
            FunctionId::DeleteById => FunctionDescriptor::new(
                self,
                "Delete by id",
                "Deletes a record from a collection by its id",
                vec![
                    ParamSpec::new("Point id", "id", ParamType::Number),
                    collection(),
                ],
                vec![],
            ),
            FunctionId::CollectionsList => FunctionDescriptor::new(
                self,
                "List collections",
                "Shows every collection in the vector database",
                vec![],
                vec![
                    ParamSpec::new("Collections", "collections_list", ParamType::Array)
                        .of(ParamType::String),
                ],
            ),
            FunctionId::CreateCollection => FunctionDescriptor::new(
                self,
                "Create collection",
                "Creates a new collection in the vector database",
                vec![ParamSpec::new("Collection name", "collection_name", ParamType::String)],
                vec![ParamSpec::new("Result", "creation_result", ParamType::String)],
            ),
            FunctionId::DeleteCollection => FunctionDescriptor::new(
                self,
                "Delete collection",
                "Deletes a collection from the vector database",
                vec![ParamSpec::new("Collection name", "collection_name", ParamType::String)],
                vec![],
            ),
            FunctionId::CollectionInfo => FunctionDescriptor::new(
                self,
                "Collection info",
                "Point count, vector size and status of a collection",
                vec![ParamSpec::new("Collection name", "collection_name", ParamType::String)],
                vec![ParamSpec::new("Result", "collection_info", ParamType::Map)],
            ),
        }
    }
}

/// Parameter value kinds as the catalog publishes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "array")]
    Array,
    #[serde(rename = "Map")]
    Map,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    pub title: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: ParamType,
    #[serde(rename = "arrayType", skip_serializing_if = "Option::is_none")]
    pub array_type: Option<ParamType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

impl ParamSpec {
    pub fn new(title: &'static str, name: &'static str, kind: ParamType) -> Self {
        Self {
            title,
            name,
            kind,
            array_type: None,
            optional: None,
        }
    }

    fn of(mut self, item: ParamType) -> Self {
        self.array_type = Some(item);
        self
    }

    fn optional(mut self) -> Self {
        self.optional = Some(true);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub inputs: Vec<ParamSpec>,
    pub outputs: Vec<ParamSpec>,
    /// UI controls; mirror `inputs`.
    pub controls: Vec<ParamSpec>,
}

impl FunctionDescriptor {
    fn new(
        id: FunctionId,
        name: &'static str,
        description: &'static str,
        inputs: Vec<ParamSpec>,
        outputs: Vec<ParamSpec>,
    ) -> Self {
        Self {
            id: id.as_str(),
            name,
            description,
            controls: inputs.clone(),
            inputs,
            outputs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub functions: BTreeMap<&'static str, FunctionDescriptor>,
}

/// The published catalog: a sequence holding one service entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    services: Vec<ServiceEntry>,
}

impl Catalog {
    pub fn build() -> Self {
        let functions = FunctionId::ALL
            .into_iter()
            .map(|f| (f.as_str(), f.descriptor()))
            .collect();
        Self {
            services: vec![ServiceEntry {
                id: "rag",
                title: "RAG Service",
                functions,
            }],
        }
    }

    pub fn services(&self) -> &[ServiceEntry] {
        &self.services
    }

    pub fn descriptor(&self, id: &str) -> Option<&FunctionDescriptor> {
        self.services.iter().find_map(|s| s.functions.get(id))
    }
}
