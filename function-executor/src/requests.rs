//! One typed request per function, decoded from the caller's parameter map.
//!
//! Decoding checks presence, non-emptiness and value types and names the
//! offending field in the error. Collection state is checked later, by the
//! executor.

use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::DispatchError;

type Result<T> = std::result::Result<T, DispatchError>;

/// Borrowed view over the raw parameters with typed accessors.
struct Params<'a>(&'a Map<String, Value>);

impl<'a> Params<'a> {
    /// Present and non-null.
    fn get(&self, name: &str) -> Option<&'a Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    fn string(&self, name: &str) -> Result<Option<String>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(DispatchError::invalid(name, "a string")),
        }
    }

    fn required_string(&self, name: &str) -> Result<String> {
        match self.string(name)? {
            Some(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(DispatchError::required(name)),
        }
    }

    /// Accepts a JSON number or a numeric string.
    fn number(&self, name: &str) -> Result<Option<f32>> {
        let parsed = match self.get(name) {
            None => return Ok(None),
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(_) => None,
        };
        match parsed.map(|x| x as f32) {
            Some(x) if x.is_finite() => Ok(Some(x)),
            _ => Err(DispatchError::invalid(name, "a number")),
        }
    }

    /// Accepts a non-negative integer or a string of digits.
    fn point_id(&self, name: &str) -> Result<Option<u64>> {
        id_from_value(self.get(name), name)
    }

    fn string_list(&self, name: &str) -> Result<Option<Vec<String>>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| match v {
                    Value::String(s) => Ok(s.clone()),
                    _ => Err(DispatchError::invalid(name, "an array of strings")),
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(_) => Err(DispatchError::invalid(name, "an array of strings")),
        }
    }

    fn list(&self, name: &str) -> Result<Option<Vec<Value>>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items.clone())),
            Some(_) => Err(DispatchError::invalid(name, "an array")),
        }
    }
}

fn id_from_value(v: Option<&Value>, name: &str) -> Result<Option<u64>> {
    match v {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| DispatchError::invalid(name, "a non-negative integer")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| DispatchError::invalid(name, "a non-negative integer")),
        Some(_) => Err(DispatchError::invalid(name, "a non-negative integer")),
    }
}

/* ------------------------------- Requests ------------------------------- */

#[derive(Debug, Clone, PartialEq)]
pub struct AddDocumentRequest {
    pub text: String,
    pub collection_name: String,
    /// Object, JSON string of an object, or absent. Validated leniently downstream.
    pub metadata: Option<Value>,
}

impl TryFrom<&Map<String, Value>> for AddDocumentRequest {
    type Error = DispatchError;

    fn try_from(map: &Map<String, Value>) -> Result<Self> {
        let p = Params(map);
        Ok(Self {
            text: p.required_string("text")?,
            collection_name: p.required_string("collection_name")?,
            metadata: p.get("metadata").cloned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchAddRequest {
    pub documents: Vec<String>,
    pub metadatas: Option<Vec<Value>>,
    pub collection_name: String,
}

impl TryFrom<&Map<String, Value>> for BatchAddRequest {
    type Error = DispatchError;

    fn try_from(map: &Map<String, Value>) -> Result<Self> {
        let p = Params(map);
        let documents = match p.string_list("documents")? {
            Some(docs) if !docs.is_empty() => docs,
            _ => return Err(DispatchError::required("documents")),
        };
        if documents.iter().any(|d| d.trim().is_empty()) {
            return Err(DispatchError::invalid("documents", "an array of non-empty strings"));
        }
        Ok(Self {
            documents,
            metadatas: p.list("metadatas")?,
            collection_name: p.required_string("collection_name")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub collection_name: String,
    /// `None` means the manager's default threshold.
    pub threshold: Option<f32>,
}

impl TryFrom<&Map<String, Value>> for SearchRequest {
    type Error = DispatchError;

    fn try_from(map: &Map<String, Value>) -> Result<Self> {
        let p = Params(map);
        Ok(Self {
            query: p.required_string("query")?,
            collection_name: p.required_string("collection_name")?,
            threshold: p.number("threshold")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataSearchRequest {
    pub collection_name: String,
    /// May be empty or all-null; that yields an empty result, not an error.
    pub metadata_filters: Map<String, Value>,
}

impl TryFrom<&Map<String, Value>> for MetadataSearchRequest {
    type Error = DispatchError;

    fn try_from(map: &Map<String, Value>) -> Result<Self> {
        let p = Params(map);
        let collection_name = p.required_string("collection_name")?;

        let metadata_filters = match (p.get("metadata_filters"), p.get("params")) {
            (Some(v), _) => filters_from(v, "metadata_filters")?,
            (None, Some(v)) => {
                warn!(
                    target: "function_executor::params",
                    "legacy 'params' key used for metadata filters"
                );
                filters_from(v, "params")?
            }
            (None, None) => return Err(DispatchError::required("metadata_filters")),
        };

        Ok(Self {
            collection_name,
            metadata_filters,
        })
    }
}

/// An object, or an array of objects merged left to right.
fn filters_from(v: &Value, name: &str) -> Result<Map<String, Value>> {
    match v {
        Value::Object(m) => Ok(m.clone()),
        Value::Array(items) => {
            let mut merged = Map::new();
            for item in items {
                match item {
                    Value::Object(m) => merged.extend(m.clone()),
                    _ => return Err(DispatchError::invalid(name, "an object")),
                }
            }
            Ok(merged)
        }
        _ => Err(DispatchError::invalid(name, "an object")),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteByIdRequest {
    pub id: u64,
    pub collection_name: String,
}

impl TryFrom<&Map<String, Value>> for DeleteByIdRequest {
    type Error = DispatchError;

    fn try_from(map: &Map<String, Value>) -> Result<Self> {
        let p = Params(map);
        let id = match p.point_id("id")? {
            Some(id) => id,
            None => match legacy_id(p.get("params"))? {
                Some(id) => {
                    warn!(
                        target: "function_executor::params",
                        "legacy 'params' key used for delete_by_id"
                    );
                    id
                }
                None => return Err(DispatchError::required("id")),
            },
        };
        Ok(Self {
            id,
            collection_name: p.required_string("collection_name")?,
        })
    }
}

/// `params: {"id": ..}` or `params: [{"id": ..}]`.
fn legacy_id(params: Option<&Value>) -> Result<Option<u64>> {
    let holder = match params {
        Some(Value::Object(m)) => Some(m),
        Some(Value::Array(items)) => items.first().and_then(Value::as_object),
        _ => None,
    };
    id_from_value(holder.and_then(|m| m.get("id")), "params.id")
}

/// Requests that only name a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionRequest {
    pub collection_name: String,
}

impl TryFrom<&Map<String, Value>> for CollectionRequest {
    type Error = DispatchError;

    fn try_from(map: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            collection_name: Params(map).required_string("collection_name")?,
        })
    }
}
