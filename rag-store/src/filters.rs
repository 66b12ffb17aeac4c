//! Metadata filters and their conversion to Qdrant `Filter`.
//!
//! A [`MetadataFilter`] is a conjunction of `field == text` constraints. Filter
//! values are coerced to text, so a caller may pass `5` or `"5"` alike. Only
//! payload fields stored as strings can match, which is what a Qdrant keyword
//! match does.

use qdrant_client::qdrant::{Condition, Filter};
use serde_json::{Map, Value};
use tracing::debug;

use crate::record::Payload;

/// Conjunctive exact-match filter over payload fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataFilter {
    /// `(field, text)` pairs; all must match.
    pub equals: Vec<(String, String)>,
}

impl MetadataFilter {
    /// Builds a filter from a JSON map, dropping null and empty-string values.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let equals = map
            .iter()
            .filter_map(|(k, v)| coerce_to_text(v).map(|s| (k.clone(), s)))
            .collect();
        Self { equals }
    }

    pub fn is_empty(&self) -> bool {
        self.equals.is_empty()
    }

    /// In-process evaluation with keyword-match semantics: the payload field must
    /// be a string equal to the constraint text.
    pub fn matches(&self, payload: &Payload) -> bool {
        self.equals.iter().all(|(field, want)| {
            matches!(payload.get(field), Some(Value::String(got)) if got == want)
        })
    }
}

/// Text form of a filter value. `None` for null and empty strings.
///
/// Strings are taken verbatim; numbers, booleans, arrays and objects use their
/// compact JSON rendering.
pub fn coerce_to_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Converts [`MetadataFilter`] to a Qdrant [`Filter`] with one keyword `must` per field.
pub fn to_qdrant_filter(f: &MetadataFilter) -> Filter {
    debug!(target: "rag_store::filters", equals = f.equals.len(), "to_qdrant_filter");

    let must: Vec<Condition> = f
        .equals
        .iter()
        .map(|(field, text)| Condition::matches(field.clone(), text.clone()))
        .collect();

    Filter::must(must)
}
