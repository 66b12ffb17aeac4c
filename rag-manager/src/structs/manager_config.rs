//! Configuration layer: reads retrieval defaults from environment variables.

use rag_store::DEFAULT_SEARCH_LIMIT;
use serde::{Deserialize, Serialize};

use crate::errors::manager_error::RagManagerError;

/// Retrieval defaults shared by every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Max hits returned by similarity search.
    pub search_limit: u64,
    /// Score threshold used when the caller gives none.
    pub default_threshold: f32,
    /// Expected dimension when the startup probe fails.
    pub fallback_dimension: usize,
    /// Text embedded once at startup to learn the provider's dimension.
    pub probe_text: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            search_limit: DEFAULT_SEARCH_LIMIT,
            default_threshold: 0.8,
            fallback_dimension: 1024,
            probe_text: "test".to_string(),
        }
    }
}

impl ManagerConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `RAG_SEARCH_LIMIT` (default: 5)
    /// - `RAG_DEFAULT_THRESHOLD` (default: 0.8)
    /// - `RAG_FALLBACK_DIMENSION` (default: 1024)
    pub fn from_env() -> Result<Self, RagManagerError> {
        let d = Self::default();
        let cfg = Self {
            search_limit: read_env("RAG_SEARCH_LIMIT")?.unwrap_or(d.search_limit),
            default_threshold: read_env("RAG_DEFAULT_THRESHOLD")?.unwrap_or(d.default_threshold),
            fallback_dimension: read_env("RAG_FALLBACK_DIMENSION")?
                .unwrap_or(d.fallback_dimension),
            probe_text: d.probe_text,
        };

        if cfg.search_limit == 0 {
            return Err(RagManagerError::InvalidConfig(
                "RAG_SEARCH_LIMIT must be > 0".into(),
            ));
        }
        if cfg.fallback_dimension == 0 {
            return Err(RagManagerError::InvalidConfig(
                "RAG_FALLBACK_DIMENSION must be > 0".into(),
            ));
        }
        if !cfg.default_threshold.is_finite() {
            return Err(RagManagerError::InvalidConfig(
                "RAG_DEFAULT_THRESHOLD must be a finite number".into(),
            ));
        }
        Ok(cfg)
    }
}

/// Read an optional value from env; present but unparsable is an error.
fn read_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, RagManagerError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => {
            v.trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| RagManagerError::EnvParse {
                    key: key.into(),
                    value: v,
                })
        }
        _ => Ok(None),
    }
}
