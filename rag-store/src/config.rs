//! Runtime configuration for the vector store backend.

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceKind {
    /// Cosine similarity (recommended for most embeddings).
    #[default]
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Which backend serves the [`crate::VectorStore`] contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    #[default]
    Qdrant,
    /// Process-local store; contents vanish on exit.
    Memory,
}

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the vector store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Qdrant,
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            qdrant_api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl StoreConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `VECTOR_STORE_BACKEND` (`qdrant` | `memory`; default: `qdrant`)
    /// - `QDRANT_URL` (wins over host/port when set)
    /// - `QDRANT_HOST` (default: `localhost`)
    /// - `QDRANT_PORT` (default: 6334)
    /// - `QDRANT_API_KEY` (optional)
    /// - `QDRANT_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, StoreError> {
        let backend = match env_opt("VECTOR_STORE_BACKEND").as_deref() {
            None => StoreBackend::Qdrant,
            Some(v) if v.eq_ignore_ascii_case("qdrant") => StoreBackend::Qdrant,
            Some(v) if v.eq_ignore_ascii_case("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(StoreError::Config(format!(
                    "VECTOR_STORE_BACKEND must be 'qdrant' or 'memory', got '{other}'"
                )));
            }
        };

        let qdrant_url = match env_opt("QDRANT_URL") {
            Some(url) => url,
            None => {
                let host = env_opt("QDRANT_HOST").unwrap_or_else(|| "localhost".into());
                let port = read_env::<u16>("QDRANT_PORT")?.unwrap_or(6334);
                format!("http://{host}:{port}")
            }
        };

        let cfg = Self {
            backend,
            qdrant_url,
            qdrant_api_key: env_opt("QDRANT_API_KEY"),
            timeout_secs: read_env::<u64>("QDRANT_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.backend == StoreBackend::Qdrant && self.qdrant_url.trim().is_empty() {
            return Err(StoreError::Config("qdrant_url is empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(StoreError::Config("timeout_secs must be > 0".into()));
        }
        Ok(())
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reads and parses an optional env variable; a present but malformed value is an error.
fn read_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, StoreError> {
    match env_opt(key) {
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|_| StoreError::Config(format!("failed to parse env variable: {key} = '{v}'"))),
        None => Ok(None),
    }
}
