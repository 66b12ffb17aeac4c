//! Embedding provider configuration loaded strictly from environment variables.
//!
//! # Environment variables
//! - `EMBEDDING_URL`                = base URL of the provider (mandatory)
//! - `EMBEDDING_MODEL`              = model name sent with each request (optional)
//! - `EMBEDDING_API_KEY`            = bearer token (optional)
//! - `EMBEDDING_TIMEOUT_SECS`       = request timeout, default 30
//! - `EMBEDDING_PROBE_TIMEOUT_SECS` = connectivity probe timeout, default 5

use crate::error_handler::{Result, env_opt, env_opt_u64, must_env, validate_http_endpoint};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Settings for an OpenAI-compatible embeddings endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingConfig {
    /// Base URL; `/v1/embeddings` is appended.
    pub endpoint: String,

    /// Optional model name. Omitted from the request body when `None`.
    pub model: Option<String>,

    /// Optional bearer token.
    pub api_key: Option<String>,

    /// Timeout for embedding calls (seconds).
    pub timeout_secs: u64,

    /// Timeout for the connectivity probe (seconds).
    pub probe_timeout_secs: u64,
}

impl EmbeddingConfig {
    /// Builds a config for `endpoint` with default timeouts and no model/key.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: None,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
        }
    }

    /// Loads the config from the process environment.
    ///
    /// # Errors
    /// - [`crate::ConfigError::MissingVar`] if `EMBEDDING_URL` is absent
    /// - [`crate::ConfigError::InvalidFormat`] if it lacks an http(s) scheme
    /// - [`crate::ConfigError::InvalidNumber`] for malformed timeouts
    pub fn from_env() -> Result<Self> {
        let endpoint = must_env("EMBEDDING_URL")?.trim().to_string();
        validate_http_endpoint("EMBEDDING_URL", &endpoint)?;

        Ok(Self {
            endpoint,
            model: env_opt("EMBEDDING_MODEL"),
            api_key: env_opt("EMBEDDING_API_KEY"),
            timeout_secs: env_opt_u64("EMBEDDING_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS),
            probe_timeout_secs: env_opt_u64("EMBEDDING_PROBE_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS),
        })
    }

    /// `{endpoint}/v1/embeddings` with trailing slashes removed from the base.
    pub fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.endpoint.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeddings_url_strips_trailing_slash() {
        let cfg = EmbeddingConfig::new("http://localhost:8080/");
        assert_eq!(cfg.embeddings_url(), "http://localhost:8080/v1/embeddings");
    }
}
