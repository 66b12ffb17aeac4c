//! Connectivity probe for embedding providers.
//!
//! The probe issues a trivial `POST {endpoint}/v1/embeddings` with `{"input":["test"]}`
//! under a short timeout. [`HealthService::check`] never fails: any error is mapped
//! to `HealthStatus { ok: false, .. }`, which is convenient for a `/health` endpoint.

use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::config::EmbeddingConfig;
use crate::error_handler::{EmbeddingError, HttpError, make_snippet};

/// A serializable health snapshot for the embedding provider.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HealthStatus {
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier sent with the probe, if configured.
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured probe latency in milliseconds.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    pub fn ok(
        endpoint: &str,
        model: Option<&str>,
        latency_ms: u128,
        message: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.map(str::to_string),
            ok: true,
            latency_ms,
            message: message.into(),
        }
    }

    pub fn fail(
        endpoint: &str,
        model: Option<&str>,
        latency_ms: u128,
        message: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.map(str::to_string),
            ok: false,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Probe runner that borrows the embedder's HTTP client.
pub struct HealthService<'a> {
    client: &'a reqwest::Client,
    cfg: &'a EmbeddingConfig,
}

impl<'a> HealthService<'a> {
    pub fn new(client: &'a reqwest::Client, cfg: &'a EmbeddingConfig) -> Self {
        Self { client, cfg }
    }

    /// Runs the probe. Resilient: never returns an error.
    pub async fn check(&self) -> HealthStatus {
        let start = Instant::now();
        let model = self.cfg.model.as_deref();

        match self.try_probe().await {
            Ok(()) => {
                let status = HealthStatus::ok(
                    &self.cfg.endpoint,
                    model,
                    start.elapsed().as_millis(),
                    "embedding provider is reachable",
                );
                info!(
                    target: "embedding_service::health",
                    endpoint = %status.endpoint,
                    latency_ms = status.latency_ms,
                    "health probe completed"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus::fail(
                    &self.cfg.endpoint,
                    model,
                    start.elapsed().as_millis(),
                    err.to_string(),
                );
                warn!(
                    target: "embedding_service::health",
                    endpoint = %status.endpoint,
                    latency_ms = status.latency_ms,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    /// Strict probe. Returns an error on transport failures and non-2xx statuses.
    async fn try_probe(&self) -> Result<(), EmbeddingError> {
        let url = self.cfg.embeddings_url();
        let mut body = json!({ "input": ["test"] });
        if let Some(model) = &self.cfg.model {
            body["model"] = json!(model);
        }

        let resp = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(self.cfg.probe_timeout_secs))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::HttpStatus(HttpError {
                status,
                url,
                snippet: make_snippet(&text),
            }));
        }
        Ok(())
    }
}
