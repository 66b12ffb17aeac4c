//! OpenAI-compatible embeddings client.
//!
//! Endpoint derived from [`EmbeddingConfig::endpoint`]:
//! - POST {endpoint}/v1/embeddings: `{"input": [texts], "model"?: name}`
//!
//! The response must carry a `data` array whose entries expose an `embedding`
//! field. When every entry also carries `index`, output is ordered by it;
//! otherwise entries are taken positionally.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::EmbeddingConfig;
use crate::error_handler::{
    ConfigError, EmbeddingError, HttpError, Result, make_snippet, validate_http_endpoint,
};
use crate::health_service::{HealthService, HealthStatus};
use crate::provider::EmbeddingProvider;

/// Thin client for a remote embeddings endpoint.
///
/// Keeps a preconfigured `reqwest::Client` (timeout and default headers).
#[derive(Debug)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    cfg: EmbeddingConfig,
    url_embeddings: String,
}

impl HttpEmbedder {
    /// Creates a new embedder from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFormat`] if the endpoint lacks an http(s) scheme
    ///   or the API key is not a valid header value
    /// - [`EmbeddingError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: EmbeddingConfig) -> Result<Self> {
        let endpoint = cfg.endpoint.trim();
        validate_http_endpoint("EMBEDDING_URL", endpoint)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(key) = &cfg.api_key {
            let value = header::HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| {
                ConfigError::InvalidFormat {
                    var: "EMBEDDING_API_KEY",
                    reason: "not a valid header value",
                }
            })?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()?;

        let url_embeddings = cfg.embeddings_url();

        info!(
            target: "embedding_service::http",
            endpoint = %cfg.endpoint,
            model = %cfg.model.as_deref().unwrap_or("n/a"),
            timeout_secs = cfg.timeout_secs,
            "HttpEmbedder initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_embeddings,
        })
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.cfg
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let body = EmbeddingsRequest {
            input: texts,
            model: self.cfg.model.as_deref(),
        };

        debug!(
            target: "embedding_service::http",
            count = texts.len(),
            "POST {}", self.url_embeddings
        );

        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(
                    target: "embedding_service::http",
                    error = %e,
                    url = %self.url_embeddings,
                    "embeddings request failed"
                );
                EmbeddingError::Transport(e)
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embeddings.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                target: "embedding_service::http",
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "/v1/embeddings returned non-success status"
            );

            return Err(EmbeddingError::HttpStatus(HttpError {
                status,
                url,
                snippet,
            }));
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            EmbeddingError::Decode(format!("serde error: {e}; expected `data[].embedding`"))
        })?;

        let vectors = order_embeddings(out.data);
        if vectors.len() != texts.len() {
            error!(
                target: "embedding_service::http",
                requested = texts.len(),
                returned = vectors.len(),
                "embedding batch size mismatch"
            );
            return Err(EmbeddingError::BatchMismatch {
                requested: texts.len(),
                returned: vectors.len(),
            });
        }

        debug!(
            target: "embedding_service::http",
            count = vectors.len(),
            dim = vectors.first().map(Vec::len).unwrap_or(0),
            latency_ms = started.elapsed().as_millis(),
            "embeddings received"
        );

        Ok(vectors)
    }

    async fn probe(&self) -> HealthStatus {
        HealthService::new(&self.client, &self.cfg).check().await
    }
}

/// Orders entries by `index` when all of them carry one, else keeps arrival order.
fn order_embeddings(mut data: Vec<EmbeddingItem>) -> Vec<Vec<f32>> {
    if data.iter().all(|d| d.index.is_some()) {
        data.sort_by_key(|d| d.index);
    }
    data.into_iter().map(|d| d.embedding).collect()
}

/* --------------------- Wire types --------------------- */

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}
