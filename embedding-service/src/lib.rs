//! Embedding provider adapter.
//!
//! Turns text into fixed-length vectors through a remote OpenAI-compatible
//! `/v1/embeddings` endpoint ([`HttpEmbedder`]) or a deterministic in-process
//! stand-in ([`MockEmbedder`]). Both implement [`EmbeddingProvider`].

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod provider;
pub mod services;

pub use config::EmbeddingConfig;
pub use error_handler::{ConfigError, EmbeddingError, HttpError};
pub use health_service::HealthStatus;
pub use provider::EmbeddingProvider;
pub use services::http_embedder::HttpEmbedder;
pub use services::mock_embedder::MockEmbedder;
