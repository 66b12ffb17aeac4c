//! Deterministic in-process embedder.
//!
//! Each whitespace token is hashed into one of `dims` buckets and the resulting
//! bag of words is L2-normalised, so texts sharing words have positive cosine
//! similarity and identical texts score 1.0. Used by tests and local runs.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error_handler::{EmbeddingError, Result};
use crate::health_service::HealthStatus;
use crate::provider::EmbeddingProvider;

pub struct MockEmbedder {
    dims: usize,
    ready: AtomicBool,
    calls: AtomicUsize,
}

impl MockEmbedder {
    /// `dims` is clamped to at least 1.
    pub fn new(dims: usize) -> Self {
        Self {
            dims: dims.max(1),
            ready: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        }
    }

    /// Toggles availability; an unavailable mock fails every call.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Number of `embed_batch` calls that reached the provider.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn dimensions(&self) -> usize {
        self.dims
    }

    fn bucket(&self, token: &str) -> usize {
        let mut h = DefaultHasher::new();
        token.hash(&mut h);
        (h.finish() % self.dims as u64) as usize
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dims];
        for token in text.split_whitespace() {
            v[self.bucket(&token.to_lowercase())] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if !self.ready.load(Ordering::SeqCst) {
            return Err(EmbeddingError::Unavailable("mock embedder is not ready".into()));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    async fn probe(&self) -> HealthStatus {
        if self.ready.load(Ordering::SeqCst) {
            HealthStatus::ok("mock://embedder", None, 0, "mock embedder is ready")
        } else {
            HealthStatus::fail("mock://embedder", None, 0, "mock embedder is not ready")
        }
    }
}
