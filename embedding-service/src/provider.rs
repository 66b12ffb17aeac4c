use async_trait::async_trait;

use crate::error_handler::{EmbeddingError, Result};
use crate::health_service::HealthStatus;

/// Anything that turns text into fixed-length vectors.
///
/// Implementations must return exactly one vector per input text, in input order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds a batch of texts. Empty input yields empty output without a remote call.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embeds a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut out = self.embed_batch(&[text.to_string()]).await?;
        out.pop()
            .ok_or_else(|| EmbeddingError::Decode("provider returned no embedding".into()))
    }

    /// Connectivity probe. Never fails; errors are folded into the status.
    async fn probe(&self) -> HealthStatus;

    /// Boolean view over [`EmbeddingProvider::probe`].
    async fn test_connection(&self) -> bool {
        self.probe().await.ok
    }
}
