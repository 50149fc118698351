//! Embedding provider trait

use async_trait::async_trait;

use crate::Result;

/// A dense vector produced by an embedding model.
pub type Embedding = Vec<f32>;

/// Trait for embedding providers (local hashing, OpenAI-compatible APIs, ...)
///
/// Implementations must be deterministic for a fixed model identity and
/// must return exactly one vector per input, in input order. Batch sizing
/// is the caller's concern.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Identity of the pinned model, e.g. `all-MiniLM-L6-v2`
    fn model_id(&self) -> &str;

    /// Dimensionality of every vector this provider returns
    fn dimensions(&self) -> usize;

    /// Embed a batch of texts
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Embed a single text
    async fn embed_one(&self, text: &str) -> Result<Embedding> {
        let mut vectors = self.embed(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| crate::Error::Embedding("provider returned no vector".to_string()))
    }
}
