//! Retrieval engine wiring configuration, provider and index together

use serde_json::json;
use std::sync::Arc;
use tracing::info;

use vta_core::{
    AssembledContext, BuildReport, ContextConfig, EmbeddingProvider, Result, SimilarityResult,
};

use crate::config::VtaConfig;
use crate::index::VectorIndex;

/// Retrieval engine: one embedding provider and one index per process
pub struct RetrievalEngine {
    config: VtaConfig,
    index: VectorIndex,
}

impl RetrievalEngine {
    /// Create an engine with the provider selected by `config`
    pub fn from_config(config: VtaConfig) -> Result<Self> {
        let provider = config.build_provider()?;
        Ok(Self::with_provider(config, provider))
    }

    /// Create an engine around an explicit provider
    pub fn with_provider(config: VtaConfig, provider: Arc<dyn EmbeddingProvider>) -> Self {
        let index = VectorIndex::new(provider, config.cache_file.clone());
        Self { config, index }
    }

    /// Replace the index's progress subscriber
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(vta_core::BuildProgress) + Send + Sync + 'static,
    {
        self.index = self.index.with_progress(callback);
        self
    }

    /// Load the configured sources into the index
    pub fn load(&mut self) -> usize {
        let count = self
            .index
            .load_files(&self.config.posts_file, self.config.content_file.as_deref());
        info!("Loaded {} documents", count);
        count
    }

    /// Load sources and build (or reuse) the embedding matrix
    pub async fn prepare(&mut self, force_recreate: bool) -> Result<BuildReport> {
        self.load();
        self.index.build(force_recreate).await
    }

    /// Search with the configured top-k and similarity floor
    pub async fn search(&self, query: &str) -> Result<Vec<SimilarityResult>> {
        self.index.search(query, self.config.search).await
    }

    /// Assemble answer context, optionally overriding the length bound
    pub async fn context(&self, query: &str, max_length: Option<usize>) -> Result<AssembledContext> {
        let mut config = ContextConfig::default();
        if let Some(max_length) = max_length {
            config = config.with_max_length(max_length);
        }
        self.index.assemble_context(query, config).await
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn config(&self) -> &VtaConfig {
        &self.config
    }

    /// Get statistics about the engine
    pub fn stats(&self) -> serde_json::Value {
        let documents = self.index.documents();
        let forum_posts = documents.iter().filter(|d| d.is_forum_post()).count();
        json!({
            "ready": self.index.is_ready(),
            "model": self.index.provider().model_id(),
            "dimensions": self.index.provider().dimensions(),
            "documents": documents.len(),
            "forum_posts": forum_posts,
            "course_content": documents.len() - forum_posts,
            "embeddings": self.index.embeddings().map(|e| e.len()),
            "cache_file": self.index.cache_path().display().to_string(),
        })
    }
}
