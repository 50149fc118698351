//! Retrieval engine for the VTA virtual teaching assistant
//!
//! This crate loads forum posts and course content, embeds them, caches the
//! embedding matrix, ranks documents for a question and assembles a bounded
//! context for the answer composer.

mod cache;
mod config;
mod context;
mod engine;
mod hash_embedder;
mod http_embedder;
mod index;
mod loader;
mod search;
mod text;


pub use cache::CacheArtifact;
pub use config::{DEFAULT_OPENAI_MODEL, EmbeddingBackend, VtaConfig};
pub use context::{excerpt, format_block, pack_blocks};
pub use engine::RetrievalEngine;
pub use hash_embedder::HashEmbedder;
pub use http_embedder::HttpEmbedder;
pub use index::{DEFAULT_BATCH_SIZE, VectorIndex};
pub use loader::DocumentLoader;
pub use search::cosine_similarity;
pub use text::TextProcessor;

// Re-export core types for convenience
pub use vta_core::{
    AssembledContext, BuildProgress, BuildReport, ContextConfig, Document, DocumentKind,
    Embedding, EmbeddingProvider, Error, Result, SearchConfig, SimilarityResult,
};
