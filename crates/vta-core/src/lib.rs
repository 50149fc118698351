//! Core traits and types for VTA (Virtual Teaching Assistant)
//!
//! This crate defines the document model, the embedding provider seam and the
//! retrieval result types shared by the index, the ranker and the CLI.

pub mod document;
pub mod embedding;
pub mod error;
pub mod retrieval;

pub use document::{Document, DocumentKind};
pub use embedding::{Embedding, EmbeddingProvider};
pub use error::{Error, Result};
pub use retrieval::{
    AssembledContext, BuildProgress, BuildReport, ContextConfig, SearchConfig, SimilarityResult,
};
