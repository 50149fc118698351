//! Retrieval configuration and result types

use serde::{Deserialize, Serialize};

use crate::Document;

/// Configuration for a direct similarity search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub top_k: usize,
    pub min_similarity: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_similarity: 0.3,
        }
    }
}

/// Configuration for assembling answer context.
///
/// Context assembly searches wider and lower than a direct search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextConfig {
    pub top_k: usize,
    pub min_similarity: f32,
    pub max_length: usize,
    pub excerpt_chars: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            min_similarity: 0.2,
            max_length: 4000,
            excerpt_chars: 500,
        }
    }
}

impl ContextConfig {
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            top_k: self.top_k,
            min_similarity: self.min_similarity,
        }
    }
}

/// One ranked hit for a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub document: Document,
    pub similarity: f32,
    /// Position of the document in the loaded sequence
    pub index: usize,
    /// 1-based rank in the result list
    pub rank: usize,
}

/// Context text handed to the answer composer, plus everything the ranker found
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledContext {
    pub text: String,
    pub results: Vec<SimilarityResult>,
    pub blocks_included: usize,
}

/// Outcome of an index build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub documents: usize,
    pub batches: usize,
    pub from_cache: bool,
}

/// Per-batch progress emitted while embedding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildProgress {
    pub processed: usize,
    pub total: usize,
}
