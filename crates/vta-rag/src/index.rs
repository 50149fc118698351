//! Vector index: document set, embedding matrix and its cache

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use vta_core::{
    BuildProgress, BuildReport, Document, Embedding, EmbeddingProvider, Error, Result,
};

use crate::cache::CacheArtifact;
use crate::loader::DocumentLoader;

/// Documents embedded per provider call
pub const DEFAULT_BATCH_SIZE: usize = 32;

type ProgressCallback = Box<dyn Fn(BuildProgress) + Send + Sync>;

/// Embedding rows plus the document load they were built for
struct Matrix {
    rows: Vec<Embedding>,
    generation: u64,
}

/// Positional index over loaded documents.
///
/// Row `i` of the embedding matrix belongs to document `i`. The index owns
/// its cache path; `build` needs `&mut self`, so there is one writer.
pub struct VectorIndex {
    provider: Arc<dyn EmbeddingProvider>,
    cache_path: PathBuf,
    batch_size: usize,
    documents: Vec<Document>,
    /// Bumped every time the document set is replaced
    generation: u64,
    embeddings: Option<Matrix>,
    on_progress: Option<ProgressCallback>,
}

impl VectorIndex {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            cache_path: cache_path.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            documents: Vec::new(),
            generation: 0,
            embeddings: None,
            on_progress: None,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Subscribe to per-batch progress while embedding
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(BuildProgress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Replace the document set from JSON files. Returns the document count.
    pub fn load_files(&mut self, posts_file: &Path, content_file: Option<&Path>) -> usize {
        self.set_documents(DocumentLoader::load_files(posts_file, content_file))
    }

    /// Replace the document set from materialized records. Returns the document count.
    pub fn load_records(&mut self, posts: &[Value], content: Option<&[Value]>) -> usize {
        self.set_documents(DocumentLoader::load_records(posts, content))
    }

    /// Replace the document set. The embedding matrix is left alone until the
    /// next build, and queries fail with `IndexMismatch` until then.
    pub fn set_documents(&mut self, documents: Vec<Document>) -> usize {
        self.documents = documents;
        self.generation += 1;
        self.documents.len()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn embeddings(&self) -> Option<&[Embedding]> {
        self.embeddings.as_ref().map(|matrix| matrix.rows.as_slice())
    }

    pub fn provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn is_ready(&self) -> bool {
        self.indexed().is_ok()
    }

    /// Documents and matrix, checked for the positional invariant
    pub(crate) fn indexed(&self) -> Result<(&[Document], &[Embedding])> {
        let matrix = match &self.embeddings {
            Some(matrix) if !self.documents.is_empty() => matrix,
            _ => return Err(Error::NotIndexed),
        };
        // same row count is not enough: the rows must come from this load
        if matrix.rows.len() != self.documents.len() || matrix.generation != self.generation {
            return Err(Error::IndexMismatch {
                embeddings: matrix.rows.len(),
                documents: self.documents.len(),
            });
        }
        Ok((self.documents.as_slice(), matrix.rows.as_slice()))
    }

    /// Build the embedding matrix, or reuse the cached one.
    ///
    /// Without `force_recreate`, an existing cache file is loaded as is. A
    /// cache from another model or document set is only warned about.
    pub async fn build(&mut self, force_recreate: bool) -> Result<BuildReport> {
        if !force_recreate && self.cache_path.exists() {
            return self.load_cache();
        }

        if self.documents.is_empty() {
            return Err(Error::NoDocuments);
        }

        let texts: Vec<String> = self.documents.iter().map(Document::embedding_text).collect();
        let total = texts.len();
        info!("Creating embeddings for {} documents...", total);

        let mut matrix: Vec<Embedding> = Vec::with_capacity(total);
        let mut batches = 0;
        for batch in texts.chunks(self.batch_size) {
            let vectors = self.provider.embed(batch).await?;
            if vectors.len() != batch.len() {
                return Err(Error::Embedding(format!(
                    "provider returned {} vectors for a batch of {}",
                    vectors.len(),
                    batch.len()
                )));
            }
            matrix.extend(vectors);
            batches += 1;

            let progress = BuildProgress {
                processed: matrix.len(),
                total,
            };
            info!("Processed {}/{} documents", progress.processed, progress.total);
            if let Some(callback) = &self.on_progress {
                callback(progress);
            }
        }

        let artifact = CacheArtifact {
            model_id: self.provider.model_id().to_string(),
            dimensions: self.provider.dimensions(),
            fingerprint: CacheArtifact::fingerprint(self.provider.model_id(), &self.documents),
            embeddings: matrix,
        };
        artifact.save(&self.cache_path)?;
        info!("Embeddings created and saved to {}", self.cache_path.display());

        self.embeddings = Some(Matrix {
            rows: artifact.embeddings,
            generation: self.generation,
        });
        Ok(BuildReport {
            documents: total,
            batches,
            from_cache: false,
        })
    }

    fn load_cache(&mut self) -> Result<BuildReport> {
        info!("Loading existing embeddings from {}", self.cache_path.display());
        let artifact = CacheArtifact::load(&self.cache_path)?;

        if !self.documents.is_empty() {
            if artifact.embeddings.len() != self.documents.len() {
                return Err(Error::IndexMismatch {
                    embeddings: artifact.embeddings.len(),
                    documents: self.documents.len(),
                });
            }
            if !artifact.matches(self.provider.model_id(), &self.documents) {
                warn!(
                    "Cached embeddings at {} were built from model '{}' or a different document set; \
                     rebuild with force to refresh them",
                    self.cache_path.display(),
                    artifact.model_id
                );
            }
        }

        let documents = artifact.embeddings.len();
        self.embeddings = Some(Matrix {
            rows: artifact.embeddings,
            generation: self.generation,
        });
        Ok(BuildReport {
            documents,
            batches: 0,
            from_cache: true,
        })
    }
}
