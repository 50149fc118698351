//! On-disk embedding cache

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use vta_core::{Document, Embedding, Result};

/// Serialized embedding matrix plus what it was built from.
///
/// `model_id` and `fingerprint` are recorded so a stale cache can be
/// reported; validity is still decided by the file existing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheArtifact {
    pub model_id: String,
    pub dimensions: usize,
    pub fingerprint: String,
    pub embeddings: Vec<Embedding>,
}

impl CacheArtifact {
    /// md5 over the model identity and every embedding input, in order
    pub fn fingerprint(model_id: &str, documents: &[Document]) -> String {
        let mut context = md5::Context::new();
        context.consume(model_id.as_bytes());
        for doc in documents {
            context.consume(b"\n");
            context.consume(doc.embedding_text().as_bytes());
        }
        format!("{:x}", context.compute())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the artifact, creating parent directories. The file is written
    /// next to the target and renamed over it, so a reader never sees a
    /// partially written cache.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let staging = staging_path(path);
        fs::write(&staging, serde_json::to_string(self)?)?;
        fs::rename(&staging, path)?;
        Ok(())
    }

    /// Whether this artifact was built from `documents` with `model_id`
    pub fn matches(&self, model_id: &str, documents: &[Document]) -> bool {
        self.model_id == model_id && self.fingerprint == Self::fingerprint(model_id, documents)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}
