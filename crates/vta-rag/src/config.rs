//! Retrieval configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use vta_core::{EmbeddingProvider, Error, Result, SearchConfig};

use crate::hash_embedder::HashEmbedder;
use crate::http_embedder::HttpEmbedder;

/// Model used with the `openai` backend when none is configured
pub const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";
const DEFAULT_OPENAI_DIMENSIONS: usize = 1536;

/// Which embedding provider backs the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Offline feature-hashing embedder
    Local,
    /// OpenAI-compatible `/embeddings` endpoint
    OpenAi,
}

impl FromStr for EmbeddingBackend {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "local" | "hash" => Ok(Self::Local),
            "openai" | "http" => Ok(Self::OpenAi),
            other => Err(Error::Configuration(format!(
                "unknown embedding provider '{}', expected 'local' or 'openai'",
                other
            ))),
        }
    }
}

/// Configuration for the retrieval core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VtaConfig {
    pub posts_file: PathBuf,
    pub content_file: Option<PathBuf>,
    pub cache_file: PathBuf,
    pub backend: EmbeddingBackend,
    pub embedding_model: String,
    pub embedding_dimensions: Option<usize>,
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub search: SearchConfig,
}

impl Default for VtaConfig {
    fn default() -> Self {
        Self {
            posts_file: PathBuf::from("data/discourse_posts.json"),
            content_file: Some(PathBuf::from("data/course_content.json")),
            cache_file: PathBuf::from("data/embeddings.json"),
            backend: EmbeddingBackend::Local,
            embedding_model: "all-MiniLM-L6-v2".to_string(),
            embedding_dimensions: None,
            api_key: None,
            api_base_url: "https://api.openai.com/v1".to_string(),
            search: SearchConfig::default(),
        }
    }
}

impl VtaConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let backend = match get("VTA_EMBEDDING_PROVIDER") {
            Some(value) => value.parse()?,
            None => defaults.backend,
        };

        let content_file = match get("VTA_CONTENT_FILE") {
            Some(value) if value.eq_ignore_ascii_case("none") => None,
            Some(value) => Some(PathBuf::from(value)),
            None => defaults.content_file,
        };

        let search = SearchConfig {
            top_k: parse_var(&get, "VTA_MAX_SIMILAR_POSTS")?.unwrap_or(defaults.search.top_k),
            min_similarity: parse_var(&get, "VTA_SIMILARITY_THRESHOLD")?
                .unwrap_or(defaults.search.min_similarity),
        };

        Ok(Self {
            posts_file: get("VTA_POSTS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.posts_file),
            content_file,
            cache_file: get("VTA_CACHE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_file),
            backend,
            embedding_model: get("VTA_EMBEDDING_MODEL").unwrap_or_else(|| match backend {
                EmbeddingBackend::OpenAi => DEFAULT_OPENAI_MODEL.to_string(),
                EmbeddingBackend::Local => defaults.embedding_model,
            }),
            embedding_dimensions: parse_var(&get, "VTA_EMBEDDING_DIMENSIONS")?,
            api_key: get("OPENAI_API_KEY"),
            api_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.api_base_url),
            search,
        })
    }

    /// Construct the embedding provider this configuration selects
    pub fn build_provider(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        match self.backend {
            EmbeddingBackend::Local => Ok(Arc::new(match self.embedding_dimensions {
                Some(dimensions) => HashEmbedder::with_dimensions(dimensions),
                None => HashEmbedder::new(),
            })),
            EmbeddingBackend::OpenAi => {
                let api_key = self.api_key.clone().ok_or_else(|| {
                    Error::Configuration(
                        "OPENAI_API_KEY environment variable not found".to_string(),
                    )
                })?;
                let dimensions = self.embedding_dimensions.or_else(|| {
                    (self.embedding_model == DEFAULT_OPENAI_MODEL).then_some(DEFAULT_OPENAI_DIMENSIONS)
                });
                let embedder = HttpEmbedder::new(
                    api_key,
                    &self.api_base_url,
                    self.embedding_model.clone(),
                    dimensions,
                    Duration::from_secs(60),
                    3,
                )?;
                Ok(Arc::new(embedder))
            }
        }
    }
}

fn parse_var<T, G>(get: &G, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| {
                Error::Configuration(format!("{} has an invalid value: '{}'", key, raw))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = VtaConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.posts_file, PathBuf::from("data/discourse_posts.json"));
        assert_eq!(config.cache_file, PathBuf::from("data/embeddings.json"));
        assert_eq!(config.backend, EmbeddingBackend::Local);
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = VtaConfig::from_lookup(lookup(&[
            ("VTA_POSTS_FILE", "/tmp/posts.json"),
            ("VTA_CONTENT_FILE", "none"),
            ("VTA_EMBEDDING_PROVIDER", "OpenAI"),
            ("VTA_MAX_SIMILAR_POSTS", "8"),
            ("VTA_SIMILARITY_THRESHOLD", "0.45"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap();

        assert_eq!(config.posts_file, PathBuf::from("/tmp/posts.json"));
        assert_eq!(config.content_file, None);
        assert_eq!(config.backend, EmbeddingBackend::OpenAi);
        assert_eq!(config.search.top_k, 8);
        assert!((config.search.min_similarity - 0.45).abs() < 1e-6);
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_openai_backend_defaults_to_openai_model() {
        let config = VtaConfig::from_lookup(lookup(&[
            ("VTA_EMBEDDING_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap();
        assert_eq!(config.embedding_model, DEFAULT_OPENAI_MODEL);

        let provider = config.build_provider().unwrap();
        assert_eq!(provider.model_id(), "text-embedding-3-small");
        assert_eq!(provider.dimensions(), 1536);

        let pinned = VtaConfig::from_lookup(lookup(&[
            ("VTA_EMBEDDING_PROVIDER", "openai"),
            ("VTA_EMBEDDING_MODEL", "all-MiniLM-L6-v2"),
        ]))
        .unwrap();
        assert_eq!(pinned.embedding_model, "all-MiniLM-L6-v2");
    }

    #[test]
    fn test_invalid_number_is_configuration_error() {
        let err = VtaConfig::from_lookup(lookup(&[("VTA_MAX_SIMILAR_POSTS", "five")])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_unknown_backend() {
        assert!("cohere".parse::<EmbeddingBackend>().is_err());
        assert_eq!("hash".parse::<EmbeddingBackend>().unwrap(), EmbeddingBackend::Local);
    }

    #[test]
    fn test_openai_backend_requires_key() {
        let config = VtaConfig {
            backend: EmbeddingBackend::OpenAi,
            ..VtaConfig::default()
        };
        assert!(matches!(config.build_provider(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_local_backend_provider() {
        let provider = VtaConfig::default().build_provider().unwrap();
        assert_eq!(provider.model_id(), HashEmbedder::MODEL_ID);
        assert_eq!(provider.dimensions(), 384);
    }
}
