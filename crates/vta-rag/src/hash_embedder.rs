//! Offline feature-hashing embedder

use async_trait::async_trait;

use vta_core::{Embedding, EmbeddingProvider, Result};

/// Deterministic embedder built from hashed word and bigram features.
///
/// Tokens are lowercase alphanumeric runs. Each token adds 1.0 at `h % d`
/// and 0.5 at `(h >> 32) % d`; each adjacent token pair adds 0.5 at `h % d`,
/// where `h` is the first eight bytes of the md5 digest, little endian.
/// Vectors are L2-normalized, so cosine similarity is a plain dot product.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    model_id: String,
    dimensions: usize,
}

impl HashEmbedder {
    pub const MODEL_ID: &'static str = "local/hashed-ngrams-384";
    pub const DEFAULT_DIMENSIONS: usize = 384;

    pub fn new() -> Self {
        Self {
            model_id: Self::MODEL_ID.to_string(),
            dimensions: Self::DEFAULT_DIMENSIONS,
        }
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        let dimensions = dimensions.max(1);
        Self {
            model_id: format!("local/hashed-ngrams-{}", dimensions),
            dimensions,
        }
    }

    /// Embed one text synchronously
    pub fn embed_text(&self, text: &str) -> Embedding {
        let tokens = tokenize(text);
        let dims = self.dimensions as u64;
        let mut embedding = vec![0.0f32; self.dimensions];

        for token in &tokens {
            let hash = feature_hash(token);
            embedding[(hash % dims) as usize] += 1.0;
            embedding[((hash >> 32) % dims) as usize] += 0.5;
        }

        for pair in tokens.windows(2) {
            let hash = feature_hash(&format!("{} {}", pair[0], pair[1]));
            embedding[(hash % dims) as usize] += 0.5;
        }

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for val in embedding.iter_mut() {
                *val /= magnitude;
            }
        }

        embedding
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn feature_hash(feature: &str) -> u64 {
    let digest = md5::compute(feature.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.0[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_tokenize_splits_model_names() {
        assert_eq!(
            tokenize("Use gpt-3.5-turbo-0125!"),
            vec!["use", "gpt", "3", "5", "turbo", "0125"]
        );
    }

    #[test]
    fn test_deterministic_and_normalized() {
        let embedder = HashEmbedder::new();
        let a = embedder.embed_text("Docker compose networking");
        let b = embedder.embed_text("Docker compose networking");
        assert_eq!(a, b);
        assert_eq!(a.len(), 384);
        assert!((dot(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedding = HashEmbedder::new().embed_text("  ... ");
        assert!(embedding.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_shared_words_score_higher() {
        let embedder = HashEmbedder::new();
        let query = embedder.embed_text("how do I deploy with docker");
        let related = embedder.embed_text("deploy the app with docker and podman");
        let unrelated = embedder.embed_text("tokenizer rate 36 tokens");
        assert!(dot(&query, &related) > dot(&query, &unrelated));
    }

    #[test]
    fn test_custom_dimensions() {
        let embedder = HashEmbedder::with_dimensions(64);
        assert_eq!(embedder.model_id(), "local/hashed-ngrams-64");
        assert_eq!(embedder.embed_text("hello world").len(), 64);
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let embedder = HashEmbedder::new();
        let texts = vec!["first text".to_string(), "second text".to_string()];
        let batch = embedder.embed(&texts).await.unwrap();
        assert_eq!(batch[0], embedder.embed_text("first text"));
        assert_eq!(batch[1], embedder.embed_text("second text"));
    }
}
