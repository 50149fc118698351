//! OpenAI-compatible embedding client

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use vta_core::{Embedding, EmbeddingProvider, Error, Result};

/// Dimensionality assumed when the caller does not pin one (all-MiniLM-L6-v2).
const DEFAULT_DIMENSIONS: usize = 384;

/// Embedding client for OpenAI-compatible `/embeddings` endpoints
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dimensions: usize,
    request_dimensions: Option<usize>,
    max_retries: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

impl HttpEmbedder {
    /// Create a new client.
    ///
    /// `dimensions`, when set, is both sent to the endpoint and enforced on
    /// every returned vector; otherwise 384 is enforced and nothing is sent.
    pub fn new(
        api_key: String,
        base_url: &str,
        model: String,
        dimensions: Option<usize>,
        timeout: Duration,
        max_retries: usize,
    ) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Configuration("missing embedding API key".to_string()));
        }
        if model.trim().is_empty() {
            return Err(Error::Configuration("missing embedding model name".to_string()));
        }

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| Error::Configuration("invalid embedding API key".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model,
            dimensions: dimensions.unwrap_or(DEFAULT_DIMENSIONS),
            request_dimensions: dimensions,
            max_retries: max_retries.max(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn collect_vectors(&self, mut response: EmbeddingResponse, expected: usize) -> Result<Vec<Embedding>> {
        response.data.sort_by_key(|entry| entry.index);
        if response.data.len() != expected {
            return Err(Error::Embedding(format!(
                "endpoint returned {} embeddings for {} inputs",
                response.data.len(),
                expected
            )));
        }

        let vectors: Vec<Embedding> = response.data.into_iter().map(|entry| entry.embedding).collect();
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimensions) {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: bad.len(),
            });
        }
        Ok(vectors)
    }

    fn should_retry(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    fn retry_backoff(attempt: usize) -> Duration {
        let capped = attempt.min(5) as u32;
        Duration::from_millis(500 * (1 << capped))
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.request_dimensions,
        };

        let mut attempt = 0usize;
        loop {
            let outcome = self.client.post(&self.endpoint).json(&request).send().await;
            match outcome {
                Ok(response) if response.status().is_success() => {
                    let parsed: EmbeddingResponse = response
                        .json()
                        .await
                        .map_err(|e| Error::Serialization(e.to_string()))?;
                    return self.collect_vectors(parsed, texts.len());
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<body unavailable>".to_string());
                    if Self::should_retry(status) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        tracing::warn!("Embedding request failed ({}), retry {}", status, attempt);
                        tokio::time::sleep(Self::retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(Error::Embedding(format!(
                        "embedding request failed with status {}: {}",
                        status, body
                    )));
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        tracing::warn!("Embedding request error ({}), retry {}", e, attempt);
                        tokio::time::sleep(Self::retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(Error::Network(e.to_string()));
                }
            }
        }
    }
}
