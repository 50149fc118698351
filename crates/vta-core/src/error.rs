//! Error types for the VTA retrieval core

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the VTA retrieval core
#[derive(Error, Debug)]
pub enum Error {
    #[error("No documents loaded. Load documents before building the index.")]
    NoDocuments,

    #[error("Index not ready: embeddings and documents must be loaded first")]
    NotIndexed,

    #[error("Index mismatch: {embeddings} embeddings for {documents} documents")]
    IndexMismatch { embeddings: usize, documents: usize },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding provider error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl Error {
    /// Usage errors are caller mistakes rather than environmental failures.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Error::NoDocuments
                | Error::NotIndexed
                | Error::IndexMismatch { .. }
                | Error::DimensionMismatch { .. }
        )
    }
}
