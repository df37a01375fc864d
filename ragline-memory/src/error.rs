//! Error types for ragline-memory

use thiserror::Error;

/// Errors that can occur in the memory layer
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Invalid configuration (fatal at startup)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP transport error talking to the vector database
    #[error("Backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The vector database answered, but not with what we asked for
    #[error("Backend error: {0}")]
    Backend(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Embedding generation error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector length does not match the configured dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Document id already present in a store that does not replace
    #[error("Duplicate document id: {0}")]
    DuplicateId(u64),

    /// Document failed validation
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl MemoryError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create an embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create an invalid document error
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Result type for memory operations
pub type Result<T> = std::result::Result<T, MemoryError>;
