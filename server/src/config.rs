//! Runtime configuration
//!
//! Every setting can be given as a command-line flag or an environment
//! variable. Values are validated once at startup; an invalid value is
//! fatal.

use clap::Args;
use ragline_memory::StoreConfig;
use std::time::Duration;
use thiserror::Error;

/// Invalid configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("embedding dimension must be positive")]
    ZeroDimension,

    #[error("search limit must be positive")]
    ZeroSearchLimit,

    #[error("backend timeout must be positive")]
    ZeroTimeout,

    #[error("collection name must not be empty")]
    EmptyCollection,

    #[error("invalid Qdrant URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Settings for the retrieval pipeline and its storage
#[derive(Debug, Clone, Args)]
pub struct RagConfig {
    /// Qdrant base URL
    #[arg(long, env = "QDRANT_URL", default_value = "http://localhost:6333")]
    pub qdrant_url: String,

    /// Qdrant collection, recreated at startup
    #[arg(long, env = "QDRANT_COLLECTION", default_value = "demo_collection")]
    pub collection: String,

    /// API key for Qdrant Cloud or secured instances
    #[arg(long, env = "QDRANT_API_KEY")]
    pub qdrant_api_key: Option<String>,

    /// Length of every embedding vector
    #[arg(long, env = "EMBEDDING_DIMENSION", default_value_t = 128)]
    pub embedding_dimension: usize,

    /// Number of documents retrieved per question
    #[arg(long, env = "SEARCH_LIMIT", default_value_t = 2)]
    pub search_limit: usize,

    /// Characters of the top document quoted in an answer
    #[arg(long, env = "ANSWER_PREVIEW_LENGTH", default_value_t = 100)]
    pub preview_length: usize,

    /// Timeout in seconds for the Qdrant probe and each request
    #[arg(long, env = "BACKEND_TIMEOUT_SECS", default_value_t = 5)]
    pub backend_timeout_secs: u64,

    /// Skip Qdrant and keep documents in memory
    #[arg(long, env = "RAGLINE_IN_MEMORY")]
    pub in_memory: bool,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            qdrant_url: "http://localhost:6333".to_string(),
            collection: "demo_collection".to_string(),
            qdrant_api_key: None,
            embedding_dimension: 128,
            search_limit: 2,
            preview_length: 100,
            backend_timeout_secs: 5,
            in_memory: false,
        }
    }
}

impl RagConfig {
    /// Check every value, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding_dimension == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if self.search_limit == 0 {
            return Err(ConfigError::ZeroSearchLimit);
        }
        if self.backend_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.collection.trim().is_empty() {
            return Err(ConfigError::EmptyCollection);
        }
        match reqwest::Url::parse(&self.qdrant_url) {
            Ok(url) if url.cannot_be_a_base() => Err(ConfigError::InvalidUrl {
                url: self.qdrant_url.clone(),
                reason: "not a base URL".to_string(),
            }),
            Ok(_) => Ok(()),
            Err(e) => Err(ConfigError::InvalidUrl {
                url: self.qdrant_url.clone(),
                reason: e.to_string(),
            }),
        }
    }

    /// Storage settings derived from this configuration
    pub fn store_config(&self) -> StoreConfig {
        let config = StoreConfig::new(&self.qdrant_url, &self.collection, self.embedding_dimension)
            .with_timeout(Duration::from_secs(self.backend_timeout_secs));
        match &self.qdrant_api_key {
            Some(key) => config.with_api_key(key),
            None => config,
        }
    }
}
