//! Document storage with backend fallback
//!
//! A [`DocumentStore`] owns exactly one [`VectorBackend`] for its whole
//! lifetime. At construction it probes the Qdrant vector database; when that
//! fails it settles on an [`InMemoryBackend`] and never switches again.
//!
//! Storage operations are fail-open: inserts report `false` and searches
//! return an empty list instead of raising.

mod memory;
mod qdrant;

pub use memory::InMemoryBackend;
pub use qdrant::QdrantBackend;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::document::{Document, DocumentId};
use crate::error::Result;

/// Default timeout for every request to the vector database
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Which kind of backend is serving a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BackendKind {
    #[serde(rename = "qdrant")]
    Qdrant,
    #[serde(rename = "in-memory")]
    InMemory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qdrant => "qdrant",
            Self::InMemory => "in-memory",
        }
    }

    /// Whether this is the preferred persistent backend
    pub fn is_primary(&self) -> bool {
        matches!(self, Self::Qdrant)
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend identity, as reported in statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendInfo {
    pub storage_type: BackendKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

/// A storage backend for documents and their vectors
#[async_trait]
pub trait VectorBackend: Send + Sync {
    /// Identity of this backend
    fn describe(&self) -> BackendInfo;

    /// Number of records held in process memory (0 for remote backends)
    fn in_memory_count(&self) -> usize {
        0
    }

    /// Store a document
    async fn upsert(&self, document: Document) -> Result<()>;

    /// Up to `limit` document texts for a query vector, best first
    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<String>>;

    /// Number of documents currently stored
    async fn document_count(&self) -> Result<usize>;
}

/// Connection settings for the primary backend
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Qdrant base URL, e.g. `http://localhost:6333`
    pub url: String,
    /// Collection recreated at startup
    pub collection: String,
    /// Optional API key sent as the `api-key` header
    pub api_key: Option<String>,
    /// Vector dimension for the collection and every document
    pub dimension: usize,
    /// Bound on the connectivity probe and on every request
    pub timeout: Duration,
}

impl StoreConfig {
    pub fn new(url: impl Into<String>, collection: impl Into<String>, dimension: usize) -> Self {
        Self {
            url: url.into(),
            collection: collection.into(),
            api_key: None,
            dimension,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Store statistics
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub using_primary_backend: bool,
    pub backend: BackendInfo,
    pub in_memory_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// Document store that masks backend unavailability from its callers
pub struct DocumentStore {
    backend: Box<dyn VectorBackend>,
    dimension: usize,
    next_id: AtomicU64,
    fallback_reason: Option<String>,
}

impl DocumentStore {
    /// Connect to Qdrant, falling back to in-memory storage on any failure
    ///
    /// On success the target collection is dropped and recreated, so every
    /// session starts empty. There is no retry: the choice made here holds
    /// for the lifetime of the store.
    pub async fn connect(config: StoreConfig) -> Self {
        match QdrantBackend::connect(&config).await {
            Ok(backend) => {
                log::info!(
                    "Qdrant connected at {} (collection '{}', {}d)",
                    config.url,
                    config.collection,
                    config.dimension
                );
                Self::with_backend(Box::new(backend), config.dimension)
            }
            Err(e) => {
                log::warn!("Qdrant not available at {}: {}", config.url, e);
                log::info!("Using in-memory storage as fallback");
                let mut store = Self::in_memory(config.dimension);
                store.fallback_reason = Some(e.to_string());
                store
            }
        }
    }

    /// Create a store on the in-memory backend without probing Qdrant
    pub fn in_memory(dimension: usize) -> Self {
        Self::with_backend(Box::new(InMemoryBackend::new()), dimension)
    }

    /// Create a store on an arbitrary backend
    pub fn with_backend(backend: Box<dyn VectorBackend>, dimension: usize) -> Self {
        let next_id = backend.in_memory_count() as u64;
        Self {
            backend,
            dimension,
            next_id: AtomicU64::new(next_id),
            fallback_reason: None,
        }
    }

    /// Add a document
    ///
    /// Returns `false` when the document is invalid or the backend fails; the
    /// document is then not stored.
    pub async fn add_document(&self, id: DocumentId, text: &str, vector: Vec<f32>) -> bool {
        let document = match Document::new(id, text, vector)
            .and_then(|doc| doc.check_dimension(self.dimension).map(|_| doc))
        {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("Rejected document {}: {}", id, e);
                return false;
            }
        };

        match self.backend.upsert(document).await {
            Ok(()) => {
                // Keep generated ids clear of caller-supplied ones
                self.next_id.fetch_max(id.saturating_add(1), Ordering::SeqCst);
                true
            }
            Err(e) => {
                log::error!("Error adding document {}: {}", id, e);
                false
            }
        }
    }

    /// Search for up to `limit` document texts
    ///
    /// On Qdrant the results are ranked by cosine similarity. On the
    /// in-memory backend they are the first `limit` documents in insertion
    /// order and have nothing to do with the query.
    pub async fn search(&self, query: &[f32], limit: usize) -> Vec<String> {
        if limit == 0 {
            return Vec::new();
        }
        if query.len() != self.dimension {
            log::warn!(
                "Search vector has {} values, store expects {}",
                query.len(),
                self.dimension
            );
            return Vec::new();
        }

        match self.backend.search(query, limit).await {
            Ok(results) => results,
            Err(e) => {
                log::error!("Error searching: {}", e);
                Vec::new()
            }
        }
    }

    /// Reserve the next document id
    ///
    /// Atomic, so concurrent callers never receive the same id.
    pub fn allocate_id(&self) -> DocumentId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Get store statistics
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            using_primary_backend: self.using_primary_backend(),
            backend: self.backend.describe(),
            in_memory_count: self.backend.in_memory_count(),
            fallback_reason: self.fallback_reason.clone(),
        }
    }

    /// Number of documents in the active backend (0 if it cannot say)
    pub async fn document_count(&self) -> usize {
        match self.backend.document_count().await {
            Ok(count) => count,
            Err(e) => {
                log::warn!("Could not count documents: {}", e);
                0
            }
        }
    }

    pub fn using_primary_backend(&self) -> bool {
        self.backend.describe().storage_type.is_primary()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MemoryError;
    use std::sync::Arc;

    /// Backend that fails every call
    struct BrokenBackend;

    #[async_trait]
    impl VectorBackend for BrokenBackend {
        fn describe(&self) -> BackendInfo {
            BackendInfo {
                storage_type: BackendKind::Qdrant,
                url: Some("http://broken:6333".to_string()),
                collection: Some("broken".to_string()),
            }
        }

        async fn upsert(&self, _document: Document) -> Result<()> {
            Err(MemoryError::backend("simulated upsert failure"))
        }

        async fn search(&self, _query: &[f32], _limit: usize) -> Result<Vec<String>> {
            Err(MemoryError::backend("simulated search failure"))
        }

        async fn document_count(&self) -> Result<usize> {
            Err(MemoryError::backend("simulated count failure"))
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_falls_back() {
        let config = StoreConfig::new("http://127.0.0.1:9", "test_collection", 4)
            .with_timeout(Duration::from_millis(500));
        let store = DocumentStore::connect(config).await;

        let stats = store.stats();
        assert!(!stats.using_primary_backend);
        assert_eq!(stats.backend.storage_type, BackendKind::InMemory);
        assert!(stats.fallback_reason.is_some());

        assert!(store.add_document(0, "fallback text", vec![0.5; 4]).await);
        assert_eq!(store.stats().in_memory_count, 1);
        assert_eq!(
            store.search(&[0.1; 4], 5).await,
            vec!["fallback text".to_string()]
        );
    }

    #[tokio::test]
    async fn test_invalid_url_falls_back() {
        let store = DocumentStore::connect(StoreConfig::new("not a url", "c", 4)).await;
        assert!(!store.using_primary_backend());
        assert!(store.search(&[0.0; 4], 1).await.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_wrong_dimension_and_empty_text() {
        let store = DocumentStore::in_memory(4);
        assert!(!store.add_document(0, "short vector", vec![0.1; 3]).await);
        assert!(!store.add_document(1, "", vec![0.1; 4]).await);
        assert_eq!(store.stats().in_memory_count, 0);
    }

    #[tokio::test]
    async fn test_search_with_wrong_dimension_is_empty() {
        let store = DocumentStore::in_memory(4);
        assert!(store.add_document(0, "doc", vec![0.1; 4]).await);
        assert!(store.search(&[0.1; 2], 3).await.is_empty());
        assert!(store.search(&[0.1; 4], 0).await.is_empty());
    }

    #[tokio::test]
    async fn test_backend_errors_are_swallowed() {
        let store = DocumentStore::with_backend(Box::new(BrokenBackend), 4);
        assert!(store.using_primary_backend());
        assert!(!store.add_document(0, "doc", vec![0.1; 4]).await);
        assert!(store.search(&[0.1; 4], 3).await.is_empty());
        assert_eq!(store.document_count().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_id_reports_false() {
        let store = DocumentStore::in_memory(2);
        assert!(store.add_document(3, "first", vec![0.0, 1.0]).await);
        assert!(!store.add_document(3, "second", vec![1.0, 0.0]).await);
        assert_eq!(store.search(&[0.0, 0.0], 10).await, vec!["first".to_string()]);
    }

    #[tokio::test]
    async fn test_allocate_id_skips_explicit_ids() {
        let store = DocumentStore::in_memory(2);
        assert_eq!(store.allocate_id(), 0);
        assert!(store.add_document(5, "explicit", vec![0.0, 1.0]).await);
        assert_eq!(store.allocate_id(), 6);
    }

    #[tokio::test]
    async fn test_concurrent_allocation_is_unique() {
        let store = Arc::new(DocumentStore::in_memory(2));
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let id = store.allocate_id();
                let ok = store
                    .add_document(id, &format!("doc {}", i), vec![0.5, 0.5])
                    .await;
                (id, ok)
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            let (id, ok) = handle.await.unwrap();
            assert!(ok);
            ids.push(id);
        }
        ids.sort_unstable();
        assert_eq!(ids, (0..16).collect::<Vec<_>>());
        assert_eq!(store.document_count().await, 16);
    }

    #[test]
    fn test_backend_kind_strings() {
        assert_eq!(BackendKind::Qdrant.to_string(), "qdrant");
        assert_eq!(BackendKind::InMemory.as_str(), "in-memory");
        assert_eq!(
            serde_json::to_value(BackendKind::InMemory).unwrap(),
            serde_json::json!("in-memory")
        );
    }
}
