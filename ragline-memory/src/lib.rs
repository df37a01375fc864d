//! Ragline Memory Layer
//!
//! Vectorization and document storage for the Ragline retrieval pipeline.
//!
//! ## Features
//!
//! - **Deterministic embeddings** - Stable text-to-vector mapping behind a pluggable `Embedder`
//! - **Resilient storage** - Qdrant vector database with automatic in-memory fallback
//! - **Fail-open operations** - Insert failures report `false`, search failures return nothing
//!
//! ## Example
//!
//! ```ignore
//! use ragline_memory::{DocumentStore, HashEmbedding, StoreConfig, VectorEngine};
//!
//! let engine = VectorEngine::new(Arc::new(HashEmbedding::new(128)?));
//! let config = StoreConfig::new("http://localhost:6333", "docs", 128);
//! let store = DocumentStore::connect(config).await;
//!
//! let id = store.allocate_id();
//! let vector = engine.embed("Qdrant stores vectors.")?;
//! store.add_document(id, "Qdrant stores vectors.", vector).await;
//!
//! let hits = store.search(&engine.embed("What stores vectors?")?, 2).await;
//! ```

pub mod document;
pub mod embedding;
pub mod error;
pub mod storage;

// Re-exports for convenience
pub use document::{Document, DocumentId};
pub use embedding::{Embedder, HashEmbedding, VectorEngine};
pub use error::MemoryError;
pub use storage::{
    BackendInfo, BackendKind, DocumentStore, InMemoryBackend, QdrantBackend, StoreConfig,
    StoreStats, VectorBackend,
};
