//! Vector embedding engine
//!
//! Front for an [`Embedder`] that remembers the most recent vectors.

use super::Embedder;
use crate::error::Result;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Vectors kept by [`VectorEngine::new`]
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Embedding front with a bounded LRU cache
pub struct VectorEngine {
    model: Arc<dyn Embedder>,
    cache: Mutex<LruCache<String, Vec<f32>>>,
}

impl VectorEngine {
    pub fn new(model: Arc<dyn Embedder>) -> Self {
        Self::with_capacity(model, DEFAULT_CACHE_CAPACITY)
    }

    /// Keep at most `capacity` vectors; 0 is treated as 1
    pub fn with_capacity(model: Arc<dyn Embedder>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        log::info!(
            "VectorEngine ready ({}d, cache {})",
            model.dimension(),
            capacity
        );

        Self {
            model,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Embed `text`, reusing a cached vector when there is one
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(cached) = self.cache.lock().get(text) {
            return Ok(cached.clone());
        }

        let embedding = self.model.embed(text)?;
        self.cache.lock().put(text.to_string(), embedding.clone());
        Ok(embedding)
    }

    pub fn dimension(&self) -> usize {
        self.model.dimension()
    }
}
