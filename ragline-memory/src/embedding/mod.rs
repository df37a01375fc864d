//! Embedding module for vector search
//!
//! Text goes in, a fixed-dimension vector comes out. The mapping is
//! pluggable through [`Embedder`]; [`HashEmbedding`] is the deterministic
//! default.

mod engine;
mod hash;

pub use engine::VectorEngine;
pub use hash::HashEmbedding;

use crate::error::Result;

/// Text-to-vector conversion
///
/// Implementations must be deterministic: the same text always yields the
/// same vector of length [`Embedder::dimension`].
pub trait Embedder: Send + Sync {
    /// Length of every vector this embedder produces
    fn dimension(&self) -> usize;

    /// Embed a single text
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
