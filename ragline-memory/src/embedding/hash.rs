//! Hash-seeded deterministic embeddings
//!
//! Stand-in for a real embedding model. Vectors carry no semantic meaning:
//! nearby vectors do not imply similar texts.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use super::Embedder;
use crate::error::{MemoryError, Result};

/// Default embedding dimension
pub const DEFAULT_DIMENSION: usize = 128;

/// Deterministic embedding seeded from a SHA-256 digest of the text
///
/// Every call builds its own generator, so concurrent callers never share
/// random state.
#[derive(Debug, Clone)]
pub struct HashEmbedding {
    dimension: usize,
}

impl HashEmbedding {
    /// Create an embedder producing vectors of `dimension` values
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(MemoryError::configuration(
                "embedding dimension must be a positive integer",
            ));
        }
        Ok(Self { dimension })
    }

    fn seed(text: &str) -> u64 {
        let digest = Sha256::digest(text.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }
}

impl Default for HashEmbedding {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
        }
    }
}

impl Embedder for HashEmbedding {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut rng = StdRng::seed_from_u64(Self::seed(text));
        Ok((0..self.dimension).map(|_| rng.gen::<f32>()).collect())
    }
}
