//! Document types
//!
//! The unit of storage: an id, its text and the text's vector.

use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, Result};

/// Document identifier, unique within one store session
pub type DocumentId = u64;

/// A stored text fragment with its embedding
///
/// Immutable once created; the store owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub text: String,
    pub vector: Vec<f32>,
}

impl Document {
    /// Create a document, rejecting empty text
    pub fn new(id: DocumentId, text: impl Into<String>, vector: Vec<f32>) -> Result<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(MemoryError::invalid_document("text must not be empty"));
        }
        Ok(Self { id, text, vector })
    }

    /// Check the vector against the store dimension
    pub fn check_dimension(&self, dimension: usize) -> Result<()> {
        if self.vector.len() != dimension {
            return Err(MemoryError::DimensionMismatch {
                expected: dimension,
                actual: self.vector.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_rejected() {
        let result = Document::new(0, "", vec![0.0; 4]);
        assert!(matches!(result, Err(MemoryError::InvalidDocument(_))));
    }

    #[test]
    fn test_check_dimension() {
        let doc = Document::new(7, "hello", vec![0.1, 0.2, 0.3]).unwrap();
        assert!(doc.check_dimension(3).is_ok());
        assert!(matches!(
            doc.check_dimension(4),
            Err(MemoryError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }
}
