//! In-process fallback backend
//!
//! Non-persistent. Search does no similarity computation at all: it returns
//! the oldest documents first, whatever the query. Answers served from this
//! backend are unrelated to the question asked.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashSet;

use super::{BackendInfo, BackendKind, VectorBackend};
use crate::document::{Document, DocumentId};
use crate::error::{MemoryError, Result};

#[derive(Default)]
struct Records {
    documents: Vec<Document>,
    ids: HashSet<DocumentId>,
}

/// Append-only document list guarded by a lock
#[derive(Default)]
pub struct InMemoryBackend {
    records: RwLock<Records>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorBackend for InMemoryBackend {
    fn describe(&self) -> BackendInfo {
        BackendInfo {
            storage_type: BackendKind::InMemory,
            url: None,
            collection: None,
        }
    }

    fn in_memory_count(&self) -> usize {
        self.records.read().documents.len()
    }

    async fn upsert(&self, document: Document) -> Result<()> {
        let mut records = self.records.write();
        if !records.ids.insert(document.id) {
            return Err(MemoryError::DuplicateId(document.id));
        }
        records.documents.push(document);
        Ok(())
    }

    async fn search(&self, _query: &[f32], limit: usize) -> Result<Vec<String>> {
        Ok(self
            .records
            .read()
            .documents
            .iter()
            .take(limit)
            .map(|doc| doc.text.clone())
            .collect())
    }

    async fn document_count(&self) -> Result<usize> {
        Ok(self.in_memory_count())
    }
}
