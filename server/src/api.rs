//! Boundary operations
//!
//! The three operations a transport exposes: ask a question, add a
//! document, report status. Each call is independent.

use ragline_memory::{DocumentId, DocumentStore, HashEmbedding, VectorEngine};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::error::{ApiError, ApiResult};
use crate::workflow::{RagWorkflow, WorkflowSettings};

/// Answer to a question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResponse {
    pub question: String,
    pub answer: String,
    pub context_used: Vec<String>,
    pub latency_sec: f64,
}

/// Outcome of adding a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentResponse {
    pub id: DocumentId,
    pub status: String,
}

/// System status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
    pub using_primary_backend: bool,
    pub storage_type: String,
    pub document_count: usize,
    pub pipeline_ready: bool,
}

/// Thin facade over the workflow
#[derive(Clone)]
pub struct RagApi {
    workflow: Arc<RagWorkflow>,
}

impl RagApi {
    pub fn new(workflow: Arc<RagWorkflow>) -> Self {
        Self { workflow }
    }

    /// Validate the configuration and assemble engine, store and workflow
    ///
    /// Qdrant unavailability is not an error here: the store falls back to
    /// memory and the API works regardless.
    pub async fn from_config(config: &RagConfig) -> ApiResult<Self> {
        config.validate()?;

        let embedder = HashEmbedding::new(config.embedding_dimension)?;
        let engine = Arc::new(VectorEngine::new(Arc::new(embedder)));

        let store = if config.in_memory {
            tracing::info!("Primary backend disabled, using in-memory storage");
            DocumentStore::in_memory(config.embedding_dimension)
        } else {
            DocumentStore::connect(config.store_config()).await
        };

        let stats = store.stats();
        tracing::info!(
            "Document store ready (backend: {}, primary: {})",
            stats.backend.storage_type,
            stats.using_primary_backend
        );

        let settings = WorkflowSettings {
            search_limit: config.search_limit,
            preview_length: config.preview_length,
        };
        let workflow = RagWorkflow::new(engine, Arc::new(store), settings);
        Ok(Self::new(Arc::new(workflow)))
    }

    /// Answer a question from stored documents
    pub async fn ask_question(&self, question: &str) -> ApiResult<QuestionResponse> {
        if question.is_empty() {
            return Err(ApiError::invalid_request("question must not be empty"));
        }

        let start = Instant::now();
        let state = self.workflow.run(question).await.map_err(|e| {
            tracing::error!("Error processing question: {}", e);
            ApiError::from(e)
        })?;
        let latency_sec = (start.elapsed().as_secs_f64() * 1000.0).round() / 1000.0;

        Ok(QuestionResponse {
            question: state.question,
            answer: state.answer,
            context_used: state.context,
            latency_sec,
        })
    }

    /// Add a document under the next free id
    pub async fn add_document(&self, text: &str) -> ApiResult<DocumentResponse> {
        if text.is_empty() {
            return Err(ApiError::invalid_request("text must not be empty"));
        }

        let id = self.workflow.store().allocate_id();
        let added = self.workflow.add_document(text, Some(id)).await.map_err(|e| {
            tracing::error!("Error adding document: {}", e);
            ApiError::from(e)
        })?;

        if !added {
            return Err(ApiError::DocumentNotAdded);
        }

        tracing::debug!("Added document {}", id);
        Ok(DocumentResponse {
            id,
            status: "added".to_string(),
        })
    }

    /// Report backend and pipeline status
    pub async fn get_status(&self) -> StatusResponse {
        let store = self.workflow.store();
        let stats = store.stats();

        StatusResponse {
            using_primary_backend: stats.using_primary_backend,
            storage_type: stats.backend.storage_type.to_string(),
            document_count: store.document_count().await,
            pipeline_ready: self.workflow.is_ready(),
        }
    }

    pub fn workflow(&self) -> &Arc<RagWorkflow> {
        &self.workflow
    }
}
