//! Retrieval workflow
//!
//! Two strictly sequential stages drive a fresh [`PipelineState`] per
//! question:
//!
//! 1. `Retrieve` - embed the question and fetch matching documents into
//!    `context`
//! 2. `Answer` - quote the first context entry, or admit defeat
//!
//! The workflow keeps no memory between runs.

use ragline_memory::{DocumentId, DocumentStore, MemoryError, VectorEngine};
use serde::Serialize;
use std::sync::Arc;

/// Answer given when retrieval finds nothing
pub const NO_ANSWER: &str = "Sorry, I don't know.";

/// Marker appended to a truncated preview
pub const ELLIPSIS: &str = "...";

/// State threaded through the pipeline stages of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineState {
    pub question: String,
    pub context: Vec<String>,
    pub answer: String,
}

impl PipelineState {
    fn new(question: &str) -> Self {
        Self {
            question: question.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Retrieve,
    Answer,
}

/// Tunables for the pipeline stages
#[derive(Debug, Clone, Copy)]
pub struct WorkflowSettings {
    /// Documents fetched per question
    pub search_limit: usize,
    /// Characters quoted from the top document
    pub preview_length: usize,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            search_limit: 2,
            preview_length: 100,
        }
    }
}

/// Coordinates the vector engine and the document store
pub struct RagWorkflow {
    engine: Arc<VectorEngine>,
    store: Arc<DocumentStore>,
    settings: WorkflowSettings,
}

impl RagWorkflow {
    pub fn new(
        engine: Arc<VectorEngine>,
        store: Arc<DocumentStore>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            engine,
            store,
            settings,
        }
    }

    /// Answer a question
    ///
    /// Storage problems never fail a run; they show up as an empty context.
    /// Only an embedding failure is returned as an error.
    pub async fn run(&self, question: &str) -> Result<PipelineState, MemoryError> {
        let mut state = PipelineState::new(question);
        let mut stage = Some(Stage::Retrieve);

        while let Some(current) = stage {
            tracing::debug!("Running stage {:?}", current);
            stage = match current {
                Stage::Retrieve => {
                    self.retrieve(&mut state).await?;
                    Some(Stage::Answer)
                }
                Stage::Answer => {
                    self.answer(&mut state);
                    None
                }
            };
        }

        Ok(state)
    }

    async fn retrieve(&self, state: &mut PipelineState) -> Result<(), MemoryError> {
        let query = self.engine.embed(&state.question)?;
        state.context = self.store.search(&query, self.settings.search_limit).await;
        tracing::debug!("Retrieved {} context documents", state.context.len());
        Ok(())
    }

    fn answer(&self, state: &mut PipelineState) {
        state.answer = synthesize_answer(&state.context, self.settings.preview_length);
    }

    /// Embed and store a document
    ///
    /// Without an explicit id the store allocates the next free one. Returns
    /// the store's verdict unchanged: `false` means the document was not
    /// stored.
    pub async fn add_document(
        &self,
        text: &str,
        id: Option<DocumentId>,
    ) -> Result<bool, MemoryError> {
        let id = id.unwrap_or_else(|| self.store.allocate_id());
        let vector = self.engine.embed(text)?;
        Ok(self.store.add_document(id, text, vector).await)
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    pub fn engine(&self) -> &Arc<VectorEngine> {
        &self.engine
    }

    pub fn settings(&self) -> WorkflowSettings {
        self.settings
    }

    /// The stage machine is fixed at construction, so a built workflow is ready
    pub fn is_ready(&self) -> bool {
        true
    }
}

/// Build the answer from retrieved context
pub fn synthesize_answer(context: &[String], preview_length: usize) -> String {
    match context.first() {
        Some(top) => format!("I found this: '{}'", preview(top, preview_length)),
        None => NO_ANSWER.to_string(),
    }
}

/// First `length` characters of `text`, with an ellipsis if anything was cut
fn preview(text: &str, length: usize) -> String {
    match text.char_indices().nth(length) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
