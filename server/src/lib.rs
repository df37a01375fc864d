//! Ragline Server Library
//!
//! Retrieval-augmented question answering: documents are embedded and stored
//! through `ragline_memory`, questions run through a two-stage
//! retrieve/answer workflow, and the operations are served to AI clients
//! over MCP.

pub mod api;
pub mod config;
pub mod error;
pub mod mcp;
pub mod workflow;

pub use api::{DocumentResponse, QuestionResponse, RagApi, StatusResponse};
pub use config::{ConfigError, RagConfig};
pub use error::{ApiError, ApiResult};
pub use workflow::{PipelineState, RagWorkflow, WorkflowSettings};
