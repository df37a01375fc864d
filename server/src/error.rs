//! Error types for the Ragline server.

use crate::config::ConfigError;
use crate::mcp::protocol::JsonRpcError;
use ragline_memory::MemoryError;
use thiserror::Error;

/// Errors surfaced at the API boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Document not added")]
    DocumentNotAdded,

    #[error("Processing failed: {0}")]
    Processing(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ApiError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}

impl From<MemoryError> for ApiError {
    fn from(err: MemoryError) -> Self {
        Self::Processing(err.to_string())
    }
}

impl From<ApiError> for JsonRpcError {
    fn from(err: ApiError) -> Self {
        match &err {
            ApiError::InvalidRequest(_) => JsonRpcError::invalid_params(err.to_string()),
            _ => JsonRpcError::internal_error(err.to_string()),
        }
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        assert_eq!(ApiError::DocumentNotAdded.to_string(), "Document not added");
        assert_eq!(
            ApiError::Processing("boom".to_string()).to_string(),
            "Processing failed: boom"
        );
        assert_eq!(
            ApiError::invalid_request("question must not be empty").to_string(),
            "Invalid request: question must not be empty"
        );
    }

    #[test]
    fn test_from_config_error() {
        let err: ApiError = ConfigError::ZeroDimension.into();
        assert_eq!(
            err.to_string(),
            "Configuration error: embedding dimension must be positive"
        );
    }

    #[test]
    fn test_from_memory_error_is_processing() {
        let err: ApiError = MemoryError::embedding("model gone").into();
        assert!(matches!(err, ApiError::Processing(_)));
        assert!(err.to_string().contains("model gone"));
    }

    #[test]
    fn test_jsonrpc_conversion_invalid_request() {
        let err: JsonRpcError = ApiError::invalid_request("empty").into();
        assert_eq!(err.code, -32602);
    }

    #[test]
    fn test_jsonrpc_conversion_internal() {
        let err: JsonRpcError = ApiError::DocumentNotAdded.into();
        assert_eq!(err.code, -32603);
        assert!(err.message.contains("Document not added"));

        let err: JsonRpcError = ApiError::Processing("x".to_string()).into();
        assert_eq!(err.code, -32603);
    }
}
