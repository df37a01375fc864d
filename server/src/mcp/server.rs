//! MCP Server Implementation
//!
//! Handles MCP protocol requests and routes tool calls to the API.

use super::protocol::*;
use super::tools::{get_all_tools, ADD_DOCUMENT, ASK_QUESTION, GET_STATUS};
use super::transport::AsyncStdioTransport;
use crate::api::RagApi;
use crate::error::ApiError;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncWrite};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "ragline";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server - handles protocol messages
pub struct McpServer {
    api: RagApi,
}

impl McpServer {
    pub fn new(api: RagApi) -> Self {
        Self { api }
    }

    /// Run the MCP server event loop on stdio
    pub async fn run(&self) -> std::io::Result<()> {
        let mut transport = AsyncStdioTransport::new();
        self.serve(&mut transport).await
    }

    /// Serve requests from a transport until its input ends
    pub async fn serve<R, W>(
        &self,
        transport: &mut AsyncStdioTransport<R, W>,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!("MCP server starting...");

        loop {
            match transport.read_request().await {
                Ok(Some(request)) => {
                    if let Some(response) = self.handle_request(request).await {
                        transport.write_response(&response).await?;
                    }
                }
                Ok(None) => {
                    tracing::info!("Client disconnected");
                    break;
                }
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    let response = JsonRpcResponse::error(
                        None,
                        JsonRpcError::parse_error(format!("Parse error: {}", e)),
                    );
                    transport.write_response(&response).await?;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    /// Handle a JSON-RPC request; notifications get no response
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        tracing::debug!("Handling request: {}", request.method);

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request(format!(
                    "Unsupported JSON-RPC version: {}",
                    request.jsonrpc
                )),
            ));
        }

        let notification = request.is_notification();
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params),
            "initialized" | "notifications/initialized" | "notifications/cancelled" => {
                JsonRpcResponse::success(request.id, Value::Null)
            }
            "ping" => JsonRpcResponse::from_serializable(request.id, &PingResult {}),
            "tools/list" => JsonRpcResponse::from_serializable(
                request.id,
                &ToolsListResult {
                    tools: get_all_tools(),
                },
            ),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => {
                JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(&request.method))
            }
        };

        if notification {
            None
        } else {
            Some(response)
        }
    }

    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();

        if let Some(client) = &params.client_info {
            tracing::info!(
                "Client connected: {} {} (protocol {})",
                client.name,
                client.version.as_deref().unwrap_or(""),
                params.protocol_version.as_deref().unwrap_or("unspecified")
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                logging: Some(LoggingCapability {}),
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: Some(SERVER_VERSION.to_string()),
            },
        };

        JsonRpcResponse::from_serializable(id, &result)
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("Invalid params: {}", e)),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(id, JsonRpcError::invalid_params("Missing params"));
            }
        };

        let tool_result = match self.execute_tool(&params.name, params.arguments).await {
            Ok(result) => ToolCallResult {
                content: vec![ToolResultContent::Text {
                    text: serde_json::to_string_pretty(&result)
                        .unwrap_or_else(|_| result.to_string()),
                }],
                is_error: None,
            },
            Err(e @ ApiError::InvalidRequest(_)) => {
                return JsonRpcResponse::error(id, JsonRpcError::from(e));
            }
            Err(e) => ToolCallResult {
                content: vec![ToolResultContent::Text {
                    text: format!("Error: {}", e),
                }],
                is_error: Some(true),
            },
        };

        JsonRpcResponse::from_serializable(id, &tool_result)
    }

    /// Execute a tool by name
    async fn execute_tool(&self, name: &str, args: Option<Value>) -> Result<Value, ApiError> {
        let args = args.unwrap_or(Value::Object(serde_json::Map::new()));

        let value = match name {
            ASK_QUESTION => {
                let question = string_arg(&args, "question")?;
                serde_json::to_value(self.api.ask_question(question).await?)
            }
            ADD_DOCUMENT => {
                let text = string_arg(&args, "text")?;
                serde_json::to_value(self.api.add_document(text).await?)
            }
            GET_STATUS => serde_json::to_value(self.api.get_status().await),
            _ => return Err(ApiError::invalid_request(format!("Unknown tool: {}", name))),
        };

        value.map_err(|e| ApiError::Processing(e.to_string()))
    }
}

fn string_arg<'a>(args: &'a Value, key: &str) -> Result<&'a str, ApiError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError::invalid_request(format!("Missing '{}' parameter", key)))
}
