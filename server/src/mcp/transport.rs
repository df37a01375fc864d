//! MCP Transport Layer
//!
//! Stdio transport for JSON-RPC 2.0 communication, one message per line.

use super::protocol::{JsonRpcRequest, JsonRpcResponse};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Async line-delimited transport, stdio by default
pub struct AsyncStdioTransport<R = BufReader<tokio::io::Stdin>, W = tokio::io::Stdout> {
    reader: R,
    writer: W,
}

impl AsyncStdioTransport {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            writer: tokio::io::stdout(),
        }
    }
}

impl Default for AsyncStdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> AsyncStdioTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Use arbitrary streams instead of stdio
    pub fn with_streams(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read the next JSON-RPC request
    ///
    /// Blank lines are skipped. Returns `Ok(None)` at end of input and an
    /// `InvalidData` error for a line that is not a request.
    pub async fn read_request(&mut self) -> io::Result<Option<JsonRpcRequest>> {
        loop {
            let mut line = String::new();
            let bytes_read = self.reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                return Ok(None); // EOF
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            return match serde_json::from_str(line) {
                Ok(request) => Ok(Some(request)),
                Err(e) => {
                    tracing::error!("Failed to parse JSON-RPC request: {}", e);
                    Err(io::Error::new(io::ErrorKind::InvalidData, e))
                }
            };
        }
    }

    /// Write a JSON-RPC response
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        let json = serde_json::to_string(response)?;
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    /// Give back the writer, e.g. to inspect what was written
    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::JsonRpcError;

    #[tokio::test]
    async fn test_read_skips_blank_lines_and_stops_at_eof() {
        let input: &[u8] = b"\n  \n{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n";
        let mut transport = AsyncStdioTransport::with_streams(input, Vec::new());

        let request = transport.read_request().await.unwrap().unwrap();
        assert_eq!(request.method, "ping");
        assert!(transport.read_request().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_invalid_json() {
        let input: &[u8] = b"{not json}\n";
        let mut transport = AsyncStdioTransport::with_streams(input, Vec::new());

        let err = transport.read_request().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_write_response_is_one_line() {
        let input: &[u8] = b"";
        let mut transport = AsyncStdioTransport::with_streams(input, Vec::new());

        let error = JsonRpcError::method_not_found("unknown");
        transport
            .write_response(&JsonRpcResponse::error(Some(serde_json::json!(1)), error))
            .await
            .unwrap();

        let written = String::from_utf8(transport.into_writer()).unwrap();
        assert!(written.ends_with('\n'));
        assert_eq!(written.lines().count(), 1);
        assert!(written.contains("-32601"));
    }
}
