//! MCP (Model Context Protocol) Server Module
//!
//! Exposes the question answering API to AI clients as MCP tools.
//!
//! ## Usage
//!
//! ```bash
//! ragline --qdrant-url http://localhost:6333 --collection docs
//! ```
//!
//! The MCP server communicates via stdio using JSON-RPC 2.0.

pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use protocol::*;
pub use server::McpServer;
