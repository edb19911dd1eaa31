//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes the design-system readers and the integration generator as MCP
//! tools and resources. The server communicates over stdio using JSON-RPC 2.0
//! messages.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          MCP Server                          │
//! │                                                              │
//! │   ┌─────────────┐    ┌─────────────┐    ┌────────────────┐   │
//! │   │  Transport  │───▶│   Server    │───▶│ Tools          │   │
//! │   │   (stdio)   │    │ (lifecycle) │    │ Resources      │   │
//! │   └─────────────┘    └─────────────┘    └────────────────┘   │
//! │                             │                    │           │
//! │                             ▼                    ▼           │
//! │                   ┌──────────────────────────────────────┐   │
//! │                   │  design_system readers / integration │   │
//! │                   └──────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;
pub mod transport;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use tools::{ToolCallResult, ToolRequest};
pub use transport::{LineTransport, StdioTransport};
