//! Model Context Protocol (MCP) server
//!
//! Exposes the research loop to MCP clients as one `deep_search` tool, over
//! stdio (`deepsearch mcp`) or streamable HTTP at `/mcp` (`deepsearch serve`).

/// The `deep_search` tool server.
pub mod server;

pub use server::{start_stdio_server, streamable_http_service, DeepSearchMcpServer};
