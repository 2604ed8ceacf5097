/// MCP protocol implementation
///
/// This module handles the Model Context Protocol communication:
/// JSON-RPC framing on stdin/stdout and routing of tool calls.

pub mod protocol;
pub mod server;

// Re-export main types
pub use server::McpServer;
