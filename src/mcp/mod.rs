//! Model Context Protocol server.
//!
//! Speaks JSON-RPC 2.0, one message per line, and exposes the New Relic tools
//! through `tools/list` and `tools/call`.

pub mod protocol;
mod server;

pub use protocol::{McpRequest, McpResponse, RpcError, PROTOCOL_VERSION, SERVER_NAME};
pub use server::McpServer;
