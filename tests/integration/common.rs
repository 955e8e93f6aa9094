//! Shared helpers for integration tests.

use newrelic_mcp::config::Config;
use newrelic_mcp::mcp::McpServer;
use newrelic_mcp::newrelic::{MockTransport, NrqlExecutor};
use newrelic_mcp::tools::ToolRouter;

/// Account id used by every test executor.
pub const ACCOUNT_ID: &str = "12345";

/// Builds a tool router whose NerdGraph calls are answered by `mock`.
pub fn router(mock: &MockTransport) -> ToolRouter {
    let config = Config::new("test-api-key", ACCOUNT_ID);
    ToolRouter::new(NrqlExecutor::new(&config, Box::new(mock.clone())))
}

/// Builds an MCP server whose NerdGraph calls are answered by `mock`.
pub fn server(mock: &MockTransport) -> McpServer {
    McpServer::new(router(mock))
}

/// Returns the NRQL text embedded in the `index`-th request sent to `mock`.
pub fn sent_nrql(mock: &MockTransport, index: usize) -> String {
    let document = &mock.requests()[index].query;
    let start = document
        .find("nrql(query: \"")
        .map(|i| i + "nrql(query: \"".len())
        .expect("envelope contains nrql(query: ...)");
    let end = document.rfind("\") {").expect("envelope closes the query string");
    document[start..end].to_string()
}
