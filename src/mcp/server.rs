//! MCP server over newline-delimited JSON on stdio.

use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::protocol::{
    error_codes, methods, CallToolParams, McpRequest, McpResponse, JSONRPC_VERSION,
    PROTOCOL_VERSION, SERVER_NAME,
};
use crate::error::{NewRelicError, Result};
use crate::tools::{get_tool_definitions, ToolRouter};

/// Handles MCP requests one at a time.
pub struct McpServer {
    router: ToolRouter,
}

impl McpServer {
    /// Creates a server dispatching tool calls through `router`.
    pub fn new(router: ToolRouter) -> Self {
        Self { router }
    }

    /// Reads requests from `reader` until EOF, writing one response line per
    /// request to `writer`.
    ///
    /// Lines that are not valid UTF-8 are decoded lossily and answered with a
    /// parse error like any other malformed message.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|e| NewRelicError::internal(format!("Failed to read from stdin: {e}")))?;
            if read == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };

            let mut payload = serde_json::to_string(&response).map_err(|e| {
                NewRelicError::internal(format!("Failed to serialize response: {e}"))
            })?;
            payload.push('\n');

            writer
                .write_all(payload.as_bytes())
                .await
                .map_err(|e| NewRelicError::internal(format!("Failed to write response: {e}")))?;
            writer
                .flush()
                .await
                .map_err(|e| NewRelicError::internal(format!("Failed to flush response: {e}")))?;
        }

        info!("Input closed, shutting down");
        Ok(())
    }

    /// Handles one raw input line. Returns `None` for blank lines and
    /// notifications.
    pub async fn handle_line(&self, line: &str) -> Option<McpResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match serde_json::from_str::<McpRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!(error = %e, "Unparseable MCP message");
                Some(McpResponse::failure(
                    serde_json::Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ))
            }
        }
    }

    /// Handles a decoded request.
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        debug!(method = %request.method, id = ?request.id, "MCP request received");

        if request.is_notification() {
            debug!(method = %request.method, "Received notification (no response will be sent)");
            return None;
        }
        let id = request.id.clone().unwrap_or_default();

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(McpResponse::failure(
                id,
                error_codes::INVALID_REQUEST,
                "Invalid Request: jsonrpc must be 2.0",
            ));
        }

        let response = match request.method.as_str() {
            methods::INITIALIZE => McpResponse::success(id, self.initialize()),
            methods::PING => McpResponse::success(id, json!({})),
            methods::TOOLS_LIST => McpResponse::success(id, json!({ "tools": get_tool_definitions() })),
            methods::TOOLS_CALL => self.tools_call(id, request.params).await,
            other => {
                warn!(method = %other, "Unknown MCP method");
                McpResponse::failure(
                    id,
                    error_codes::METHOD_NOT_FOUND,
                    format!("Method not found: {other}"),
                )
            }
        };

        Some(response)
    }

    fn initialize(&self) -> serde_json::Value {
        info!("MCP initialize");
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    async fn tools_call(&self, id: serde_json::Value, params: serde_json::Value) -> McpResponse {
        let params: CallToolParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => {
                return McpResponse::failure(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid params for tools/call: {e}"),
                );
            }
        };

        let output = self
            .router
            .call(&params.name, params.arguments.as_ref())
            .await;

        match serde_json::to_value(&output) {
            Ok(result) => McpResponse::success(id, result),
            Err(e) => McpResponse::failure(
                id,
                error_codes::INTERNAL_ERROR,
                format!("Internal error: {e}"),
            ),
        }
    }
}
