//! MCP tool definitions and dispatch.
//!
//! Each tool validates its arguments, renders NRQL through the query builder
//! and runs it with the [`NrqlExecutor`]. Results are returned as
//! pretty-printed JSON text content; failures become `isError` content.

pub mod params;

pub use params::{
    names, ApmMetricsParams, Attributes, RawQueryParams, RecentLogsParams, SearchLogsParams,
    ToolRequest, TransactionTracesParams,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{NewRelicError, Result};
use crate::newrelic::NrqlExecutor;

/// Tool definition advertised through `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Returns the tool definitions exposed by the server.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: names::QUERY_LOGS.to_string(),
            description: "Execute a custom NRQL query against New Relic logs. \
                          Use this for complex queries with specific filtering and aggregations. \
                          Example: \"SELECT * FROM Log WHERE message LIKE '%error%' SINCE 1 HOUR AGO LIMIT 100\""
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "NRQL query to execute against New Relic logs"
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: names::SEARCH_LOGS.to_string(),
            description: "Search New Relic logs with keyword filtering and optional attributes. \
                          This is a simpler alternative to query-logs for basic searches."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "keywords": {
                        "type": "string",
                        "description": "Keywords to search for in log messages"
                    },
                    "timeRange": {
                        "type": "string",
                        "description": "Time range (e.g., \"1 HOUR AGO\", \"30 MINUTES AGO\", \"1 DAY AGO\")",
                        "default": "1 HOUR AGO"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of results to return",
                        "default": 100
                    },
                    "attributes": {
                        "type": "object",
                        "description": "Additional attributes to filter by (key-value pairs)",
                        "additionalProperties": { "type": "string" }
                    }
                }
            }),
        },
        ToolDefinition {
            name: names::GET_RECENT_LOGS.to_string(),
            description: "Get the most recent log entries from New Relic. \
                          Useful for quickly checking the latest logs without specific filters."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "number",
                        "description": "Number of recent log entries to retrieve",
                        "default": 50
                    },
                    "timeRange": {
                        "type": "string",
                        "description": "Time range to search within",
                        "default": "1 HOUR AGO"
                    }
                }
            }),
        },
        ToolDefinition {
            name: names::QUERY_APM.to_string(),
            description: "Execute a custom NRQL query against New Relic APM data (Transaction, \
                          TransactionError, Span and related event types). \
                          Example: \"SELECT average(duration) FROM Transaction WHERE appName = 'MyApp' SINCE 1 HOUR AGO\""
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "NRQL query to execute against APM data"
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: names::GET_APM_METRICS.to_string(),
            description: "Get key APM metrics (response time, throughput, error rate, apdex) \
                          for one application or for all applications faceted by name. \
                          Each metric is reported separately; a failing metric does not hide the others."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "appName": {
                        "type": "string",
                        "description": "Application name to filter metrics (optional)"
                    },
                    "timeRange": {
                        "type": "string",
                        "description": "Time range (e.g., \"1 HOUR AGO\", \"30 MINUTES AGO\", \"1 DAY AGO\")",
                        "default": "1 HOUR AGO"
                    },
                    "metrics": {
                        "type": "array",
                        "items": {
                            "type": "string",
                            "enum": ["responseTime", "throughput", "errorRate", "apdex"]
                        },
                        "description": "Metrics to retrieve",
                        "default": ["responseTime", "throughput", "errorRate"]
                    }
                }
            }),
        },
        ToolDefinition {
            name: names::GET_TRANSACTION_TRACES.to_string(),
            description: "Get the slowest transactions, optionally filtered by application \
                          and minimum duration. Useful for finding performance bottlenecks."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "appName": {
                        "type": "string",
                        "description": "Application name to filter transactions"
                    },
                    "minDuration": {
                        "type": "number",
                        "description": "Minimum transaction duration in seconds to filter slow transactions"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of transaction traces to return",
                        "default": 10
                    },
                    "timeRange": {
                        "type": "string",
                        "description": "Time range to search within",
                        "default": "1 HOUR AGO"
                    }
                }
            }),
        },
    ]
}

/// One item of tool result content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// Result payload of a `tools/call`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutput {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolOutput {
    /// Creates a successful text result.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates a failed result carrying the error message.
    pub fn error(error: &NewRelicError) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: format!("Error: {error}"),
            }],
            is_error: true,
        }
    }

    /// Returns the text of the first content item.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|c| match c {
            ToolContent::Text { text } => text.as_str(),
        })
    }
}

/// Routes tool calls to the NRQL executor.
pub struct ToolRouter {
    executor: NrqlExecutor,
}

impl ToolRouter {
    /// Creates a router over the given executor.
    pub fn new(executor: NrqlExecutor) -> Self {
        Self { executor }
    }

    /// Validates and runs a tool call, folding every failure into the output.
    pub async fn call(&self, name: &str, arguments: Option<&serde_json::Value>) -> ToolOutput {
        info!(tool = %name, "Tool call");

        let result = match ToolRequest::parse(name, arguments) {
            Ok(request) => self.dispatch(&request).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(text) => ToolOutput::text(text),
            Err(e) => {
                if e.is_caller_error() {
                    warn!(tool = %name, category = e.category(), error = %e, "Tool call rejected");
                } else {
                    error!(tool = %name, category = e.category(), error = %e, "Tool call failed");
                }
                ToolOutput::error(&e)
            }
        }
    }

    /// Runs a validated request and returns the pretty-printed JSON result.
    pub async fn dispatch(&self, request: &ToolRequest) -> Result<String> {
        debug!(tool = request.tool_name(), "Dispatching tool request");

        match request {
            ToolRequest::QueryLogs(p) => to_json(&self.executor.query_logs(&p.query).await?),
            ToolRequest::SearchLogs(p) => {
                let attributes = p
                    .attributes
                    .as_ref()
                    .map(Attributes::as_slice)
                    .unwrap_or_default();
                let rows = self
                    .executor
                    .search_logs(p.keywords.as_deref(), &p.time_range, p.limit, attributes)
                    .await?;
                to_json(&rows)
            }
            ToolRequest::RecentLogs(p) => {
                to_json(&self.executor.recent_logs(p.limit, &p.time_range).await?)
            }
            ToolRequest::QueryApm(p) => to_json(&self.executor.query_apm(&p.query).await?),
            ToolRequest::ApmMetrics(p) => {
                let outcomes = self
                    .executor
                    .apm_metrics(p.app_name.as_deref(), &p.time_range, &p.metrics)
                    .await;
                to_json(&outcomes)
            }
            ToolRequest::TransactionTraces(p) => {
                let rows = self
                    .executor
                    .transaction_traces(p.app_name.as_deref(), p.min_duration, p.limit, &p.time_range)
                    .await?;
                to_json(&rows)
            }
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| NewRelicError::internal(format!("Failed to serialize results: {e}")))
}
