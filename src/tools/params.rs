//! Tool argument records and validation.
//!
//! Arguments arrive as a JSON object; each tool deserializes them into its own
//! record, filling defaults for omitted optional fields. Any mismatch becomes a
//! validation error before NerdGraph is contacted.

use serde::de::{Error as _, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::error::{NewRelicError, Result};
use crate::nrql::{Metric, DEFAULT_TIME_RANGE};

/// Tool names exposed over MCP.
pub mod names {
    pub const QUERY_LOGS: &str = "query-logs";
    pub const SEARCH_LOGS: &str = "search-logs";
    pub const GET_RECENT_LOGS: &str = "get-recent-logs";
    pub const QUERY_APM: &str = "query-apm";
    pub const GET_APM_METRICS: &str = "get-apm-metrics";
    pub const GET_TRANSACTION_TRACES: &str = "get-transaction-traces";

    /// Every tool name, in listing order.
    pub const ALL: [&str; 6] = [
        QUERY_LOGS,
        SEARCH_LOGS,
        GET_RECENT_LOGS,
        QUERY_APM,
        GET_APM_METRICS,
        GET_TRANSACTION_TRACES,
    ];
}

fn default_time_range() -> String {
    DEFAULT_TIME_RANGE.to_string()
}

fn default_search_limit() -> i64 {
    100
}

fn default_recent_limit() -> i64 {
    50
}

fn default_trace_limit() -> i64 {
    10
}

/// Accepts any JSON number with no fractional part, so `10` and `10.0` both
/// read as 10.
fn deserialize_limit<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<i64, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(limit) = number.as_i64() {
        return Ok(limit);
    }

    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(D::Error::custom(format!(
            "limit must be a whole number, got {number}"
        ))),
    }
}

/// Arguments for the raw NRQL tools.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawQueryParams {
    pub query: String,
}

/// Arguments for `search-logs`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLogsParams {
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default = "default_time_range")]
    pub time_range: String,
    #[serde(default = "default_search_limit", deserialize_with = "deserialize_limit")]
    pub limit: i64,
    #[serde(default)]
    pub attributes: Option<Attributes>,
}

/// Arguments for `get-recent-logs`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentLogsParams {
    #[serde(default = "default_recent_limit", deserialize_with = "deserialize_limit")]
    pub limit: i64,
    #[serde(default = "default_time_range")]
    pub time_range: String,
}

/// Arguments for `get-apm-metrics`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApmMetricsParams {
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default = "default_time_range")]
    pub time_range: String,
    #[serde(default = "Metric::defaults")]
    pub metrics: Vec<Metric>,
}

/// Arguments for `get-transaction-traces`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionTracesParams {
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub min_duration: Option<f64>,
    #[serde(default = "default_trace_limit", deserialize_with = "deserialize_limit")]
    pub limit: i64,
    #[serde(default = "default_time_range")]
    pub time_range: String,
}

/// Attribute filters for `search-logs`, in the order the caller wrote them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct AttributesVisitor;

        impl<'de> Visitor<'de> for AttributesVisitor {
            type Value = Attributes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping attribute names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Attributes, A::Error> {
                let mut pairs: Vec<(String, String)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    // Last value wins; the key keeps its first position.
                    match pairs.iter_mut().find(|(n, _)| *n == name) {
                        Some(slot) => slot.1 = value,
                        None => pairs.push((name, value)),
                    }
                }
                Ok(Attributes(pairs))
            }
        }

        deserializer.deserialize_map(AttributesVisitor)
    }
}

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    QueryLogs(RawQueryParams),
    SearchLogs(SearchLogsParams),
    RecentLogs(RecentLogsParams),
    QueryApm(RawQueryParams),
    ApmMetrics(ApmMetricsParams),
    TransactionTraces(TransactionTracesParams),
}

impl ToolRequest {
    /// Validates `arguments` for the named tool.
    ///
    /// Missing or null arguments are treated as an empty object.
    pub fn parse(name: &str, arguments: Option<&serde_json::Value>) -> Result<Self> {
        let empty = serde_json::Value::Object(serde_json::Map::new());
        let arguments = match arguments {
            None | Some(serde_json::Value::Null) => &empty,
            Some(args) => args,
        };

        match name {
            names::QUERY_LOGS => parse_args(name, arguments).map(Self::QueryLogs),
            names::SEARCH_LOGS => parse_args(name, arguments).map(Self::SearchLogs),
            names::GET_RECENT_LOGS => parse_args(name, arguments).map(Self::RecentLogs),
            names::QUERY_APM => parse_args(name, arguments).map(Self::QueryApm),
            names::GET_APM_METRICS => parse_args(name, arguments).map(Self::ApmMetrics),
            names::GET_TRANSACTION_TRACES => {
                parse_args(name, arguments).map(Self::TransactionTraces)
            }
            _ => Err(NewRelicError::unknown_operation(name)),
        }
    }

    /// Returns the tool name this request was parsed for.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::QueryLogs(_) => names::QUERY_LOGS,
            Self::SearchLogs(_) => names::SEARCH_LOGS,
            Self::RecentLogs(_) => names::GET_RECENT_LOGS,
            Self::QueryApm(_) => names::QUERY_APM,
            Self::ApmMetrics(_) => names::GET_APM_METRICS,
            Self::TransactionTraces(_) => names::GET_TRANSACTION_TRACES,
        }
    }
}

fn parse_args<T: for<'de> Deserialize<'de>>(name: &str, arguments: &serde_json::Value) -> Result<T> {
    if !arguments.is_object() {
        return Err(NewRelicError::validation(format!(
            "arguments for {name} must be an object"
        )));
    }

    T::deserialize(arguments)
        .map_err(|e| NewRelicError::validation(format!("invalid arguments for {name}: {e}")))
}
