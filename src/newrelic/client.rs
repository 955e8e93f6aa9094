//! NRQL execution against NerdGraph.
//!
//! Wraps rendered NRQL in the NerdGraph envelope, performs one call per query
//! and classifies the outcome.

use tracing::{debug, warn};

use super::transport::HttpTransport;
use super::types::{GraphQlRequest, MetricOutcome, MetricResult, Row};
use super::NerdGraphTransport;
use crate::config::Config;
use crate::error::{NewRelicError, Result};
use crate::nrql::{self, Metric};

/// Executes NRQL queries for a single New Relic account.
pub struct NrqlExecutor {
    transport: Box<dyn NerdGraphTransport>,
    account_id: String,
}

impl NrqlExecutor {
    /// Creates an executor over an existing transport.
    pub fn new(config: &Config, transport: Box<dyn NerdGraphTransport>) -> Self {
        Self {
            transport,
            account_id: config.account_id.clone(),
        }
    }

    /// Creates an executor that talks to NerdGraph over HTTP.
    pub fn connect(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(config, Box::new(transport)))
    }

    /// Renders the GraphQL document that embeds `nrql`.
    pub fn envelope(&self, nrql: &str) -> String {
        format!(
            "{{\n  actor {{\n    account(id: {}) {{\n      nrql(query: \"{}\") {{\n        results\n      }}\n    }}\n  }}\n}}",
            self.account_id,
            nrql::escape_for_envelope(nrql)
        )
    }

    /// Executes one NRQL query and returns its result rows.
    ///
    /// A response without `data.actor.account.nrql.results` yields no rows.
    pub async fn execute(&self, nrql: &str) -> Result<Vec<Row>> {
        debug!(nrql = %nrql, "Executing NRQL query");

        let request = GraphQlRequest {
            query: self.envelope(nrql),
        };
        let response = self.transport.post(&request).await.inspect_err(|e| {
            warn!(error = %e, "NerdGraph request failed");
        })?;

        if let Some(errors) = response.errors.as_ref().filter(|e| !e.is_empty()) {
            let messages = errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            warn!(errors = %messages, "NerdGraph reported query errors");
            return Err(NewRelicError::remote_query(messages));
        }

        let rows = response.into_results();
        debug!(rows = rows.len(), "NRQL query returned");
        Ok(rows)
    }

    /// Runs a caller-supplied NRQL query against logs.
    pub async fn query_logs(&self, query: &str) -> Result<Vec<Row>> {
        self.execute(query).await
    }

    /// Searches logs by keywords and attribute equality filters.
    pub async fn search_logs(
        &self,
        keywords: Option<&str>,
        time_range: &str,
        limit: i64,
        attributes: &[(String, String)],
    ) -> Result<Vec<Row>> {
        let query = nrql::build_log_search(keywords, time_range, limit, attributes);
        self.execute(&query).await
    }

    /// Fetches the most recent log entries.
    pub async fn recent_logs(&self, limit: i64, time_range: &str) -> Result<Vec<Row>> {
        let query = nrql::build_recent_logs(limit, time_range);
        self.execute(&query).await
    }

    /// Runs a caller-supplied NRQL query against APM data.
    pub async fn query_apm(&self, query: &str) -> Result<Vec<Row>> {
        self.execute(query).await
    }

    /// Fetches each metric in turn.
    ///
    /// Calls are made sequentially in the order given. A failing metric is
    /// reported in its own outcome and does not stop the remaining ones.
    pub async fn apm_metrics(
        &self,
        app_name: Option<&str>,
        time_range: &str,
        metrics: &[Metric],
    ) -> Vec<MetricOutcome> {
        let mut outcomes = Vec::with_capacity(metrics.len());

        for &metric in metrics {
            let query = nrql::build_apm_metric(metric, app_name, time_range);
            let result = match self.execute(&query).await {
                Ok(rows) => MetricResult::Data(rows),
                Err(e) => {
                    warn!(metric = %metric, error = %e, "APM metric query failed");
                    MetricResult::Error(e.to_string())
                }
            };
            outcomes.push(MetricOutcome { metric, result });
        }

        outcomes
    }

    /// Fetches the slowest transactions, optionally filtered.
    pub async fn transaction_traces(
        &self,
        app_name: Option<&str>,
        min_duration: Option<f64>,
        limit: i64,
        time_range: &str,
    ) -> Result<Vec<Row>> {
        let query = nrql::build_transaction_traces(app_name, min_duration, limit, time_range);
        self.execute(&query).await
    }
}
