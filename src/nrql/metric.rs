//! APM metric kinds.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A derived APM measurement, each rendered from its own NRQL template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    /// Average transaction duration.
    ResponseTime,
    /// Transactions per minute.
    Throughput,
    /// Percentage of transactions flagged as errors.
    ErrorRate,
    /// Apdex score with a 0.5s threshold.
    Apdex,
}

impl Metric {
    /// All metric kinds, in declaration order.
    pub const ALL: [Metric; 4] = [
        Metric::ResponseTime,
        Metric::Throughput,
        Metric::ErrorRate,
        Metric::Apdex,
    ];

    /// Metrics returned by `get-apm-metrics` when the caller names none.
    pub fn defaults() -> Vec<Metric> {
        vec![Metric::ResponseTime, Metric::Throughput, Metric::ErrorRate]
    }

    /// Returns the wire name of the metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResponseTime => "responseTime",
            Self::Throughput => "throughput",
            Self::ErrorRate => "errorRate",
            Self::Apdex => "apdex",
        }
    }

    /// NRQL projection for the metric, aliased to its wire name.
    pub(crate) fn projection(&self) -> &'static str {
        match self {
            Self::ResponseTime => "average(duration) as responseTime",
            Self::Throughput => "rate(count(*), 1 minute) as throughput",
            Self::ErrorRate => "percentage(count(*), WHERE error IS true) as errorRate",
            Self::Apdex => "apdex(duration, t: 0.5) as apdex",
        }
    }

    /// Whether the rendered query ends with `TIMESERIES`.
    pub(crate) fn is_timeseries(&self) -> bool {
        !matches!(self, Self::Apdex)
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown metric: {s}. Expected one of: responseTime, throughput, errorRate, apdex"
                )
            })
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
