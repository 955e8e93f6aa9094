//! NRQL query construction.
//!
//! Templates and escaping for the queries sent to NerdGraph. Nothing in this
//! module performs I/O.

pub mod builder;
pub mod escape;
pub mod metric;

pub use builder::{
    build_apm_metric, build_log_search, build_recent_logs, build_transaction_traces,
    where_conditions,
};
pub use escape::{escape_for_envelope, escape_string_literal};
pub use metric::Metric;

/// Time range used when a tool call does not provide one.
pub const DEFAULT_TIME_RANGE: &str = "1 HOUR AGO";
