//! NRQL rendering for the templated tools.
//!
//! Every function here is pure: validated parameters in, one NRQL string out.
//! Values placed inside single-quoted literals go through
//! [`escape_string_literal`]; envelope escaping is left to the executor.

use super::escape::escape_string_literal;
use super::metric::Metric;

/// Renders a `WHERE` clause followed by a trailing space, or nothing when
/// there are no conditions.
fn where_clause(conditions: &[String]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {} ", conditions.join(" AND "))
    }
}

/// Builds a log search over `Log`.
///
/// Emits a `message LIKE` condition for non-empty keywords, then one equality
/// condition per attribute in the order given.
pub fn build_log_search(
    keywords: Option<&str>,
    time_range: &str,
    limit: i64,
    attributes: &[(String, String)],
) -> String {
    let mut conditions = Vec::with_capacity(attributes.len() + 1);

    if let Some(keywords) = keywords.filter(|k| !k.is_empty()) {
        conditions.push(format!(
            "message LIKE '%{}%'",
            escape_string_literal(keywords)
        ));
    }

    for (key, value) in attributes {
        conditions.push(format!("{} = '{}'", key, escape_string_literal(value)));
    }

    format!(
        "SELECT * FROM Log {}SINCE {} LIMIT {}",
        where_clause(&conditions),
        time_range,
        limit
    )
}

/// Builds the unfiltered recent-logs query.
pub fn build_recent_logs(limit: i64, time_range: &str) -> String {
    format!("SELECT * FROM Log SINCE {time_range} LIMIT {limit}")
}

/// Builds the query for a single APM metric.
///
/// With an application name the query filters on it; without one it facets
/// by `appName` instead.
pub fn build_apm_metric(metric: Metric, app_name: Option<&str>, time_range: &str) -> String {
    let mut query = format!("SELECT {} FROM Transaction", metric.projection());

    match app_name {
        Some(app) => {
            query.push_str(&format!(
                " WHERE appName = '{}' SINCE {}",
                escape_string_literal(app),
                time_range
            ));
        }
        None => {
            query.push_str(&format!(" SINCE {time_range} FACET appName"));
        }
    }

    if metric.is_timeseries() {
        query.push_str(" TIMESERIES");
    }

    query
}

/// Builds the slowest-transactions query.
///
/// `min_duration` is rendered as given; range policy belongs to the caller.
pub fn build_transaction_traces(
    app_name: Option<&str>,
    min_duration: Option<f64>,
    limit: i64,
    time_range: &str,
) -> String {
    let mut conditions = Vec::with_capacity(2);

    if let Some(app) = app_name {
        conditions.push(format!("appName = '{}'", escape_string_literal(app)));
    }

    if let Some(duration) = min_duration {
        conditions.push(format!("duration > {duration}"));
    }

    format!(
        "SELECT name, appName, duration, timestamp, error FROM Transaction {}SINCE {} ORDER BY duration DESC LIMIT {}",
        where_clause(&conditions),
        time_range,
        limit
    )
}

/// Splits the `WHERE` clause of a rendered query back into its conditions.
///
/// This is a structural split on ` AND ` between `WHERE` and `SINCE`, not an
/// NRQL parser. Returns an empty list when the query has no `WHERE` clause.
pub fn where_conditions(nrql: &str) -> Vec<&str> {
    let Some(start) = nrql.find(" WHERE ") else {
        return Vec::new();
    };
    let body = &nrql[start + " WHERE ".len()..];
    let body = match body.find(" SINCE ") {
        Some(end) => &body[..end],
        None => body,
    };

    body.split(" AND ").map(str::trim).collect()
}
