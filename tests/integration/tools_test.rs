//! Tool dispatch integration tests.
//!
//! Exercise each tool from raw JSON arguments through NRQL rendering to the
//! text payload returned to the MCP client.

use newrelic_mcp::newrelic::MockTransport;
use newrelic_mcp::nrql::where_conditions;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use super::common::{router, sent_nrql, ACCOUNT_ID};

fn parse_text(text: &str) -> Value {
    serde_json::from_str(text).expect("tool output is JSON")
}

#[tokio::test]
async fn test_query_logs_passes_query_through() {
    let mock = MockTransport::with_results(json!([{"message": "test log", "timestamp": 123456}]));

    let output = router(&mock)
        .call(
            "query-logs",
            Some(&json!({"query": "SELECT * FROM Log WHERE message LIKE '%error%' LIMIT 1"})),
        )
        .await;

    assert!(!output.is_error);
    assert_eq!(
        parse_text(output.first_text().unwrap()),
        json!([{"message": "test log", "timestamp": 123456}])
    );
    assert_eq!(
        sent_nrql(&mock, 0),
        "SELECT * FROM Log WHERE message LIKE '%error%' LIMIT 1"
    );
    assert!(mock.requests()[0]
        .query
        .contains(&format!("account(id: {ACCOUNT_ID})")));
}

#[tokio::test]
async fn test_query_logs_output_is_pretty_printed() {
    let mock = MockTransport::with_results(json!([{"message": "a"}]));
    let output = router(&mock)
        .call("query-logs", Some(&json!({"query": "SELECT * FROM Log"})))
        .await;

    assert_eq!(
        output.first_text().unwrap(),
        "[\n  {\n    \"message\": \"a\"\n  }\n]"
    );
}

#[tokio::test]
async fn test_query_logs_escapes_double_quotes_for_envelope() {
    let mock = MockTransport::new();
    router(&mock)
        .call(
            "query-logs",
            Some(&json!({"query": "SELECT * FROM Log WHERE message = \"test\""})),
        )
        .await;

    assert_eq!(
        sent_nrql(&mock, 0),
        "SELECT * FROM Log WHERE message = \\\"test\\\""
    );
}

#[tokio::test]
async fn test_search_logs_renders_conditions_in_argument_order() {
    let mock = MockTransport::new();
    router(&mock)
        .call(
            "search-logs",
            Some(&json!({
                "keywords": "timeout",
                "attributes": {"service": "checkout", "level": "ERROR", "env": "prod"},
                "limit": 20
            })),
        )
        .await;

    let nrql = sent_nrql(&mock, 0);
    assert_eq!(
        where_conditions(&nrql),
        vec![
            "message LIKE '%timeout%'",
            "service = 'checkout'",
            "level = 'ERROR'",
            "env = 'prod'"
        ]
    );
    assert!(nrql.ends_with("SINCE 1 HOUR AGO LIMIT 20"));
}

#[tokio::test]
async fn test_search_logs_without_filters_has_no_where() {
    let mock = MockTransport::new();
    let output = router(&mock).call("search-logs", None).await;

    assert!(!output.is_error);
    assert_eq!(output.first_text(), Some("[]"));
    assert_eq!(
        sent_nrql(&mock, 0),
        "SELECT * FROM Log SINCE 1 HOUR AGO LIMIT 100"
    );
}

#[tokio::test]
async fn test_search_logs_escapes_literal_values() {
    let mock = MockTransport::new();
    router(&mock)
        .call(
            "search-logs",
            Some(&json!({"keywords": "it's 100%", "limit": 10})),
        )
        .await;

    let document = &mock.requests()[0].query;
    assert!(!document.contains("it's"));
    assert!(document.contains("it\\'s 100\\%"));
}

#[tokio::test]
async fn test_get_recent_logs_defaults() {
    let mock = MockTransport::with_results(json!([{"message": "recent log"}]));
    let output = router(&mock).call("get-recent-logs", Some(&json!({}))).await;

    assert_eq!(
        parse_text(output.first_text().unwrap()),
        json!([{"message": "recent log"}])
    );
    assert_eq!(
        sent_nrql(&mock, 0),
        "SELECT * FROM Log SINCE 1 HOUR AGO LIMIT 50"
    );
}

#[tokio::test]
async fn test_get_recent_logs_accepts_float_limit() {
    let mock = MockTransport::new();
    let output = router(&mock)
        .call("get-recent-logs", Some(&json!({"limit": 10.0})))
        .await;

    assert!(!output.is_error);
    assert_eq!(
        sent_nrql(&mock, 0),
        "SELECT * FROM Log SINCE 1 HOUR AGO LIMIT 10"
    );
}

#[tokio::test]
async fn test_query_apm_passes_query_through() {
    let mock = MockTransport::with_results(json!([{"appName": "MyApp", "average(duration)": 0.5}]));
    let output = router(&mock)
        .call(
            "query-apm",
            Some(&json!({"query": "SELECT average(duration) FROM Transaction FACET appName"})),
        )
        .await;

    assert_eq!(
        parse_text(output.first_text().unwrap()),
        json!([{"appName": "MyApp", "average(duration)": 0.5}])
    );
}

#[tokio::test]
async fn test_get_apm_metrics_default_metrics() {
    let mock = MockTransport::with_results(json!([{"appName": "MyApp", "value": 100}]));
    let output = router(&mock)
        .call("get-apm-metrics", Some(&json!({"appName": "MyApp"})))
        .await;

    let outcomes = parse_text(output.first_text().unwrap());
    let metrics: Vec<_> = outcomes
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["metric"].as_str().unwrap())
        .collect();
    assert_eq!(metrics, vec!["responseTime", "throughput", "errorRate"]);
    assert_eq!(mock.request_count(), 3);

    for i in 0..3 {
        let nrql = sent_nrql(&mock, i);
        assert!(nrql.contains("appName = 'MyApp'"));
        assert!(!nrql.contains("FACET"));
    }
}

#[tokio::test]
async fn test_get_apm_metrics_partial_failure_is_not_an_error() {
    let mock = MockTransport::new();
    mock.push_results(json!([{"appName": "MyApp", "responseTime": 0.5}]))
        .push_errors(&["Invalid metric query"]);

    let output = router(&mock)
        .call(
            "get-apm-metrics",
            Some(&json!({"metrics": ["responseTime", "throughput"]})),
        )
        .await;

    assert!(!output.is_error);
    assert_eq!(
        parse_text(output.first_text().unwrap()),
        json!([
            {"metric": "responseTime", "data": [{"appName": "MyApp", "responseTime": 0.5}]},
            {"metric": "throughput", "error": "NerdGraph errors: Invalid metric query"}
        ])
    );
}

#[tokio::test]
async fn test_get_apm_metrics_all_failed_still_succeeds() {
    let mock = MockTransport::new();
    mock.push_failure("connection refused")
        .push_failure("connection refused");

    let output = router(&mock)
        .call(
            "get-apm-metrics",
            Some(&json!({"metrics": ["apdex", "errorRate"]})),
        )
        .await;

    assert!(!output.is_error);
    let outcomes = parse_text(output.first_text().unwrap());
    for outcome in outcomes.as_array().unwrap() {
        assert!(outcome["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to query New Relic"));
        assert!(outcome.get("data").is_none());
    }
}

#[tokio::test]
async fn test_get_apm_metrics_invalid_metric_makes_no_call() {
    let mock = MockTransport::new();
    let output = router(&mock)
        .call(
            "get-apm-metrics",
            Some(&json!({"metrics": ["invalidMetric"]})),
        )
        .await;

    assert!(output.is_error);
    assert!(output
        .first_text()
        .unwrap()
        .starts_with("Error: Validation error"));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_get_transaction_traces_with_filters() {
    let mock = MockTransport::with_results(json!([{
        "name": "/api/orders",
        "appName": "EcommerceApp",
        "duration": 2.0,
        "timestamp": 123457,
        "error": false
    }]));

    let output = router(&mock)
        .call(
            "get-transaction-traces",
            Some(&json!({"appName": "EcommerceApp", "minDuration": 2.0})),
        )
        .await;

    assert!(!output.is_error);
    let nrql = sent_nrql(&mock, 0);
    assert_eq!(
        where_conditions(&nrql),
        vec!["appName = 'EcommerceApp'", "duration > 2"]
    );
    assert!(nrql.ends_with("SINCE 1 HOUR AGO ORDER BY duration DESC LIMIT 10"));
}

#[tokio::test]
async fn test_remote_error_becomes_error_content() {
    let mock = MockTransport::new();
    mock.push_errors(&["Invalid query"]);

    let output = router(&mock)
        .call("query-logs", Some(&json!({"query": "INVALID QUERY"})))
        .await;

    assert!(output.is_error);
    assert_eq!(
        output.first_text(),
        Some("Error: NerdGraph errors: Invalid query")
    );
}

#[tokio::test]
async fn test_transport_error_becomes_error_content() {
    let mock = MockTransport::new();
    mock.push_failure("dns error: no such host");

    let output = router(&mock).call("get-recent-logs", None).await;

    assert!(output.is_error);
    let text = output.first_text().unwrap();
    assert!(text.starts_with("Error: Failed to query New Relic"));
    assert!(text.contains("dns error"));
}

#[tokio::test]
async fn test_missing_required_argument() {
    let mock = MockTransport::new();
    let output = router(&mock).call("query-apm", Some(&json!({}))).await;

    assert!(output.is_error);
    assert!(output.first_text().unwrap().contains("query"));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_unknown_tool() {
    let mock = MockTransport::new();
    let output = router(&mock).call("delete-logs", None).await;

    assert!(output.is_error);
    assert_eq!(output.first_text(), Some("Error: Unknown tool: delete-logs"));
    assert_eq!(mock.request_count(), 0);
}
