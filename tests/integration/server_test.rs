//! MCP protocol integration tests.
//!
//! Drive the server with newline-delimited JSON-RPC exactly as a client
//! would over stdio.

use newrelic_mcp::mcp::PROTOCOL_VERSION;
use newrelic_mcp::newrelic::MockTransport;
use serde_json::{json, Value};

use super::common::server;

async fn exchange(mock: &MockTransport, messages: &[Value]) -> Vec<Value> {
    let mut input = String::new();
    for message in messages {
        input.push_str(&message.to_string());
        input.push('\n');
    }

    let mut output = Vec::new();
    server(mock)
        .serve(input.as_bytes(), &mut output)
        .await
        .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_handshake_and_list_tools() {
    let mock = MockTransport::new();
    let responses = exchange(
        &mock,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {"name": "test-client", "version": "0.0.1"}
            }}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        ],
    )
    .await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "newrelic-mcp-server");

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    let names: Vec<_> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "query-logs",
            "search-logs",
            "get-recent-logs",
            "query-apm",
            "get-apm-metrics",
            "get-transaction-traces"
        ]
    );
    for tool in tools {
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_tools_call_success() {
    let mock = MockTransport::with_results(json!([{"message": "recent log"}]));
    let responses = exchange(
        &mock,
        &[json!({
            "jsonrpc": "2.0",
            "id": "call-1",
            "method": "tools/call",
            "params": {"name": "get-recent-logs", "arguments": {"limit": 5}}
        })],
    )
    .await;

    let result = &responses[0]["result"];
    assert_eq!(responses[0]["id"], "call-1");
    assert!(result.get("isError").is_none());
    assert_eq!(result["content"][0]["type"], "text");

    let rows: Value = serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(rows, json!([{"message": "recent log"}]));
}

#[tokio::test]
async fn test_tools_call_failure_is_flagged_not_rpc_error() {
    let mock = MockTransport::new();
    mock.push_errors(&["NRQL Syntax Error", "Unknown function"]);

    let responses = exchange(
        &mock,
        &[json!({
            "jsonrpc": "2.0",
            "id": 9,
            "method": "tools/call",
            "params": {"name": "query-logs", "arguments": {"query": "SELEC * FROM Log"}}
        })],
    )
    .await;

    assert!(responses[0].get("error").is_none());
    let result = &responses[0]["result"];
    assert_eq!(result["isError"], true);
    assert_eq!(
        result["content"][0]["text"],
        "Error: NerdGraph errors: NRQL Syntax Error, Unknown function"
    );
}

#[tokio::test]
async fn test_unknown_tool_is_flagged() {
    let mock = MockTransport::new();
    let responses = exchange(
        &mock,
        &[json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {"name": "nope"}
        })],
    )
    .await;

    assert_eq!(responses[0]["result"]["isError"], true);
    assert_eq!(
        responses[0]["result"]["content"][0]["text"],
        "Error: Unknown tool: nope"
    );
}

#[tokio::test]
async fn test_bad_line_does_not_stop_the_server() {
    let mock = MockTransport::new();
    let input = concat!(
        "this is not json\n",
        r#"{"jsonrpc":"2.0","id":5,"method":"ping"}"#,
        "\n"
    );

    let mut output = Vec::new();
    server(&mock)
        .serve(input.as_bytes(), &mut output)
        .await
        .unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[1]["id"], 5);
    assert_eq!(responses[1]["result"], json!({}));
}
