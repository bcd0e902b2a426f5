use ifdef::mcp::{IfdefMcpServer, types::EvaluateParams};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;

use crate::extract_tool_result_json;

async fn evaluate(expression: &str, symbols: serde_json::Value) -> serde_json::Value {
    let server = IfdefMcpServer::new();
    let params = Parameters(EvaluateParams {
        expression: expression.to_string(),
        symbols: serde_json::from_value(symbols).unwrap(),
    });
    let result = server.evaluate(params).await.unwrap();
    extract_tool_result_json(&result)
}

#[tokio::test]
async fn test_evaluate_true() {
    let json_result = evaluate("IE > 8 && UA === 'Chrome'", json!({ "IE": 9, "UA": "Chrome" })).await;

    assert_eq!(json_result["result"], true);
    assert_eq!(json_result["valueType"], "boolean");
    assert_eq!(json_result["error"], json!(null));
}

#[tokio::test]
async fn test_evaluate_value_type() {
    let json_result = evaluate("UA", json!({ "UA": "Chrome" })).await;

    assert_eq!(json_result["result"], true);
    assert_eq!(json_result["valueType"], "string");
}

#[tokio::test]
async fn test_evaluate_undefined_symbol_fails() {
    let json_result = evaluate("MISSING.deep", json!({})).await;

    assert_eq!(json_result["result"], false);
    assert_eq!(json_result["valueType"], json!(null));
    assert!(json_result["error"].is_string());
}
