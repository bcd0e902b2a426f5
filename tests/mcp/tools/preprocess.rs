use ifdef::mcp::{IfdefMcpServer, types::SourceParams};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;

use crate::extract_tool_result_json;

const SOURCE: &str = r#"// #if BROWSER
console.log('This is browser');
// #elif IE > 8
console.log('Modern IE');
// #else
console.log('unknown');
// #endif
// #debug
debug();
done();
"#;

fn source_params(symbols: serde_json::Value, directives: serde_json::Value) -> SourceParams {
    SourceParams {
        source: SOURCE.to_string(),
        file_path: Some("app.js".to_string()),
        symbols: serde_json::from_value(symbols).unwrap(),
        directives: serde_json::from_value(directives).unwrap(),
    }
}

// ============================================================================
// resolve_ranges tests
// ============================================================================

#[tokio::test]
async fn test_resolve_ranges() {
    let server = IfdefMcpServer::new();
    let params = Parameters(source_params(
        json!({ "BROWSER": false, "IE": 9 }),
        json!({ "debug": false }),
    ));

    let result = server.resolve_ranges(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["directiveCount"], 5);
    assert_eq!(
        json_result["ranges"],
        json!([
            { "start": 1, "end": 3, "directive": "#if BROWSER" },
            { "start": 5, "end": 7, "directive": "#else" },
            { "start": 8, "end": 9, "directive": "#debug" }
        ])
    );
    assert_eq!(json_result["evalFailures"], json!([]));
}

#[tokio::test]
async fn test_resolve_ranges_reports_eval_failures() {
    let server = IfdefMcpServer::new();
    let params = Parameters(SourceParams {
        source: "// #if (\nx();\n// #endif\n".to_string(),
        file_path: None,
        symbols: None,
        directives: None,
    });

    let result = server.resolve_ranges(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["ranges"][0]["start"], 1);
    assert_eq!(json_result["ranges"][0]["end"], 3);
    let failures = json_result["evalFailures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["expression"], "(");
}

// ============================================================================
// preprocess_source tests
// ============================================================================

#[tokio::test]
async fn test_preprocess_source() {
    let server = IfdefMcpServer::new();
    let params = Parameters(source_params(
        json!({ "BROWSER": false, "IE": 9 }),
        json!({ "debug": false }),
    ));

    let result = server.preprocess_source(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["code"], "console.log('Modern IE');\ndone();\n");
    assert_eq!(json_result["changed"], true);
    assert_eq!(json_result["stats"]["removedNodes"], 3);
    assert_eq!(json_result["stats"]["strippedComments"], 5);
}

#[tokio::test]
async fn test_preprocess_source_untouched() {
    let server = IfdefMcpServer::new();
    let params = Parameters(SourceParams {
        source: "run();\n".to_string(),
        file_path: None,
        symbols: None,
        directives: None,
    });

    let result = server.preprocess_source(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["code"], "run();\n");
    assert_eq!(json_result["changed"], false);
    assert_eq!(json_result["ranges"], json!([]));
}

#[tokio::test]
async fn test_preprocess_source_parse_error() {
    let server = IfdefMcpServer::new();
    let params = Parameters(SourceParams {
        source: "const = ;\n".to_string(),
        file_path: Some("bad.js".to_string()),
        symbols: None,
        directives: None,
    });

    assert!(server.preprocess_source(params).await.is_err());
}
