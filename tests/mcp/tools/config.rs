use ifdef::mcp::{IfdefMcpServer, types::GetConfigParams};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;

use crate::{McpTestFixture, extract_tool_result_json};

#[tokio::test]
async fn test_get_config_defaults() {
    let fixture = McpTestFixture::new().unwrap();
    let server = IfdefMcpServer::new();

    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["fromFile"], false);
    assert_eq!(json_result["config"]["outDir"], "./dist");
    assert_eq!(json_result["config"]["includes"], json!(["src"]));
    assert_eq!(json_result["config"]["symbols"], json!({}));
}

#[tokio::test]
async fn test_get_config_from_ifdefrc() {
    let fixture = McpTestFixture::new().unwrap();
    fixture
        .write_config(&json!({
            "symbols": { "BROWSER": true, "IE": 8 },
            "directives": { "debug": false },
            "outDir": "build"
        }))
        .unwrap();

    let server = IfdefMcpServer::new();
    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["fromFile"], true);
    assert_eq!(json_result["config"]["symbols"]["IE"], 8);
    assert_eq!(json_result["config"]["directives"]["debug"], false);
    assert_eq!(json_result["config"]["outDir"], "build");
}

#[tokio::test]
async fn test_get_config_invalid_file_is_error() {
    let fixture = McpTestFixture::new().unwrap();
    fixture
        .write_config(&json!({ "directives": { "debug": "off" } }))
        .unwrap();

    let server = IfdefMcpServer::new();
    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let err = server.get_config(params).await.unwrap_err();
    assert!(err.message.contains("Failed to load config"));
}
