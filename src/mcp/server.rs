use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use swc_common::SourceMap;

use crate::{
    config::load_config,
    core::{
        data::ResolveOptions,
        eval::try_evaluate,
        preprocess::{Processed, process_source},
    },
};

use super::types::{
    ConfigDto, ConfigValues, EvaluateParams, EvaluateResult, GetConfigParams, PreprocessResult,
    RangesResult, SourceParams,
};

/// File name assumed when a caller does not say; TSX parses JS, JSX and TS alike.
const DEFAULT_FILE_PATH: &str = "input.tsx";

#[derive(Clone)]
pub struct IfdefMcpServer {
    tool_router: ToolRouter<Self>,
}

impl Default for IfdefMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json_str = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("JSON serialization failed: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(json_str)]))
}

fn process(params: SourceParams) -> Result<Processed, McpError> {
    let options = ResolveOptions::new(
        params.symbols.unwrap_or_default(),
        params.directives.unwrap_or_default(),
    );
    let file_path = params
        .file_path
        .unwrap_or_else(|| DEFAULT_FILE_PATH.to_string());

    process_source(
        params.source,
        &file_path,
        &options,
        Arc::new(SourceMap::default()),
    )
    .map_err(|e| McpError::invalid_params(format!("{:#}", e), None))
}

#[tool_router]
impl IfdefMcpServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    /// Get the ifdef configuration of a project
    #[tool(
        description = "Get the ifdef configuration (.ifdefrc.json) of a project: symbols, directive switches, includes, ignores, extensions and output directory."
    )]
    pub async fn get_config(
        &self,
        params: Parameters<GetConfigParams>,
    ) -> Result<CallToolResult, McpError> {
        let path = Path::new(&params.0.project_root_path);

        let result = load_config(path)
            .map_err(|e| McpError::internal_error(format!("Failed to load config: {}", e), None))?;

        json_result(&ConfigDto {
            from_file: result.from_file,
            config: ConfigValues::from(result.config),
        })
    }

    /// Compute exclusion ranges for a source text
    #[tool(
        description = "Resolve the #if/#elif/#else/#endif and custom directives in a source text. Returns the line ranges that would be removed, without changing anything."
    )]
    pub async fn resolve_ranges(
        &self,
        params: Parameters<SourceParams>,
    ) -> Result<CallToolResult, McpError> {
        let processed = process(params.0)?;
        json_result(&RangesResult::from(&processed))
    }

    /// Preprocess a source text
    #[tool(
        description = "Preprocess a source text: remove code in failed #if branches and disabled custom directives, strip directive comments. Returns the transformed code and statistics."
    )]
    pub async fn preprocess_source(
        &self,
        params: Parameters<SourceParams>,
    ) -> Result<CallToolResult, McpError> {
        let processed = process(params.0)?;
        json_result(&PreprocessResult::from(processed))
    }

    /// Evaluate one directive condition
    #[tool(
        description = "Evaluate a directive condition (the text after #if) against symbols. Failed evaluations are false; the error explains why."
    )]
    pub async fn evaluate(
        &self,
        params: Parameters<EvaluateParams>,
    ) -> Result<CallToolResult, McpError> {
        let EvaluateParams {
            expression,
            symbols,
        } = params.0;

        let result = match try_evaluate(&expression, &symbols.unwrap_or_default()) {
            Ok(value) => EvaluateResult {
                result: value.truthy(),
                value_type: Some(value.type_of().to_string()),
                error: None,
            },
            Err(e) => EvaluateResult {
                result: false,
                value_type: None,
                error: Some(e.to_string()),
            },
        };
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for IfdefMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "ifdef MCP lets AI agents inspect and apply comment-directive conditional compilation \
                 (// #if EXPR, #elif, #else, #endif and custom #name directives) in JS/TS sources.\n\n\
                 Available tools:\n\
                 1. get_config - Get project configuration (symbols, directives, paths)\n\
                 2. resolve_ranges - See which line ranges a source would lose\n\
                 3. preprocess_source - Get the transformed source\n\
                 4. evaluate - Check what a single condition evaluates to\n\n\
                 Recommended Workflow:\n\
                 1. Use get_config to learn the project's symbols and directive switches\n\
                 2. Pass them to resolve_ranges or preprocess_source along with the file content\n\
                 3. Use evaluate to debug a condition that behaves unexpectedly"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Entry point for MCP server
pub fn run_server() -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let service = IfdefMcpServer::new();
            let server = service.serve(rmcp::transport::stdio()).await?;
            server.waiting().await?;
            Ok(())
        })
}
