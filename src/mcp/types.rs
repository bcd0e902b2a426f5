use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::{
    data::{DirectiveConfig, ExclusionRange, SymbolTable},
    eval::EvalFailure,
    preprocess::Processed,
};

// ============================================================
// Parameters
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetConfigParams {
    /// Absolute path of the project root (the config is searched upward from here)
    pub project_root_path: String,
}

/// Source text plus the symbols and directive switches to apply to it.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceParams {
    /// Full source text of one JS/JSX/TS/TSX file
    pub source: String,
    /// File name, used to pick the parser syntax (`.ts` disables JSX). Defaults to `input.tsx`
    #[serde(default)]
    pub file_path: Option<String>,
    /// Symbols visible to #if / #elif expressions, e.g. {"BROWSER": true, "IE": 8}
    #[serde(default)]
    pub symbols: Option<SymbolTable>,
    /// Custom directive switches, e.g. {"debug": false}
    #[serde(default)]
    pub directives: Option<DirectiveConfig>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
    /// JavaScript expression, as written after #if
    pub expression: String,
    #[serde(default)]
    pub symbols: Option<SymbolTable>,
}

// ============================================================
// Config Types (get_config)
// ============================================================

/// Configuration DTO for MCP
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDto {
    /// True if config was loaded from a file, false if using defaults
    pub from_file: bool,
    pub config: ConfigValues,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValues {
    pub symbols: SymbolTable,
    pub directives: DirectiveConfig,
    pub includes: Vec<String>,
    pub ignores: Vec<String>,
    pub extensions: Vec<String>,
    pub out_dir: String,
    pub source_root: String,
}

impl From<crate::config::Config> for ConfigValues {
    fn from(c: crate::config::Config) -> Self {
        Self {
            symbols: c.symbols,
            directives: c.directives,
            includes: c.includes,
            ignores: c.ignores,
            extensions: c.extensions,
            out_dir: c.out_dir,
            source_root: c.source_root,
        }
    }
}

// ============================================================
// Range Types (resolve_ranges)
// ============================================================

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RangeItem {
    /// First excluded line (the opening directive's line, 1-based)
    pub start: usize,
    /// Last excluded line
    pub end: usize,
    /// Directive that opened the range, e.g. "#else"
    pub directive: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvalFailureItem {
    pub expression: String,
    pub message: String,
}

impl From<&EvalFailure> for EvalFailureItem {
    fn from(failure: &EvalFailure) -> Self {
        Self {
            expression: failure.expression.clone(),
            message: failure.message.clone(),
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RangesResult {
    pub directive_count: usize,
    pub ranges: Vec<RangeItem>,
    /// Conditions that failed to evaluate and were treated as false
    pub eval_failures: Vec<EvalFailureItem>,
}

fn range_items(processed: &Processed) -> Vec<RangeItem> {
    processed
        .ranges
        .iter()
        .map(|ExclusionRange { start, end }| RangeItem {
            start: *start,
            end: *end,
            directive: processed.directive_at(*start).map(|d| d.to_string()),
        })
        .collect()
}

impl From<&Processed> for RangesResult {
    fn from(processed: &Processed) -> Self {
        Self {
            directive_count: processed.directives.len(),
            ranges: range_items(processed),
            eval_failures: processed.eval_failures.iter().map(Into::into).collect(),
        }
    }
}

// ============================================================
// Preprocess Types (preprocess_source)
// ============================================================

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessStats {
    pub removed_nodes: usize,
    pub spliced_elements: usize,
    pub stripped_comments: usize,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessResult {
    /// Transformed source
    pub code: String,
    pub changed: bool,
    pub stats: PreprocessStats,
    pub ranges: Vec<RangeItem>,
    pub eval_failures: Vec<EvalFailureItem>,
}

impl From<Processed> for PreprocessResult {
    fn from(processed: Processed) -> Self {
        let ranges = range_items(&processed);
        let eval_failures = processed.eval_failures.iter().map(Into::into).collect();
        let output = processed.output;
        Self {
            changed: output.changed(),
            stats: PreprocessStats {
                removed_nodes: output.removed_nodes,
                spliced_elements: output.spliced_elements,
                stripped_comments: output.stripped_comments,
            },
            code: output.code,
            ranges,
            eval_failures,
        }
    }
}

// ============================================================
// Evaluate Types (evaluate)
// ============================================================

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResult {
    /// Truthiness of the expression; false whenever evaluation failed
    pub result: bool,
    /// `typeof` of the value, when evaluation succeeded
    pub value_type: Option<String>,
    /// Why evaluation failed, if it did
    pub error: Option<String>,
}
