//! One file through the whole engine: parse, collect directives, resolve
//! ranges, eliminate.

use std::sync::Arc;

use anyhow::Result;
use swc_common::SourceMap;

use super::{
    data::{ExclusionRange, ResolveOptions},
    directive::Directive,
    eliminate::{Output, eliminate},
    eval::{CollectingSandbox, EvalFailure},
    parsers::source::parse_source,
    resolver::{collect_directives, resolve_directives},
};

/// Everything learned about one file.
#[derive(Debug, Clone)]
pub struct Processed {
    pub file_path: String,
    /// Directives found in the file, in line order.
    pub directives: Vec<Directive>,
    pub ranges: Vec<ExclusionRange>,
    pub output: Output,
    /// Conditions that failed to evaluate (and were treated as false).
    pub eval_failures: Vec<EvalFailure>,
}

impl Processed {
    /// The directive on `line`, if any. Ranges start on their directive line.
    pub fn directive_at(&self, line: usize) -> Option<&Directive> {
        self.directives.iter().find(|d| d.line == line)
    }
}

/// Preprocess a single source text.
///
/// Fails only when the file cannot be parsed; everything after parsing is
/// infallible.
pub fn process_source(
    code: String,
    file_path: &str,
    options: &ResolveOptions,
    source_map: Arc<SourceMap>,
) -> Result<Processed> {
    let parsed = parse_source(code, file_path, source_map)?;
    let directives = collect_directives(&parsed.source_comments());

    let sandbox = CollectingSandbox::new();
    let ranges = resolve_directives(&directives, options, &sandbox);
    let output = eliminate(&parsed, &ranges, &options.directives);

    Ok(Processed {
        file_path: file_path.to_string(),
        directives,
        ranges,
        output,
        eval_failures: sandbox.into_failures(),
    })
}
