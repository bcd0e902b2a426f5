use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use swc_common::{
    BytePos, FileName, Globals, SourceMap, Span,
    comments::{Comment, SingleThreadedComments},
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

use crate::core::data::SourceComment;

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Thread-safe extracted comments from SingleThreadedComments.
/// Extracted during parsing and stored independently of swc types.
#[derive(Debug, Clone)]
pub struct ExtractedComments {
    pub leading: CommentMap,
    pub trailing: CommentMap,
}

impl ExtractedComments {
    /// Extract comments from SingleThreadedComments.
    /// This must be called before SingleThreadedComments is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        Self {
            leading: leading.iter().map(|(k, v)| (*k, v.clone())).collect(),
            trailing: trailing.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Comment> {
        self.leading
            .values()
            .chain(self.trailing.values())
            .flatten()
    }
}

/// A parsed source file with everything the preprocessor needs.
pub struct ParsedSource {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub comments: ExtractedComments,
    /// Original text, used for text edits.
    pub code: String,
    /// Position of the first byte of `code` inside `source_map`.
    pub start_pos: BytePos,
}

impl ParsedSource {
    /// 1-based line of a position.
    pub fn line_of(&self, pos: BytePos) -> usize {
        self.source_map.lookup_char_pos(pos).line
    }

    /// First and last line covered by a span.
    pub fn lines_of(&self, span: Span) -> (usize, usize) {
        let last = if span.hi > span.lo {
            BytePos(span.hi.0 - 1)
        } else {
            span.lo
        };
        (self.line_of(span.lo), self.line_of(last))
    }

    /// Byte offset of a position within `code`.
    pub fn offset_of(&self, pos: BytePos) -> usize {
        (pos.0 - self.start_pos.0) as usize
    }

    /// All comments in the file, in source order.
    pub fn source_comments(&self) -> Vec<SourceComment> {
        let mut comments: Vec<SourceComment> = self
            .comments
            .iter()
            .map(|cmt| {
                let (start_line, end_line) = self.lines_of(cmt.span);
                SourceComment {
                    text: cmt.text.to_string(),
                    start_line,
                    end_line,
                    span: cmt.span,
                }
            })
            .collect();

        comments.sort_by_key(|cmt| cmt.span.lo);
        comments.dedup_by_key(|cmt| cmt.span.lo);
        comments
    }
}

/// Pick parser syntax from the file extension. Plain `.ts` cannot contain JSX
/// (type assertions like `<T>x` would be ambiguous); everything else is parsed
/// as TSX, which is a superset of JS and JSX.
fn syntax_for(file_path: &str) -> Syntax {
    let tsx = !matches!(
        Path::new(file_path).extension().and_then(|e| e.to_str()),
        Some("ts" | "mts" | "cts")
    );
    Syntax::Typescript(TsSyntax {
        tsx,
        decorators: true,
        ..Default::default()
    })
}

/// Parse JS/JSX/TS/TSX source code into an AST and collect its comments.
///
/// Accepts a shared SourceMap for thread-safe parallel parsing.
pub fn parse_source(
    code: String,
    file_path: &str,
    source_map: Arc<SourceMap>,
) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code.clone());
        let start_pos = source_file.start_pos;

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e))?;

        // Extract comments immediately (before SingleThreadedComments drops)
        let extracted_comments = ExtractedComments::from_swc(&comments);

        Ok(ParsedSource {
            module,
            source_map,
            comments: extracted_comments,
            code,
            start_pos,
        })
    })
}
