use swc_common::{DUMMY_SP, Span};

/// A comment extracted from a parsed source file.
///
/// `text` is the comment body without its delimiters (`//`, `/* */`).
/// Lines are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceComment {
    pub text: String,
    pub start_line: usize,
    pub end_line: usize,
    /// Byte span of the whole comment, delimiters included.
    pub span: Span,
}

impl SourceComment {
    /// Build a single-line comment with no source span.
    pub fn new(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            start_line: line,
            end_line: line,
            span: DUMMY_SP,
        }
    }
}
