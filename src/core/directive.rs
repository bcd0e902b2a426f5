//! Directive parsing and classification.
//!
//! Directives live inside ordinary comments and start with `#`:
//! - `#if <expr>` / `#elif <expr>` (alias `#elseif`) / `#else` / `#endif` - structural
//! - `#<name>` - custom directive, resolved against the directive config
//!
//! A single `!` after `#` is accepted for compatibility with
//! webpack-preprocessor-loader, so `#!if` behaves exactly like `#if`.
//! Keywords are case-insensitive.

use super::data::{DirectiveConfig, directive_flag};

/// Structural keyword of an `if` chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    If,
    Elif,
    Else,
    Endif,
}

impl Keyword {
    /// Parse a lower-cased keyword token.
    fn parse(token: &str) -> Option<Self> {
        match token {
            "if" => Some(Self::If),
            "elif" | "elseif" => Some(Self::Elif),
            "else" => Some(Self::Else),
            "endif" => Some(Self::Endif),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::Endif => "endif",
        }
    }

    /// Whether this keyword takes a condition.
    pub fn takes_expression(&self) -> bool {
        matches!(self, Self::If | Self::Elif)
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a directive refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    Structural(Keyword),
    /// Any non-structural keyword, looked up in the directive config.
    Custom(String),
}

/// A directive parsed from a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// Remaining tokens joined by single spaces; `None` when nothing follows the keyword.
    pub expression: Option<String>,
    pub line: usize,
}

impl Directive {
    /// Parse directive from comment text.
    ///
    /// # Arguments
    /// * `text` - Comment text (SWC has already stripped `//` and `/* */`)
    /// * `line` - Line the comment starts on
    ///
    /// # Returns
    /// - `Some(Directive)` if the first token starts with `#` followed by a keyword
    /// - `None` for ordinary comments; this never fails
    pub fn parse(text: &str, line: usize) -> Option<Self> {
        let mut tokens = text.split_whitespace();

        let head = tokens.next()?.strip_prefix('#')?;
        let head = head.strip_prefix('!').unwrap_or(head);
        if head.is_empty() {
            return None;
        }

        let keyword = head.to_lowercase();
        let kind = match Keyword::parse(&keyword) {
            Some(keyword) => DirectiveKind::Structural(keyword),
            None => DirectiveKind::Custom(keyword),
        };

        let expression = tokens.collect::<Vec<_>>().join(" ");
        let expression = (!expression.is_empty()).then_some(expression);

        Some(Self {
            kind,
            expression,
            line,
        })
    }

    /// Structural keyword, if this is part of an `if` chain.
    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            DirectiveKind::Structural(keyword) => Some(keyword),
            DirectiveKind::Custom(_) => None,
        }
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            DirectiveKind::Structural(keyword) => write!(f, "#{}", keyword)?,
            DirectiveKind::Custom(name) => write!(f, "#{}", name)?,
        }
        match &self.expression {
            Some(expression) => write!(f, " {}", expression),
            None => Ok(()),
        }
    }
}

/// Check whether a comment is a recognized directive.
///
/// Structural keywords always count; custom names count only when present in
/// `directives`, whatever their flag. Used to decide which comments to strip
/// from the output, independent of whether their branch survived.
pub fn is_directive(text: &str, directives: &DirectiveConfig) -> bool {
    match Directive::parse(text, 0).map(|d| d.kind) {
        Some(DirectiveKind::Structural(_)) => true,
        Some(DirectiveKind::Custom(name)) => directive_flag(directives, &name).is_some(),
        None => false,
    }
}
