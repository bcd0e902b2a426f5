//! Core data types shared by the directive engine and its collaborators.
//!
//! ## Module Structure
//!
//! - `comment`: SourceComment (one comment with its line span)
//! - `options`: ResolveOptions, SymbolTable, DirectiveConfig
//! - `range`: ExclusionRange (lines whose syntax must be deleted)

pub mod comment;
pub mod options;
pub mod range;

pub use comment::SourceComment;
pub use options::{DirectiveConfig, ResolveOptions, SymbolTable, directive_flag};
pub use range::ExclusionRange;
