//! Source file parsing.
//!
//! - `source`: JS/JSX/TS/TSX parser (uses swc for AST generation and comment collection)

pub mod source;
