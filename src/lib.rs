//! ifdef - conditional compilation for JavaScript and TypeScript
//!
//! Source files carry directives in ordinary comments (`// #if BROWSER`,
//! `{/* #else */}`, `// #debug`). ifdef evaluates them against a set of
//! symbols and deletes the syntax in failed branches, leaving everything else
//! byte for byte.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Directive engine (parsing, evaluation, range resolution, elimination)
//! - `mcp`: Model Context Protocol server implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod mcp;
