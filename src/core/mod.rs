//! Directive engine.
//!
//! ```text
//! source text
//!     ↓  parsers::source     (swc parse, collect comments)
//! SourceComment[]
//!     ↓  directive           (classify, parse #if/#elif/#else/#endif/#name)
//! Directive[]
//!     ↓  resolver + eval     (nested chain state machine, sandboxed conditions)
//! ExclusionRange[]
//!     ↓  eliminate           (delete covered nodes, strip directive comments)
//! output text
//! ```
//!
//! ## Module Structure
//!
//! - `data`: Plain data shared across the pipeline
//! - `directive`: Directive parsing and classification
//! - `eval`: Expression sandbox
//! - `resolver`: Exclusion range resolution
//! - `parsers`: swc source parsing
//! - `eliminate`: Text edits for excluded syntax
//! - `preprocess`: One file through the whole pipeline
//! - `file_scanner`: Source file discovery
//! - `context`: Project-wide configuration and parallel processing

pub mod context;
pub mod data;
pub mod directive;
pub mod eliminate;
pub mod eval;
pub mod file_scanner;
pub mod parsers;
pub mod preprocess;
pub mod resolver;

pub use data::{DirectiveConfig, ExclusionRange, ResolveOptions, SourceComment, SymbolTable};
pub use directive::{Directive, DirectiveKind, Keyword, is_directive};
pub use eval::{Evaluator, Sandbox, evaluate};
pub use resolver::{Passed, RangeResolver, resolve, resolve_with};
