//! Expression evaluation for `#if` / `#elif` conditions.
//!
//! Each call parses the expression with swc and walks the resulting AST against
//! the given symbols. Nothing is shared between calls: every evaluation gets
//! its own source map, its own swc globals and its own interpreter.
//!
//! ## Module Structure
//!
//! - `interpreter`: the AST walker
//! - `value`: JavaScript-like runtime values and coercions

mod interpreter;
pub mod value;

use std::cell::RefCell;

use anyhow::{Result, anyhow, bail};
use swc_common::{FileName, GLOBALS, Globals, SourceMap};
use swc_ecma_ast::{Expr, Stmt};
use swc_ecma_parser::{Parser, StringInput, Syntax};

use self::interpreter::Interpreter;
pub use self::value::Value;
use super::data::SymbolTable;

/// Boolean evaluation of a directive condition.
///
/// This is the seam between the range resolver and the sandbox. Implementations
/// must not fail: any error is `false`.
pub trait Evaluator {
    fn evaluate(&self, expression: &str, symbols: &SymbolTable) -> bool;
}

/// The default evaluator. Stateless; every call is independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sandbox;

impl Evaluator for Sandbox {
    fn evaluate(&self, expression: &str, symbols: &SymbolTable) -> bool {
        evaluate(expression, symbols)
    }
}

/// An expression that failed to evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalFailure {
    pub expression: String,
    pub message: String,
}

/// Sandbox that remembers every failed evaluation, for diagnostics.
///
/// Results are identical to [`Sandbox`]; failures are still `false`.
#[derive(Debug, Default)]
pub struct CollectingSandbox {
    failures: RefCell<Vec<EvalFailure>>,
}

impl CollectingSandbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_failures(self) -> Vec<EvalFailure> {
        self.failures.into_inner()
    }
}

impl Evaluator for CollectingSandbox {
    fn evaluate(&self, expression: &str, symbols: &SymbolTable) -> bool {
        match try_evaluate(expression, symbols) {
            Ok(value) => value.truthy(),
            Err(err) => {
                self.failures.borrow_mut().push(EvalFailure {
                    expression: expression.to_string(),
                    message: err.to_string(),
                });
                false
            }
        }
    }
}

/// Evaluate `expression` against `symbols` and return its truthiness.
///
/// Unknown identifiers, type errors and syntax errors all yield `false`.
pub fn evaluate(expression: &str, symbols: &SymbolTable) -> bool {
    try_evaluate(expression, symbols).is_ok_and(|value| value.truthy())
}

/// Evaluate `expression` and return its value, or the reason it failed.
pub fn try_evaluate(expression: &str, symbols: &SymbolTable) -> Result<Value> {
    let expr = parse_expression(expression)?;
    Interpreter::new(symbols).eval(&expr)
}

/// Parse a standalone expression.
///
/// The text is wrapped in parentheses and parsed as a script, which must come
/// out as exactly one expression statement. This rejects statements and
/// anything that tries to close the parentheses early.
fn parse_expression(expression: &str) -> Result<Box<Expr>> {
    if expression.trim().is_empty() {
        bail!("empty expression");
    }

    let source_map = SourceMap::default();
    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Anon.into(), format!("({}\n)", expression));

        let mut parser = Parser::new(
            Syntax::Es(Default::default()),
            StringInput::from(&*source_file),
            None,
        );
        let script = parser
            .parse_script()
            .map_err(|e| anyhow!("invalid expression `{}`: {:?}", expression, e))?;
        if let Some(err) = parser.take_errors().into_iter().next() {
            bail!("invalid expression `{}`: {:?}", expression, err);
        }

        match <[Stmt; 1]>::try_from(script.body) {
            Ok([Stmt::Expr(stmt)]) => Ok(stmt.expr),
            _ => bail!("`{}` is not a single expression", expression),
        }
    })
}
