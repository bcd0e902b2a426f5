//! Range resolution: the nested `#if` chain state machine.
//!
//! Directives are processed in line order against a stack holding exactly one
//! frame per open chain. The frame is updated in place on `#elif` / `#else`
//! and popped once by the matching `#endif`. Before a frame moves on to the
//! next branch, the body of the branch it leaves is emitted as an exclusion
//! range if that branch did not pass.
//!
//! ```text
//! // #if A          <- frame { passed: eval(A) }
//! ...               <- kept when A is truthy
//! // #elif B        <- excluded (A..this) if A failed; B evaluated only if A failed
//! ...
//! // #else          <- passes only when no earlier branch did
//! ...
//! // #endif         <- closes the last branch, pops the frame
//! ```
//!
//! A chain opened inside a failed branch is `Indeterminate`: none of its
//! expressions are evaluated and it emits nothing, since the enclosing
//! range already covers it.
//!
//! Malformed sequences (`#elif` with no open chain, stray `#endif`, a second
//! `#else`) are ignored. A chain still open at end of input emits nothing.

use super::{
    data::{ExclusionRange, ResolveOptions, SourceComment, directive_flag},
    directive::{Directive, DirectiveKind, Keyword},
    eval::{Evaluator, Sandbox},
};

/// Outcome of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passed {
    /// Branch is retained.
    True,
    /// Branch was evaluated (or ruled out by an earlier match) and is excluded.
    False,
    /// An ancestor branch failed; never evaluated, never emits a range.
    Indeterminate,
}

impl From<bool> for Passed {
    fn from(value: bool) -> Self {
        if value { Passed::True } else { Passed::False }
    }
}

/// State of one open chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    /// Keyword of the branch currently open in this chain.
    keyword: Keyword,
    /// Line of that branch's directive.
    line: usize,
    passed: Passed,
    /// 1 for the outermost chain.
    level: usize,
    /// Whether any branch of this chain has passed so far.
    matched: bool,
}

/// Incremental resolver over a directive stream.
pub struct RangeResolver<'a, E: Evaluator + ?Sized = Sandbox> {
    options: &'a ResolveOptions,
    evaluator: &'a E,
    stack: Vec<Frame>,
    ranges: Vec<ExclusionRange>,
}

impl<'a, E: Evaluator + ?Sized> RangeResolver<'a, E> {
    pub fn new(options: &'a ResolveOptions, evaluator: &'a E) -> Self {
        Self {
            options,
            evaluator,
            stack: Vec::new(),
            ranges: Vec::new(),
        }
    }

    /// Apply one directive. Directives must arrive in ascending line order.
    pub fn apply(&mut self, directive: &Directive) {
        let line = directive.line;
        let expression = directive.expression.as_deref();

        match &directive.kind {
            DirectiveKind::Structural(Keyword::If) => self.open(line, expression),
            DirectiveKind::Structural(Keyword::Elif) => {
                self.next_branch(Keyword::Elif, line, expression)
            }
            DirectiveKind::Structural(Keyword::Else) => self.next_branch(Keyword::Else, line, None),
            DirectiveKind::Structural(Keyword::Endif) => self.close(line),
            DirectiveKind::Custom(name) => self.custom(name, line),
        }
    }

    /// Current nesting depth (0 outside any chain).
    pub fn depth(&self) -> usize {
        self.stack.last().map_or(0, |frame| frame.level)
    }

    /// Finish and return the collected ranges.
    pub fn finish(self) -> Vec<ExclusionRange> {
        self.ranges
    }

    /// `passed` of the innermost open branch; the implicit root always passes.
    fn top_passed(&self) -> Passed {
        self.stack.last().map_or(Passed::True, |frame| frame.passed)
    }

    fn condition(&self, expression: Option<&str>) -> Passed {
        let expression = expression.unwrap_or_default();
        self.evaluator
            .evaluate(expression, &self.options.symbols)
            .into()
    }

    fn open(&mut self, line: usize, expression: Option<&str>) {
        let passed = match self.top_passed() {
            Passed::True => self.condition(expression),
            Passed::False | Passed::Indeterminate => Passed::Indeterminate,
        };
        self.stack.push(Frame {
            keyword: Keyword::If,
            line,
            passed,
            level: self.depth() + 1,
            matched: passed == Passed::True,
        });
    }

    fn next_branch(&mut self, keyword: Keyword, line: usize, expression: Option<&str>) {
        let Some(&frame) = self.stack.last() else {
            return;
        };
        if !matches!(frame.keyword, Keyword::If | Keyword::Elif) {
            return;
        }

        match frame.passed {
            Passed::Indeterminate => return,
            Passed::False => self.ranges.push(ExclusionRange::new(frame.line, line)),
            Passed::True => {}
        }

        // First match wins: once a branch passed, later ones are not evaluated
        let passed = if frame.matched {
            Passed::False
        } else if keyword == Keyword::Else {
            Passed::True
        } else {
            self.condition(expression)
        };

        if let Some(top) = self.stack.last_mut() {
            *top = Frame {
                keyword,
                line,
                passed,
                level: frame.level,
                matched: frame.matched || passed == Passed::True,
            };
        }
    }

    fn close(&mut self, line: usize) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if frame.passed == Passed::False {
            self.ranges.push(ExclusionRange::new(frame.line, line));
        }
    }

    fn custom(&mut self, name: &str, line: usize) {
        if self.top_passed() != Passed::True {
            return;
        }
        if directive_flag(&self.options.directives, name) == Some(false) {
            self.ranges.push(ExclusionRange::new(line, line + 1));
        }
    }
}

/// Resolve the exclusion ranges for a file's comments using the default sandbox.
pub fn resolve(comments: &[SourceComment], options: &ResolveOptions) -> Vec<ExclusionRange> {
    resolve_with(comments, options, &Sandbox)
}

/// Resolve the exclusion ranges with a specific evaluator.
pub fn resolve_with<E: Evaluator + ?Sized>(
    comments: &[SourceComment],
    options: &ResolveOptions,
    evaluator: &E,
) -> Vec<ExclusionRange> {
    resolve_directives(&collect_directives(comments), options, evaluator)
}

/// Parse every directive out of `comments`, in line order.
pub fn collect_directives(comments: &[SourceComment]) -> Vec<Directive> {
    let mut directives: Vec<Directive> = comments
        .iter()
        .filter_map(|comment| Directive::parse(&comment.text, comment.start_line))
        .collect();
    directives.sort_by_key(|directive| directive.line);
    directives
}

/// Resolve already parsed directives. They must be sorted by line.
pub fn resolve_directives<E: Evaluator + ?Sized>(
    directives: &[Directive],
    options: &ResolveOptions,
    evaluator: &E,
) -> Vec<ExclusionRange> {
    let mut resolver = RangeResolver::new(options, evaluator);
    for directive in directives {
        resolver.apply(directive);
    }
    resolver.finish()
}
