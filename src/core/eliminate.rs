//! Branch elimination: turn exclusion ranges into edited source text.
//!
//! The AST is walked once to find what to delete; the deletions are then
//! applied to the original text, so formatting and unrelated comments survive
//! untouched.
//!
//! A node is removed when its whole line span lies inside an exclusion range;
//! nothing below a removed node is visited. What removal means depends on
//! where the node sits:
//!
//! - statement-like lists (module items, statements, class members, switch
//!   cases, JSX children and attributes): the node is deleted
//! - separated lists (object and pattern properties, array elements, call
//!   arguments, parameters, declarators, import/export specifiers, enum and
//!   interface members): the node is deleted with the separator after it
//! - a lone statement body (`if (x) stmt`): replaced by `{}`
//! - a JSX element or fragment in expression position: replaced by `null`
//!
//! JSX elements get one extra rule. When an opening or closing tag falls inside
//! a range but the element as a whole does not, the element is replaced by its
//! only surviving child element, or removed if there isn't exactly one:
//!
//! ```tsx
//! {/* #if WRAP */}
//! <Wrapper>
//! {/* #endif */}
//!   <Content />
//! {/* #if WRAP */}
//! </Wrapper>
//! {/* #endif */}
//! ```

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ClassMember, ExportSpecifier, Expr, ExprOrSpread, ImportSpecifier, JSXAttrOrSpread, JSXElement,
    JSXElementChild, JSXExpr, JSXExprContainer, ModuleItem, ObjectPatProp, Param, PropOrSpread,
    Stmt, SwitchCase, TsEnumMember, TsTypeElement, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::{
    data::{DirectiveConfig, ExclusionRange},
    directive::is_directive,
    parsers::source::ParsedSource,
};

/// Result of eliminating dead branches from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub code: String,
    /// Nodes deleted because they fell inside an exclusion range.
    pub removed_nodes: usize,
    /// JSX elements replaced by their single surviving child.
    pub spliced_elements: usize,
    /// Directive comments stripped from the output.
    pub stripped_comments: usize,
}

impl Output {
    pub fn changed(&self) -> bool {
        self.removed_nodes > 0 || self.spliced_elements > 0 || self.stripped_comments > 0
    }
}

/// A text deletion (or replacement) in byte offsets of the original code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edit {
    lo: usize,
    hi: usize,
    replacement: &'static str,
}

/// Remove excluded nodes and directive comments from a parsed file.
pub fn eliminate(
    parsed: &ParsedSource,
    ranges: &[ExclusionRange],
    directives: &DirectiveConfig,
) -> Output {
    let mut directive_spans = Vec::new();
    let mut other_comment_spans = Vec::new();
    for cmt in parsed.comments.iter() {
        if is_directive(&cmt.text, directives) {
            directive_spans.push(cmt.span);
        } else {
            other_comment_spans.push(cmt.span);
        }
    }

    let mut eliminator = Eliminator {
        parsed,
        ranges,
        directive_spans,
        other_comment_spans,
        edits: Vec::new(),
        removed_nodes: 0,
        spliced_elements: 0,
    };
    parsed.module.visit_with(&mut eliminator);

    let stripped_comments = eliminator.directive_spans.len();
    let comment_edits: Vec<Edit> = eliminator
        .directive_spans
        .iter()
        .map(|span| eliminator.edit(*span, ""))
        .collect();
    eliminator.edits.extend(comment_edits);

    Output {
        code: apply_edits(&parsed.code, eliminator.edits),
        removed_nodes: eliminator.removed_nodes,
        spliced_elements: eliminator.spliced_elements,
        stripped_comments,
    }
}

struct Eliminator<'a> {
    parsed: &'a ParsedSource,
    ranges: &'a [ExclusionRange],
    directive_spans: Vec<Span>,
    other_comment_spans: Vec<Span>,
    edits: Vec<Edit>,
    removed_nodes: usize,
    spliced_elements: usize,
}

impl Eliminator<'_> {
    fn excluded(&self, span: Span) -> bool {
        if self.ranges.is_empty() {
            return false;
        }
        let (start_line, end_line) = self.parsed.lines_of(span);
        ExclusionRange::any_contains(self.ranges, start_line, end_line)
    }

    fn edit(&self, span: Span, replacement: &'static str) -> Edit {
        Edit {
            lo: self.parsed.offset_of(span.lo),
            hi: self.parsed.offset_of(span.hi),
            replacement,
        }
    }

    fn remove(&mut self, span: Span, replacement: &'static str) {
        let edit = self.edit(span, replacement);
        self.edits.push(edit);
        self.removed_nodes += 1;
    }

    fn visit_list<T: Spanned + VisitWith<Self>>(&mut self, items: &[T]) {
        for item in items {
            let span = item.span();
            if self.excluded(span) {
                self.remove(span, "");
            } else {
                item.visit_with(self);
            }
        }
    }

    /// Remove contained members of a separated list along with the separator
    /// after each. With `tidy_tail`, removing the tail of the list also drops
    /// the separator of the last kept member, so `let a = 1, b;` never
    /// becomes `let a = 1, ;`.
    fn visit_separated<'n, T>(
        &mut self,
        items: impl IntoIterator<Item = &'n T>,
        separators: &[u8],
        tidy_tail: bool,
    ) where
        T: Spanned + VisitWith<Self> + 'n,
    {
        let items: Vec<&T> = items.into_iter().collect();
        let excluded: Vec<bool> = items.iter().map(|item| self.excluded(item.span())).collect();
        let last_kept = excluded.iter().rposition(|gone| !gone);

        for (i, item) in items.iter().enumerate() {
            if !excluded[i] {
                (*item).visit_with(self);
                continue;
            }

            let mut edit = self.edit(item.span(), "");
            if let Some(sep) = self.separator_after(edit.hi, separators) {
                edit.hi = sep + 1;
            }
            self.edits.push(edit);
            self.removed_nodes += 1;

            if let Some(kept) = last_kept.filter(|&kept| tidy_tail && kept < i) {
                let kept_hi = self.parsed.offset_of(items[kept].span().hi);
                if let Some(sep) = self.separator_after(kept_hi, separators) {
                    self.edits.push(Edit {
                        lo: sep,
                        hi: sep + 1,
                        replacement: "",
                    });
                }
            }
        }
    }

    /// Offset of the separator following `pos`, looking past whitespace and comments.
    fn separator_after(&self, pos: usize, separators: &[u8]) -> Option<usize> {
        let code = self.parsed.code.as_bytes();
        let mut i = pos;
        while i < code.len() {
            match code[i] {
                b if b.is_ascii_whitespace() => i += 1,
                b'/' if code.get(i + 1) == Some(&b'/') => {
                    i = self.parsed.code[i..].find('\n').map_or(code.len(), |n| i + n);
                }
                b'/' if code.get(i + 1) == Some(&b'*') => {
                    i = self.parsed.code[i + 2..]
                        .find("*/")
                        .map_or(code.len(), |n| i + 2 + n + 2);
                }
                b if separators.contains(&b) => return Some(i),
                _ => return None,
            }
        }
        None
    }

    /// `{/* #endif */}` and friends: an empty container holding only directives.
    fn is_directive_container(&self, container: &JSXExprContainer) -> bool {
        if !matches!(container.expr, JSXExpr::JSXEmptyExpr(_)) {
            return false;
        }
        let outer = container.span;
        let inside = |span: &Span| span.lo >= outer.lo && span.hi <= outer.hi;
        self.directive_spans.iter().any(inside) && !self.other_comment_spans.iter().any(inside)
    }

    /// Handle a JSX element. `replacement` is what a fully removed element
    /// leaves behind: nothing as a JSX child, `null` in expression position.
    fn visit_element(&mut self, element: &JSXElement, replacement: &'static str) {
        if self.excluded(element.span) {
            self.remove(element.span, replacement);
            return;
        }

        let straddles = self.excluded(element.opening.span)
            || element
                .closing
                .as_ref()
                .is_some_and(|closing| self.excluded(closing.span));
        if !straddles {
            element.visit_children_with(self);
            return;
        }

        let survivors: Vec<&JSXElement> = element
            .children
            .iter()
            .filter_map(|child| match child {
                JSXElementChild::JSXElement(child) if !self.excluded(child.span) => Some(&**child),
                _ => None,
            })
            .collect();

        match survivors.as_slice() {
            [child] => {
                let before = self.edit(Span::new(element.span.lo, child.span.lo), "");
                let after = self.edit(Span::new(child.span.hi, element.span.hi), "");
                self.edits.extend([before, after]);
                self.spliced_elements += 1;
                self.visit_element(child, replacement);
            }
            _ => self.remove(element.span, replacement),
        }
    }
}

impl Visit for Eliminator<'_> {
    fn visit_module_items(&mut self, items: &[ModuleItem]) {
        self.visit_list(items);
    }

    fn visit_stmts(&mut self, stmts: &[Stmt]) {
        self.visit_list(stmts);
    }

    fn visit_class_members(&mut self, members: &[ClassMember]) {
        self.visit_list(members);
    }

    fn visit_switch_cases(&mut self, cases: &[SwitchCase]) {
        self.visit_list(cases);
    }

    /// Statements outside a list: `if`/`else` branches, loop and label bodies.
    fn visit_stmt(&mut self, stmt: &Stmt) {
        let span = stmt.span();
        if self.excluded(span) {
            self.remove(span, "{}");
            return;
        }
        stmt.visit_children_with(self);
    }

    fn visit_prop_or_spreads(&mut self, props: &[PropOrSpread]) {
        self.visit_separated(props, b",", true);
    }

    fn visit_object_pat_props(&mut self, props: &[ObjectPatProp]) {
        self.visit_separated(props, b",", true);
    }

    fn visit_expr_or_spreads(&mut self, args: &[ExprOrSpread]) {
        self.visit_separated(args, b",", true);
    }

    fn visit_opt_vec_expr_or_spreads(&mut self, elems: &[Option<ExprOrSpread>]) {
        self.visit_separated(elems.iter().flatten(), b",", true);
    }

    fn visit_params(&mut self, params: &[Param]) {
        self.visit_separated(params, b",", true);
    }

    fn visit_var_declarators(&mut self, decls: &[VarDeclarator]) {
        // `let ;` is not a declaration: only the whole statement may go
        if decls.iter().all(|decl| self.excluded(decl.span)) {
            return;
        }
        self.visit_separated(decls, b",", true);
    }

    fn visit_import_specifiers(&mut self, specifiers: &[ImportSpecifier]) {
        self.visit_separated(specifiers, b",", true);
    }

    fn visit_export_specifiers(&mut self, specifiers: &[ExportSpecifier]) {
        self.visit_separated(specifiers, b",", true);
    }

    fn visit_ts_enum_members(&mut self, members: &[TsEnumMember]) {
        self.visit_separated(members, b",", true);
    }

    fn visit_ts_type_elements(&mut self, members: &[TsTypeElement]) {
        self.visit_separated(members, b",;", false);
    }

    fn visit_jsx_attr_or_spreads(&mut self, attrs: &[JSXAttrOrSpread]) {
        self.visit_list(attrs);
    }

    fn visit_jsx_element_childs(&mut self, children: &[JSXElementChild]) {
        for child in children {
            let span = child.span();
            if self.excluded(span) {
                self.remove(span, "");
                continue;
            }
            match child {
                JSXElementChild::JSXElement(element) => self.visit_element(element, ""),
                JSXElementChild::JSXExprContainer(container)
                    if self.is_directive_container(container) =>
                {
                    let edit = self.edit(container.span, "");
                    self.edits.push(edit);
                }
                _ => child.visit_with(self),
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::JSXElement(element) => self.visit_element(element, "null"),
            Expr::JSXFragment(fragment) if self.excluded(fragment.span) => {
                self.remove(fragment.span, "null")
            }
            _ => expr.visit_children_with(self),
        }
    }
}

/// Grow a pure deletion to cover its whole line(s) when nothing else is on
/// them, or to swallow the whitespace before it when it ends a line.
fn widen(code: &str, edit: Edit) -> Edit {
    if !edit.replacement.is_empty() {
        return edit;
    }

    let line_start = code[..edit.lo].rfind('\n').map_or(0, |i| i + 1);
    let line_end = code[edit.hi..]
        .find('\n')
        .map_or(code.len(), |i| edit.hi + i);
    let before = &code[line_start..edit.lo];
    let after = &code[edit.hi..line_end];

    match (before.trim().is_empty(), after.trim().is_empty()) {
        (true, true) => Edit {
            lo: line_start,
            hi: (line_end + 1).min(code.len()),
            ..edit
        },
        (false, true) => Edit {
            lo: line_start + before.trim_end().len(),
            ..edit
        },
        _ => edit,
    }
}

fn apply_edits(code: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| a.lo.cmp(&b.lo).then(b.hi.cmp(&a.hi)));

    // Overlapping edits collapse into the outermost one; touching deletions join
    let mut merged: Vec<Edit> = Vec::with_capacity(edits.len());
    for edit in edits {
        match merged.last_mut() {
            Some(last)
                if edit.lo < last.hi
                    || (edit.lo == last.hi
                        && last.replacement.is_empty()
                        && edit.replacement.is_empty()) =>
            {
                last.hi = last.hi.max(edit.hi);
            }
            _ => merged.push(edit),
        }
    }

    let mut out = String::with_capacity(code.len());
    let mut cursor = 0;
    for edit in merged.into_iter().map(|edit| widen(code, edit)) {
        // Widening may reach back over text an earlier edit already consumed
        let lo = edit.lo.max(cursor);
        out.push_str(&code[cursor..lo]);
        out.push_str(edit.replacement);
        cursor = cursor.max(edit.hi);
    }
    out.push_str(&code[cursor..]);
    out
}
