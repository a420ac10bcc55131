//! Lowering of `syn` expressions into the engine tree.

use crate::span;
use crate::verbatim::{
    expr_text, item_text, macro_text, pat_text, path_text, turbofish_text, type_text,
};
use fp_dbg_core::ast::{Callee, CollectionKind, Delim, Node};
use itertools::Itertools;
use quote::ToTokens;
use std::collections::HashSet;
use syn::punctuated::Punctuated;
use syn::Token;

/// Macros whose arguments are a plain comma separated expression list.
const EXPR_MACROS: &[&str] = &[
    "vec",
    "format",
    "format_args",
    "print",
    "println",
    "eprint",
    "eprintln",
    "panic",
    "assert",
    "assert_eq",
    "assert_ne",
    "write",
    "writeln",
];

/// Lowers expressions while tracking names bound inside them.
#[derive(Debug, Default)]
pub struct Lowerer {
    scopes: Vec<HashSet<String>>,
}

impl Lowerer {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_bound(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains(name))
    }

    fn bind(&mut self, pat: &syn::Pat) {
        let mut names = Vec::new();
        pattern_names(pat, &mut names);
        if let Some(scope) = self.scopes.last_mut() {
            scope.extend(names);
        }
    }

    /// Runs `f` in a new scope holding the names bound by `pats`.
    fn scoped<'p, T>(
        &mut self,
        pats: impl IntoIterator<Item = &'p syn::Pat>,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.scopes.push(HashSet::new());
        for pat in pats {
            self.bind(pat);
        }
        let out = f(self);
        self.scopes.pop();
        out
    }

    pub fn lower_expr(&mut self, expr: &syn::Expr) -> Node {
        let node = match expr {
            syn::Expr::Path(p) => self.lower_expr_path(p),
            syn::Expr::Lit(l) => Node::lit(l.lit.to_token_stream().to_string()),
            syn::Expr::Binary(b) => Node::infix(
                b.op.to_token_stream().to_string(),
                self.lower_expr(&b.left),
                self.lower_expr(&b.right),
            ),
            syn::Expr::Unary(u) => self.lower_expr_unary(u),
            syn::Expr::Reference(r) => {
                let op = if r.mutability.is_some() { "&mut " } else { "&" };
                Node::call(Callee::Prefix(op.into()), vec![self.lower_expr(&r.expr)])
            }
            syn::Expr::Assign(a) => {
                Node::infix("=", self.lower_expr(&a.left), self.lower_expr(&a.right))
            }
            syn::Expr::Cast(c) => {
                Node::infix("as", self.lower_expr(&c.expr), Node::path(type_text(&c.ty)))
            }
            syn::Expr::Field(f) => {
                let member = match &f.member {
                    syn::Member::Named(ident) => ident.to_string(),
                    syn::Member::Unnamed(index) => index.index.to_string(),
                };
                Node::call(
                    Callee::Postfix(format!(".{member}")),
                    vec![self.lower_expr(&f.base)],
                )
            }
            syn::Expr::Index(i) => Node::call(
                Callee::Index,
                vec![self.lower_expr(&i.expr), self.lower_expr(&i.index)],
            ),
            syn::Expr::Try(t) => {
                Node::call(Callee::Postfix("?".into()), vec![self.lower_expr(&t.expr)])
            }
            syn::Expr::Await(a) => Node::call(
                Callee::Postfix(".await".into()),
                vec![self.lower_expr(&a.base)],
            ),
            syn::Expr::Range(r) => self.lower_expr_range(r),
            syn::Expr::Paren(p) => Node::paren(self.lower_expr(&p.expr)),
            syn::Expr::Group(g) => return self.lower_expr(&g.expr),
            syn::Expr::Tuple(t) if t.elems.is_empty() => Node::lit("()"),
            syn::Expr::Tuple(t) => Node::tuple(self.lower_each(&t.elems)),
            syn::Expr::Array(a) => Node::array(self.lower_each(&a.elems)),
            syn::Expr::Struct(s) if s.qself.is_none() => self.lower_expr_struct(s),
            syn::Expr::Call(c) => self.lower_expr_call(c),
            syn::Expr::MethodCall(c) => self.lower_expr_method_call(c),
            syn::Expr::Macro(m) => self.lower_macro(&m.mac),
            syn::Expr::Block(b) if b.label.is_none() && b.attrs.is_empty() => {
                self.lower_block(&b.block)
            }
            syn::Expr::Block(b) if b.attrs.is_empty() => {
                Node::keyword(labelled(b.label.as_ref(), ""), vec![self.lower_block(&b.block)])
            }
            syn::Expr::Unsafe(u) => Node::keyword("unsafe", vec![self.lower_block(&u.block)]),
            syn::Expr::Async(a) => {
                let keyword = if a.capture.is_some() { "async move" } else { "async" };
                Node::keyword(keyword, vec![self.lower_block(&a.block)])
            }
            syn::Expr::If(i) => self.lower_expr_if(i),
            syn::Expr::Let(l) => {
                let init = self.lower_expr(&l.expr);
                self.bind(&l.pat);
                Node::let_(pat_text(&l.pat), Some(init))
            }
            syn::Expr::Match(m) => self.lower_expr_match(m),
            syn::Expr::ForLoop(f) => self.lower_expr_for(f),
            syn::Expr::While(w) => {
                let parts = self.scoped(std::iter::empty(), |this| {
                    vec![this.lower_expr(&w.cond), this.lower_block(&w.body)]
                });
                Node::keyword(labelled(w.label.as_ref(), "while"), parts)
            }
            syn::Expr::Loop(l) => {
                Node::keyword(labelled(l.label.as_ref(), "loop"), vec![self.lower_block(&l.body)])
            }
            syn::Expr::Closure(c)
                if c.lifetimes.is_none() && c.constness.is_none() && c.movability.is_none() =>
            {
                self.lower_expr_closure(c)
            }
            syn::Expr::Return(r) => match &r.expr {
                Some(value) => Node::keyword("return", vec![self.lower_expr(value)]),
                None => Node::path("return"),
            },
            syn::Expr::Break(b) => {
                let keyword = match &b.label {
                    Some(label) => format!("break {label}"),
                    None => "break".to_string(),
                };
                match &b.expr {
                    Some(value) => Node::keyword(keyword, vec![self.lower_expr(value)]),
                    None => Node::path(keyword),
                }
            }
            raw => {
                tracing::trace!("verbatim expression {}", raw.to_token_stream());
                Node::verbatim(expr_text(raw))
            }
        };
        node.with_span(span::tokens_span(expr.to_token_stream()))
    }

    fn lower_each<'e>(&mut self, exprs: impl IntoIterator<Item = &'e syn::Expr>) -> Vec<Node> {
        exprs.into_iter().map(|expr| self.lower_expr(expr)).collect()
    }

    fn lower_expr_path(&mut self, p: &syn::ExprPath) -> Node {
        match local_name(p) {
            Some(name) if self.is_bound(&name) => Node::verbatim(name),
            Some(name) => Node::var(name),
            None => Node::path(expr_text(&syn::Expr::Path(p.clone()))),
        }
    }

    fn lower_expr_unary(&mut self, u: &syn::ExprUnary) -> Node {
        let op = match u.op {
            syn::UnOp::Deref(_) => "*",
            syn::UnOp::Not(_) => "!",
            syn::UnOp::Neg(_) => "-",
            _ => return Node::verbatim(expr_text(&syn::Expr::Unary(u.clone()))),
        };
        Node::call(Callee::Prefix(op.into()), vec![self.lower_expr(&u.expr)])
    }

    fn lower_expr_range(&mut self, r: &syn::ExprRange) -> Node {
        let op = match r.limits {
            syn::RangeLimits::HalfOpen(_) => "..",
            syn::RangeLimits::Closed(_) => "..=",
        };
        let start = r.start.as_deref().map(|expr| self.lower_expr(expr));
        let end = r.end.as_deref().map(|expr| self.lower_expr(expr));
        match (start, end) {
            (Some(start), Some(end)) => Node::infix(op, start, end),
            (Some(start), None) => Node::call(Callee::Postfix(op.into()), vec![start]),
            (None, Some(end)) => Node::call(Callee::Prefix(op.into()), vec![end]),
            (None, None) => Node::path(op),
        }
    }

    fn lower_expr_struct(&mut self, s: &syn::ExprStruct) -> Node {
        let mut items: Vec<Node> = s
            .fields
            .iter()
            .map(|field| {
                let label = match &field.member {
                    syn::Member::Named(ident) => ident.to_string(),
                    syn::Member::Unnamed(index) => index.index.to_string(),
                };
                Node::pair(label, self.lower_expr(&field.expr))
            })
            .collect();
        if let Some(rest) = &s.rest {
            items.push(Node::call(
                Callee::Prefix("..".into()),
                vec![self.lower_expr(rest)],
            ));
        }
        Node::collection(CollectionKind::Struct(path_text(&s.path)), items)
    }

    fn lower_expr_call(&mut self, c: &syn::ExprCall) -> Node {
        let callee = match c.func.as_ref() {
            syn::Expr::Path(p) => Callee::Path(expr_text(&syn::Expr::Path(p.clone()))),
            func => Callee::Expr(Box::new(self.lower_expr(func))),
        };
        Node::call(callee, self.lower_each(&c.args))
    }

    fn lower_expr_method_call(&mut self, c: &syn::ExprMethodCall) -> Node {
        let receiver = self.lower_expr(&c.receiver);
        let name = match &c.turbofish {
            Some(turbofish) => format!("{}{}", c.method, turbofish_text(turbofish)),
            None => c.method.to_string(),
        };
        let call = Node::call_path(name, self.lower_each(&c.args))
            .with_span(span::between(c.method.span(), c.paren_token.span.close()));
        Node::pipe(receiver, call)
    }

    fn lower_expr_if(&mut self, i: &syn::ExprIf) -> Node {
        // `if let` bindings are visible in the then branch only.
        let mut parts = self.scoped(std::iter::empty(), |this| {
            vec![this.lower_expr(&i.cond), this.lower_block(&i.then_branch)]
        });
        if let Some((_, other)) = &i.else_branch {
            parts.push(Node::verbatim("else"));
            parts.push(self.lower_expr(other));
        }
        Node::keyword("if", parts)
    }

    fn lower_expr_match(&mut self, m: &syn::ExprMatch) -> Node {
        let scrutinee = self.lower_expr(&m.expr);
        let arms = m.arms.iter().map(|arm| self.lower_arm(arm)).collect();
        Node::keyword("match", vec![scrutinee, Node::call(Callee::Arms, arms)])
    }

    fn lower_arm(&mut self, arm: &syn::Arm) -> Node {
        self.scoped([&arm.pat], |this| {
            let pat = Node::verbatim(pat_text(&arm.pat));
            let head = match &arm.guard {
                Some((_, guard)) => Node::infix("if", pat, this.lower_expr(guard)),
                None => pat,
            };
            Node::infix("=>", head, this.lower_expr(&arm.body))
        })
    }

    fn lower_expr_for(&mut self, f: &syn::ExprForLoop) -> Node {
        let iter = self.lower_expr(&f.expr);
        let body = self.scoped([f.pat.as_ref()], |this| this.lower_block(&f.body));
        let head = Node::infix("in", Node::verbatim(pat_text(&f.pat)), iter);
        Node::keyword(labelled(f.label.as_ref(), "for"), vec![head, body])
    }

    fn lower_expr_closure(&mut self, c: &syn::ExprClosure) -> Node {
        let mut head = String::new();
        if c.asyncness.is_some() {
            head.push_str("async ");
        }
        if c.capture.is_some() {
            head.push_str("move ");
        }
        head.push_str(&format!("|{}|", c.inputs.iter().map(pat_text).join(", ")));
        if let syn::ReturnType::Type(_, ty) = &c.output {
            head.push_str(&format!(" -> {}", type_text(ty)));
        }
        head.push(' ');
        let body = self.scoped(&c.inputs, |this| this.lower_expr(&c.body));
        Node::call(Callee::Prefix(head), vec![body])
    }

    fn lower_macro(&mut self, mac: &syn::Macro) -> Node {
        let name = mac
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_default();
        if !EXPR_MACROS.contains(&name.as_str()) {
            return Node::verbatim(macro_text(mac));
        }
        let Ok(args) = mac.parse_body_with(Punctuated::<syn::Expr, Token![,]>::parse_terminated)
        else {
            return Node::verbatim(macro_text(mac));
        };
        let delim = match mac.delimiter {
            syn::MacroDelimiter::Paren(_) => Delim::Paren,
            syn::MacroDelimiter::Bracket(_) => Delim::Bracket,
            syn::MacroDelimiter::Brace(_) => Delim::Brace,
        };
        Node::call(
            Callee::Macro {
                name: path_text(&mac.path),
                delim,
            },
            self.lower_each(&args),
        )
    }

    fn lower_block(&mut self, block: &syn::Block) -> Node {
        self.scopes.push(HashSet::new());
        let nodes = block
            .stmts
            .iter()
            .map(|stmt| self.lower_stmt(stmt))
            .collect();
        self.scopes.pop();
        Node::block(nodes)
    }

    fn lower_stmt(&mut self, stmt: &syn::Stmt) -> Node {
        match stmt {
            syn::Stmt::Local(local) => {
                let init = local.init.as_ref().map(|init| {
                    let node = self.lower_expr(&init.expr);
                    match &init.diverge {
                        Some((_, diverge)) => Node::infix(
                            "else",
                            node,
                            Node::verbatim(expr_text(diverge)),
                        ),
                        None => node,
                    }
                });
                self.bind(&local.pat);
                Node::let_(pat_text(&local.pat), init)
                    .with_span(span::tokens_span(local.to_token_stream()))
            }
            syn::Stmt::Expr(expr, _) => self.lower_expr(expr),
            syn::Stmt::Macro(m) => self.lower_macro(&m.mac),
            syn::Stmt::Item(item) => Node::verbatim(item_text(item)),
        }
    }
}

/// `'label: keyword`, or the bare keyword.
fn labelled(label: Option<&syn::Label>, keyword: &str) -> String {
    match label {
        Some(label) if keyword.is_empty() => format!("{}:", label.name),
        Some(label) => format!("{}: {keyword}", label.name),
        None => keyword.to_string(),
    }
}

/// The identifier of a path that can only name a local binding.
fn local_name(p: &syn::ExprPath) -> Option<String> {
    if p.qself.is_some() || p.path.leading_colon.is_some() || p.path.segments.len() != 1 {
        return None;
    }
    let segment = p.path.segments.first()?;
    if !segment.arguments.is_none() {
        return None;
    }
    let name = segment.ident.to_string();
    let first = name.trim_start_matches("r#").chars().next()?;
    (first.is_lowercase() || first == '_').then_some(name)
}

fn pattern_names(pat: &syn::Pat, names: &mut Vec<String>) {
    match pat {
        syn::Pat::Ident(p) => {
            names.push(p.ident.to_string());
            if let Some((_, sub)) = &p.subpat {
                pattern_names(sub, names);
            }
        }
        syn::Pat::Tuple(p) => p.elems.iter().for_each(|pat| pattern_names(pat, names)),
        syn::Pat::TupleStruct(p) => p.elems.iter().for_each(|pat| pattern_names(pat, names)),
        syn::Pat::Slice(p) => p.elems.iter().for_each(|pat| pattern_names(pat, names)),
        syn::Pat::Or(p) => p.cases.iter().for_each(|pat| pattern_names(pat, names)),
        syn::Pat::Struct(p) => p
            .fields
            .iter()
            .for_each(|field| pattern_names(&field.pat, names)),
        syn::Pat::Reference(p) => pattern_names(&p.pat, names),
        syn::Pat::Type(p) => pattern_names(&p.pat, names),
        syn::Pat::Paren(p) => pattern_names(&p.pat, names),
        _ => {}
    }
}
