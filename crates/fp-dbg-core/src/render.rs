//! Canonical re-rendering of an expression tree.

use crate::ast::{Callee, CollectionKind, Delim, Node, NodeKind};
use crate::doc::{self, Doc};

/// Continuation lines are indented this much relative to the first.
const STEP: usize = 2;

/// Renders `node` as Rust-like text laid out within `width` columns.
pub fn render(node: &Node, width: usize) -> String {
    doc::render(to_doc(node).indent(STEP), width)
}

pub fn to_doc(node: &Node) -> Doc {
    match node.kind() {
        NodeKind::Var(name) => Doc::text(name.as_str()),
        NodeKind::Lit(text) | NodeKind::Path(text) => Doc::text(text.as_str()),
        NodeKind::Verbatim(text) => verbatim(text),
        NodeKind::Call { callee, args } => call(callee, args),
        NodeKind::Pipe { .. } => chain(node),
        NodeKind::Block(nodes) => block(nodes, ";"),
        NodeKind::Collection { kind, items } => collection(kind, items),
        NodeKind::Pair { label, value } => match value.kind() {
            NodeKind::Var(name) if name == label => Doc::text(label.as_str()),
            _ => Doc::concat(vec![Doc::text(format!("{label}: ")), to_doc(value)]),
        },
        NodeKind::Let { pattern, init } => match init {
            Some(init) => {
                Doc::concat(vec![Doc::text(format!("let {pattern} = ")), to_doc(init)])
            }
            None => Doc::text(format!("let {pattern}")),
        },
        NodeKind::Paren(inner) => {
            Doc::concat(vec![Doc::text("("), to_doc(inner), Doc::text(")")])
        }
    }
}

fn verbatim(text: &str) -> Doc {
    Doc::join(text.lines().map(Doc::text).collect(), Doc::hardline)
}

fn call(callee: &Callee, args: &[Node]) -> Doc {
    match callee {
        Callee::Path(path) => delimited(Doc::text(path.as_str()), Delim::Paren, args),
        Callee::Macro { name, delim } => delimited(Doc::text(format!("{name}!")), *delim, args),
        Callee::Expr(head) => delimited(to_doc(head), Delim::Paren, args),
        Callee::Prefix(op) => Doc::concat(
            std::iter::once(Doc::text(op.as_str()))
                .chain(args.iter().map(to_doc))
                .collect(),
        ),
        Callee::Postfix(op) => Doc::concat(
            args.iter()
                .map(to_doc)
                .chain(std::iter::once(Doc::text(op.as_str())))
                .collect(),
        ),
        Callee::Infix(op) => match args {
            [lhs, rhs] if op.starts_with("..") => {
                Doc::concat(vec![to_doc(lhs), Doc::text(op.as_str()), to_doc(rhs)])
            }
            [lhs, rhs] => Doc::concat(vec![
                to_doc(lhs),
                Doc::text(format!(" {op}")),
                Doc::concat(vec![Doc::softline(), to_doc(rhs)]).indent(STEP),
            ])
            .group(),
            _ => Doc::join(args.iter().map(to_doc).collect(), || {
                Doc::text(format!(" {op} "))
            }),
        },
        Callee::Index => match args {
            [base, index] => Doc::concat(vec![
                to_doc(base),
                Doc::text("["),
                to_doc(index),
                Doc::text("]"),
            ]),
            _ => delimited(Doc::nil(), Delim::Bracket, args),
        },
        Callee::Keyword(keyword) => Doc::join(
            std::iter::once(Doc::text(keyword.as_str()))
                .chain(args.iter().map(to_doc))
                .collect(),
            || Doc::text(" "),
        ),
        Callee::Arms => block(args, ","),
    }
}

/// `head(a, b)`, breaking one item per line when too wide.
fn delimited(head: Doc, delim: Delim, items: &[Node]) -> Doc {
    if items.is_empty() {
        return Doc::concat(vec![head, Doc::text(delim.open()), Doc::text(delim.close())]);
    }
    Doc::concat(vec![
        head,
        Doc::text(delim.open()),
        Doc::concat(vec![Doc::line_break(), comma_list(items)]).indent(STEP),
        Doc::line_break(),
        Doc::text(delim.close()),
    ])
    .group()
}

fn comma_list(items: &[Node]) -> Doc {
    Doc::join(items.iter().map(to_doc).collect(), || {
        Doc::concat(vec![Doc::text(","), Doc::softline()])
    })
}

/// `receiver.a().b()`, one step per line when too wide.
fn chain(node: &Node) -> Doc {
    let mut steps = Vec::new();
    let mut head = node;
    while let NodeKind::Pipe { receiver, call } = head.kind() {
        steps.push(call.as_ref());
        head = receiver;
    }
    let steps = steps
        .into_iter()
        .rev()
        .map(|step| Doc::concat(vec![Doc::line_break(), Doc::text("."), to_doc(step)]))
        .collect();
    Doc::concat(vec![to_doc(head), Doc::concat(steps).indent(STEP)]).group()
}

/// `{ a; b }` for statements, `{ a, b }` for match arms.
fn block(nodes: &[Node], sep: &str) -> Doc {
    if nodes.is_empty() {
        return Doc::text("{}");
    }
    let body = Doc::join(nodes.iter().map(to_doc).collect(), || {
        Doc::concat(vec![Doc::text(sep), Doc::softline()])
    });
    Doc::concat(vec![
        Doc::text("{"),
        Doc::concat(vec![Doc::softline(), body]).indent(STEP),
        Doc::softline(),
        Doc::text("}"),
    ])
    .group()
}

fn collection(kind: &CollectionKind, items: &[Node]) -> Doc {
    match kind {
        CollectionKind::Tuple if items.len() == 1 => {
            Doc::concat(vec![Doc::text("("), to_doc(&items[0]), Doc::text(",)")])
        }
        CollectionKind::Tuple => delimited(Doc::nil(), Delim::Paren, items),
        CollectionKind::Array => delimited(Doc::nil(), Delim::Bracket, items),
        CollectionKind::Struct(path) if items.is_empty() => Doc::text(format!("{path} {{}}")),
        CollectionKind::Struct(path) => Doc::concat(vec![
            Doc::text(format!("{path} {{")),
            Doc::concat(vec![Doc::softline(), comma_list(items)]).indent(STEP),
            Doc::softline(),
            Doc::text("}"),
        ])
        .group(),
    }
}
