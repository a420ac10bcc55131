//! Expression tree consumed by the engine.
//!
//! The tree is produced by a front end (the proc macro lowers `syn::Expr` into it) and is
//! only ever read here. Every node may carry the source position of its first and last
//! token.

use derive_more::Display;

/// Identifier of a local binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Name {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// 1-based line, 0-based column (in characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Position of the first (`lo`) and last (`hi`) token of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    pub lo: Pos,
    pub hi: Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delim {
    Paren,
    Bracket,
    Brace,
}

impl Delim {
    pub fn open(self) -> &'static str {
        match self {
            Delim::Paren => "(",
            Delim::Bracket => "[",
            Delim::Brace => "{",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            Delim::Paren => ")",
            Delim::Bracket => "]",
            Delim::Brace => "}",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Tuple,
    Array,
    /// Struct literal, carrying the struct path.
    Struct(String),
}

/// What a [`NodeKind::Call`] applies its arguments to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    /// `path(args)`; the path names a function, never a variable.
    Path(String),
    /// `name!(args)`
    Macro { name: String, delim: Delim },
    /// `-a`, `!a`, `&mut a`, `..a`
    Prefix(String),
    /// `a + b`, `a as T`, `a = b`
    Infix(String),
    /// `a?`, `a.field`, `a.await`, `a..`
    Postfix(String),
    /// `a[b]`
    Index,
    /// `(expr)(args)`
    Expr(Box<Node>),
    /// `if a { b } else { c }`, `loop { .. }`: the keyword followed by its arguments,
    /// separated by spaces.
    Keyword(String),
    /// `{ pat => value, .. }` of a `match`.
    Arms,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Reference to a binding visible at the call site.
    Var(Name),
    /// Literal in its source spelling.
    Lit(String),
    /// Named item that is not a variable: constants, unit structs, variants, qualified paths.
    Path(String),
    Call {
        callee: Callee,
        args: Vec<Node>,
    },
    /// One pipeline step: `receiver.call(..)`. `call` is always a [`NodeKind::Call`].
    Pipe {
        receiver: Box<Node>,
        call: Box<Node>,
    },
    Block(Vec<Node>),
    Collection {
        kind: CollectionKind,
        items: Vec<Node>,
    },
    /// Labelled value, e.g. a struct literal field.
    Pair {
        label: Name,
        value: Box<Node>,
    },
    /// `let pattern = init` inside a block.
    Let {
        pattern: String,
        init: Option<Box<Node>>,
    },
    Paren(Box<Node>),
    /// Fragment kept as canonical text; contributes no variables.
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Option<SourceSpan>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, span: None }
    }

    pub fn with_span(mut self, span: Option<SourceSpan>) -> Self {
        self.span = span;
        self
    }

    /// Attaches a span given as `(line, column)` pairs.
    pub fn spanned(self, lo: (usize, usize), hi: (usize, usize)) -> Self {
        self.with_span(Some(SourceSpan {
            lo: Pos::new(lo.0, lo.1),
            hi: Pos::new(hi.0, hi.1),
        }))
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn span(&self) -> Option<SourceSpan> {
        self.span
    }

    pub fn var(name: impl Into<Name>) -> Self {
        Self::new(NodeKind::Var(name.into()))
    }

    pub fn lit(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Lit(text.into()))
    }

    pub fn path(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Path(text.into()))
    }

    pub fn verbatim(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Verbatim(text.into()))
    }

    pub fn call(callee: Callee, args: Vec<Node>) -> Self {
        Self::new(NodeKind::Call { callee, args })
    }

    pub fn call_path(path: impl Into<String>, args: Vec<Node>) -> Self {
        Self::call(Callee::Path(path.into()), args)
    }

    pub fn infix(op: impl Into<String>, lhs: Node, rhs: Node) -> Self {
        Self::call(Callee::Infix(op.into()), vec![lhs, rhs])
    }

    pub fn keyword(keyword: impl Into<String>, parts: Vec<Node>) -> Self {
        Self::call(Callee::Keyword(keyword.into()), parts)
    }

    pub fn pipe(receiver: Node, call: Node) -> Self {
        Self::new(NodeKind::Pipe {
            receiver: Box::new(receiver),
            call: Box::new(call),
        })
    }

    /// `receiver.method(args)` with no span on the call part.
    pub fn method(receiver: Node, method: impl Into<String>, args: Vec<Node>) -> Self {
        Self::pipe(receiver, Self::call_path(method, args))
    }

    pub fn block(nodes: Vec<Node>) -> Self {
        Self::new(NodeKind::Block(nodes))
    }

    pub fn collection(kind: CollectionKind, items: Vec<Node>) -> Self {
        Self::new(NodeKind::Collection { kind, items })
    }

    pub fn tuple(items: Vec<Node>) -> Self {
        Self::collection(CollectionKind::Tuple, items)
    }

    pub fn array(items: Vec<Node>) -> Self {
        Self::collection(CollectionKind::Array, items)
    }

    pub fn pair(label: impl Into<Name>, value: Node) -> Self {
        Self::new(NodeKind::Pair {
            label: label.into(),
            value: Box::new(value),
        })
    }

    pub fn let_(pattern: impl Into<String>, init: Option<Node>) -> Self {
        Self::new(NodeKind::Let {
            pattern: pattern.into(),
            init: init.map(Box::new),
        })
    }

    pub fn paren(inner: Node) -> Self {
        Self::new(NodeKind::Paren(Box::new(inner)))
    }

    /// Calls, pipeline steps, blocks and parenthesized expressions.
    pub fn is_compound(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Call { .. } | NodeKind::Pipe { .. } | NodeKind::Block(_) | NodeKind::Paren(_)
        )
    }

    /// Direct children, in source order.
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Var(_) | NodeKind::Lit(_) | NodeKind::Path(_) | NodeKind::Verbatim(_) => {
                Vec::new()
            }
            NodeKind::Call { callee, args } => {
                let mut children = Vec::with_capacity(args.len() + 1);
                if let Callee::Expr(head) = callee {
                    children.push(head.as_ref());
                }
                children.extend(args.iter());
                children
            }
            NodeKind::Pipe { receiver, call } => vec![receiver.as_ref(), call.as_ref()],
            NodeKind::Block(nodes) => nodes.iter().collect(),
            NodeKind::Collection { items, .. } => items.iter().collect(),
            NodeKind::Pair { value, .. } => vec![value.as_ref()],
            NodeKind::Let { init, .. } => init.iter().map(|init| init.as_ref()).collect(),
            NodeKind::Paren(inner) => vec![inner.as_ref()],
        }
    }

    /// Pre-order traversal over the whole subtree.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }
}
