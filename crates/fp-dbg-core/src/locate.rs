use crate::ast::{Node, Pos};

/// Lines spanned by an expression. Both ends are `None` when no node carries a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceRange {
    pub line_min: Option<usize>,
    pub line_max: Option<usize>,
    /// Column of the leftmost token on `line_min`.
    pub column: Option<usize>,
}

impl SourceRange {
    pub fn lines(&self) -> Option<(usize, usize)> {
        Some((self.line_min?, self.line_max?))
    }
}

pub fn source_range(node: &Node) -> SourceRange {
    let mut first: Option<Pos> = None;
    let mut line_max: Option<usize> = None;
    node.walk(&mut |node| {
        let Some(span) = node.span() else {
            return;
        };
        first = Some(first.map_or(span.lo, |first| first.min(span.lo)));
        line_max = Some(line_max.map_or(span.hi.line, |max| max.max(span.hi.line)));
    });
    SourceRange {
        line_min: first.map(|pos| pos.line),
        line_max,
        column: first.map(|pos| pos.column),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nothing_positioned() {
        let expr = Node::infix("+", Node::var("a"), Node::var("b"));
        assert_eq!(source_range(&expr), SourceRange::default());
        assert_eq!(source_range(&expr).lines(), None);
    }

    #[test]
    fn spans_every_positioned_descendant() {
        // list
        //     .iter()
        //     .map(|x| {
        //         x + 1
        //     })
        let expr = Node::pipe(
            Node::method(Node::var("list").spanned((10, 12), (10, 16)), "iter", vec![])
                .spanned((10, 12), (11, 11)),
            Node::call_path(
                "map",
                vec![Node::verbatim("|x| { x + 1 }").spanned((12, 9), (14, 5))],
            )
            .spanned((12, 5), (14, 6)),
        );
        assert_eq!(
            source_range(&expr),
            SourceRange {
                line_min: Some(10),
                line_max: Some(14),
                column: Some(12),
            }
        );
    }

    #[test]
    fn unpositioned_nodes_do_not_widen_the_range() {
        let expr = Node::infix("*", Node::var("a").spanned((3, 4), (3, 5)), Node::lit("2"));
        assert_eq!(source_range(&expr).lines(), Some((3, 3)));
    }
}
