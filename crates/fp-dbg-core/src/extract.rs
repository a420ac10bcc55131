//! Free variable extraction.

use crate::ast::{Callee, Name, Node, NodeKind};
use itertools::Itertools;

/// Variables referenced by `node`, deduplicated, in first-seen order.
///
/// Call targets, struct labels, literals and verbatim fragments never contribute. Items
/// of a plain collection only contribute when they are bare variables (after unwrapping
/// one level of label).
pub fn variables(node: &Node) -> Vec<Name> {
    collect(node).into_iter().unique().collect()
}

fn collect(node: &Node) -> Vec<Name> {
    match node.kind() {
        NodeKind::Var(name) => vec![name.clone()],
        NodeKind::Call { callee, args } => {
            let mut vars = match callee {
                Callee::Expr(head) => collect(head),
                _ => Vec::new(),
            };
            vars.extend(collect_each(args.iter()));
            vars
        }
        NodeKind::Pipe { receiver, call } => {
            collect_each([receiver.as_ref(), call.as_ref()].into_iter())
        }
        NodeKind::Block(nodes) => collect_each(nodes.iter()),
        NodeKind::Paren(inner) => collect(inner),
        NodeKind::Let { init, .. } => init.as_deref().map(collect).unwrap_or_default(),
        NodeKind::Collection { items, .. } => match trailing_options(items) {
            Some(flattened) => collect_each(flattened.into_iter()),
            None => items.iter().filter_map(bare_var).cloned().collect(),
        },
        NodeKind::Pair { .. } | NodeKind::Lit(_) | NodeKind::Path(_) | NodeKind::Verbatim(_) => {
            Vec::new()
        }
    }
}

/// Each element is extracted on its own and the results are appended in order.
fn collect_each<'a>(nodes: impl Iterator<Item = &'a Node>) -> Vec<Name> {
    nodes.flat_map(|node| collect(unlabel(node))).collect()
}

/// `[call, [opts..]]` is read as `[call, opts..]`.
fn trailing_options(items: &[Node]) -> Option<Vec<&Node>> {
    let [head, tail] = items else {
        return None;
    };
    let NodeKind::Collection { items: options, .. } = tail.kind() else {
        return None;
    };
    if !head.is_compound() {
        return None;
    }
    Some(std::iter::once(head).chain(options.iter()).collect())
}

fn unlabel(node: &Node) -> &Node {
    match node.kind() {
        NodeKind::Pair { value, .. } => value,
        _ => node,
    }
}

fn bare_var(node: &Node) -> Option<&Name> {
    match unlabel(node).kind() {
        NodeKind::Var(name) => Some(name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CollectionKind;
    use pretty_assertions::assert_eq;

    fn names(vars: Vec<Name>) -> Vec<String> {
        vars.into_iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn bare_variable_is_its_own_reference() {
        assert_eq!(names(variables(&Node::var("x"))), vec!["x"]);
    }

    #[test]
    fn operands_in_reading_order() {
        let expr = Node::infix("+", Node::var("x"), Node::var("y"));
        assert_eq!(names(variables(&expr)), vec!["x", "y"]);
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        // y * x + x * y
        let expr = Node::infix(
            "+",
            Node::infix("*", Node::var("y"), Node::var("x")),
            Node::infix("*", Node::var("x"), Node::var("y")),
        );
        assert_eq!(names(variables(&expr)), vec!["y", "x"]);
    }

    #[test]
    fn call_targets_are_not_variables() {
        let expr = Node::call_path("compute", vec![Node::var("a"), Node::lit("1")]);
        assert_eq!(names(variables(&expr)), vec!["a"]);
    }

    #[test]
    fn computed_callee_comes_first() {
        let expr = Node::call(
            Callee::Expr(Box::new(Node::paren(Node::var("handler")))),
            vec![Node::var("event")],
        );
        assert_eq!(names(variables(&expr)), vec!["handler", "event"]);
    }

    #[test]
    fn pipeline_receiver_then_arguments() {
        let expr = Node::method(
            Node::method(Node::var("list"), "iter", vec![]),
            "fold",
            vec![Node::var("zero"), Node::verbatim("|acc, x| acc + x")],
        );
        assert_eq!(names(variables(&expr)), vec!["list", "zero"]);
    }

    #[test]
    fn struct_labels_are_dropped() {
        let expr = Node::collection(
            CollectionKind::Struct("Point".into()),
            vec![
                Node::pair("x", Node::var("left")),
                Node::pair("y", Node::var("y")),
            ],
        );
        assert_eq!(names(variables(&expr)), vec!["left", "y"]);
    }

    #[test]
    fn plain_collections_only_take_bare_variables() {
        let expr = Node::array(vec![
            Node::call_path("weight", vec![Node::var("a")]),
            Node::var("b"),
            Node::lit("3"),
        ]);
        assert_eq!(names(variables(&expr)), vec!["b"]);
    }

    #[test]
    fn collections_as_arguments_follow_collection_rules() {
        let expr = Node::call_path(
            "std::iter::once",
            vec![Node::tuple(vec![Node::var("zero"), Node::lit("0")])],
        );
        assert_eq!(names(variables(&expr)), vec!["zero"]);
    }

    #[test]
    fn call_with_trailing_options_is_flattened() {
        let expr = Node::tuple(vec![
            Node::call_path("open", vec![Node::var("path")]),
            Node::array(vec![
                Node::pair("mode", Node::var("mode")),
                Node::call_path("timeout", vec![Node::var("secs")]),
            ]),
        ]);
        assert_eq!(names(variables(&expr)), vec!["path", "mode", "secs"]);
    }

    #[test]
    fn block_lets_contribute_their_initializers() {
        let expr = Node::block(vec![
            Node::let_("doubled", Some(Node::infix("*", Node::var("x"), Node::lit("2")))),
            Node::infix("+", Node::verbatim("doubled"), Node::var("offset")),
        ]);
        assert_eq!(names(variables(&expr)), vec!["x", "offset"]);
    }

    #[test]
    fn keyword_forms_descend_into_every_part() {
        // for n in items { total += n * step }
        let expr = Node::keyword(
            "for",
            vec![
                Node::infix("in", Node::verbatim("n"), Node::var("items")),
                Node::block(vec![Node::infix(
                    "+=",
                    Node::var("total"),
                    Node::infix("*", Node::verbatim("n"), Node::var("step")),
                )]),
            ],
        );
        assert_eq!(names(variables(&expr)), vec!["items", "total", "step"]);

        let arms = Node::call(
            Callee::Arms,
            vec![Node::infix("=>", Node::verbatim("Some(v)"), Node::var("bonus"))],
        );
        let expr = Node::keyword("match", vec![Node::var("slot"), arms]);
        assert_eq!(names(variables(&expr)), vec!["slot", "bonus"]);
    }

    #[test]
    fn leaves_without_variables() {
        for node in [
            Node::lit("\"text\""),
            Node::path("i32::MAX"),
            Node::verbatim("|x| x + 1"),
            Node::pair("label", Node::var("hidden")),
        ] {
            assert!(variables(&node).is_empty(), "{node:?}");
        }
    }
}
