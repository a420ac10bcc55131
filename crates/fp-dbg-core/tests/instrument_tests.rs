use fp_dbg_core::ast::{CollectionKind, Node};
use fp_dbg_core::config::{BuildMode, Config, Options};
use fp_dbg_core::instrument::{instrument, Instrumentation, TextSource};
use fp_dbg_core::reconstruct::CallSite;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const SOURCE: &str = "fn main() {
    let list = vec![1, 2, 3];
    let zero = 0;
    list.iter()
        .map(|x| (*x, x * 2))
        .chain(std::iter::once((zero, 0)))
        .collect::<BTreeMap<_, _>>()
        .dbg(show_vars);
}
";

/// The chain on lines 4 to 7 of `SOURCE`.
fn chain() -> Node {
    let iter = Node::method(Node::var("list").spanned((4, 4), (4, 8)), "iter", vec![])
        .spanned((4, 4), (4, 15));
    let map = Node::pipe(
        iter,
        Node::call_path("map", vec![Node::verbatim("|x| (*x, x * 2)").spanned((5, 13), (5, 28))])
            .spanned((5, 9), (5, 29)),
    );
    let once = Node::call_path(
        "std::iter::once",
        vec![Node::tuple(vec![
            Node::var("zero").spanned((6, 32), (6, 36)),
            Node::lit("0").spanned((6, 38), (6, 39)),
        ])
        .spanned((6, 31), (6, 40))],
    )
    .spanned((6, 15), (6, 41));
    let chain = Node::pipe(map, Node::call_path("chain", vec![once]).spanned((6, 9), (6, 42)));
    Node::pipe(
        chain,
        Node::call_path("collect::<BTreeMap<_, _>>", vec![]).spanned((7, 9), (7, 36)),
    )
}

#[test]
fn multi_line_chain_keeps_its_layout() -> eyre::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("main.rs");
    fs::write(&path, SOURCE)?;
    let expr = chain();
    let site = CallSite::new(Some(path), 8);

    let out = instrument(&expr, &site, Options::show_vars(), &Config::default());
    let plan = out.plan().expect("trace plan");
    assert_eq!(plan.source, TextSource::Reconstructed);
    assert_eq!(
        plan.text,
        "  list.iter()\n      .map(|x| (*x, x * 2))\n      .chain(std::iter::once((zero, 0)))\n      .collect::<BTreeMap<_, _>>()"
    );
    let vars: Vec<_> = plan.vars.iter().map(|name| name.as_str()).collect();
    assert_eq!(vars, vec!["list", "zero"]);
    Ok(())
}

#[test]
fn without_the_file_the_chain_is_rendered() {
    let expr = chain();
    let site = CallSite::new(None, 8);
    let out = instrument(&expr, &site, Options::default(), &Config::default());
    let plan = out.plan().expect("trace plan");
    assert_eq!(plan.source, TextSource::Rendered);
    assert_eq!(
        plan.text,
        "  list\n      .iter()\n      .map(|x| (*x, x * 2))\n      .chain(std::iter::once((zero, 0)))\n      .collect::<BTreeMap<_, _>>()"
    );
    assert!(plan.vars.is_empty());
}

#[test]
fn instrumenting_twice_gives_the_same_plan() {
    let expr = Node::collection(
        CollectionKind::Struct("Point".into()),
        vec![Node::pair("x", Node::var("x")), Node::pair("y", Node::var("offset"))],
    );
    let site = CallSite::new(None, 1);
    let first = instrument(&expr, &site, Options::show_vars(), &Config::default());
    let second = instrument(&expr, &site, Options::show_vars(), &Config::default());
    assert_eq!(first, second);
}

#[test]
fn production_returns_the_input_node() {
    let expr = chain();
    let config = Config::default().with_mode(BuildMode::Production);
    for options in [Options::default(), Options::show_vars()] {
        let out = instrument(&expr, &CallSite::new(None, 8), options, &config);
        let Instrumentation::Bypass(node) = out else {
            panic!("production must bypass");
        };
        assert!(std::ptr::eq(node, &expr));
    }
}
