use strata::graphlib::{Graph, GraphOptions};
use strata::model::{LayoutGraph, LayoutNode};
use strata::rank::{feasible_tree, slack};

fn ranked(rank: i32) -> LayoutNode {
    LayoutNode {
        rank: Some(rank),
        ..Default::default()
    }
}

fn rank_of(g: &LayoutGraph, v: &str) -> i32 {
    g.node(v).and_then(|n| n.rank).unwrap()
}

fn new_graph() -> LayoutGraph {
    Graph::new(GraphOptions::default())
}

#[test]
fn feasible_tree_creates_a_tree_for_a_trivial_input_graph() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(1));
    g.set_edge("a", "b");

    let tree = feasible_tree(&mut g).unwrap();
    assert_eq!(rank_of(&g, "b"), rank_of(&g, "a") + 1);
    let mut nodes = tree.node_ids();
    nodes.sort();
    assert_eq!(nodes, vec!["a", "b"]);
    assert!(tree.has_edge("a", "b", None) || tree.has_edge("b", "a", None));
}

#[test]
fn feasible_tree_correctly_shortens_slack_by_pulling_a_node_up() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(1));
    g.set_node("c", ranked(2));
    g.set_node("d", ranked(2));
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "d");

    let tree = feasible_tree(&mut g).unwrap();
    assert_eq!(rank_of(&g, "b"), rank_of(&g, "a") + 1);
    assert_eq!(rank_of(&g, "c"), rank_of(&g, "b") + 1);
    assert_eq!(rank_of(&g, "d"), rank_of(&g, "a") + 1);
    assert_eq!(tree.edge_count(), 3);
}

#[test]
fn feasible_tree_correctly_shortens_slack_by_pulling_a_node_down() {
    let mut g = new_graph();
    g.set_node("a", ranked(2));
    g.set_node("b", ranked(0));
    g.set_node("c", ranked(2));
    g.set_edge("b", "a");
    g.set_edge("b", "c");

    feasible_tree(&mut g).unwrap();
    assert_eq!(rank_of(&g, "a"), rank_of(&g, "b") + 1);
    assert_eq!(rank_of(&g, "c"), rank_of(&g, "b") + 1);
}

#[test]
fn feasible_tree_edges_are_all_tight() {
    let mut g = new_graph();
    for (v, r) in [("a", 0), ("b", 3), ("c", 5), ("d", 6), ("e", 9)] {
        g.set_node(v, ranked(r));
    }
    g.set_path(&["a", "b", "c", "d", "e"]);
    g.set_edge("a", "e");
    g.set_edge("b", "d");

    let tree = feasible_tree(&mut g).unwrap();
    assert_eq!(tree.edge_count(), g.node_count() - 1);
    for e in tree.edges() {
        let key = g
            .edge_keys()
            .into_iter()
            .find(|k| (k.v == e.v && k.w == e.w) || (k.v == e.w && k.w == e.v))
            .unwrap();
        assert_eq!(slack(&g, &key), 0, "{key:?}");
    }
    for e in g.edges() {
        assert!(slack(&g, e) >= 0);
    }
}

#[test]
fn feasible_tree_builds_one_tree_per_component() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(2));
    g.set_node("c", ranked(0));
    g.set_node("d", ranked(1));
    g.set_edge("a", "b");
    g.set_edge("c", "d");

    let tree = feasible_tree(&mut g).unwrap();
    assert_eq!(tree.node_count(), 4);
    assert_eq!(tree.edge_count(), 2);
    assert_eq!(rank_of(&g, "b") - rank_of(&g, "a"), 1);
}
