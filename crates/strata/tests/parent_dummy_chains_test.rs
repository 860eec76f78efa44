use strata::LayoutError;
use strata::graphlib::{EdgeKey, Graph, GraphError, GraphOptions};
use strata::model::{LayoutGraph, LayoutNode};
use strata::parent_dummy_chains::parent_dummy_chains;

fn new_graph() -> LayoutGraph {
    Graph::new(GraphOptions {
        compound: true,
        ..Default::default()
    })
}

fn cluster(g: &mut LayoutGraph, v: &str, min_rank: i32, max_rank: i32) {
    let node = g.node_mut(v).unwrap();
    node.min_rank = Some(min_rank);
    node.max_rank = Some(max_rank);
}

/// Adds the dummy chain `v -> dummies... -> w` with the given dummy ranks.
fn chain(g: &mut LayoutGraph, v: &str, w: &str, dummies: &[(&str, i32)]) {
    for (d, rank) in dummies {
        g.set_node(
            *d,
            LayoutNode {
                rank: Some(*rank),
                edge_obj: Some(EdgeKey::unnamed(v, w)),
                ..Default::default()
            },
        );
    }
    g.graph_mut().dummy_chains = vec![dummies[0].0.to_string()];
    let mut path = vec![v];
    path.extend(dummies.iter().map(|(d, _)| *d));
    path.push(w);
    g.set_path(&path);
}

#[test]
fn parent_dummy_chains_leaves_dummies_at_the_root_when_endpoints_are() {
    let mut g = new_graph();
    chain(&mut g, "a", "b", &[("d1", 1)]);

    parent_dummy_chains(&mut g).unwrap();
    assert_eq!(g.parent("d1"), None);
}

#[test]
fn parent_dummy_chains_uses_the_tail_cluster_first() {
    let mut g = new_graph();
    g.set_parent("a", "sg1").unwrap();
    cluster(&mut g, "sg1", 0, 2);
    chain(&mut g, "a", "b", &[("d1", 2)]);

    parent_dummy_chains(&mut g).unwrap();
    assert_eq!(g.parent("d1"), Some("sg1"));
}

#[test]
fn parent_dummy_chains_uses_the_head_cluster_when_the_tail_is_at_the_root() {
    let mut g = new_graph();
    g.set_parent("b", "sg1").unwrap();
    cluster(&mut g, "sg1", 1, 3);
    chain(&mut g, "a", "b", &[("d1", 1)]);

    parent_dummy_chains(&mut g).unwrap();
    assert_eq!(g.parent("d1"), Some("sg1"));
}

#[test]
fn parent_dummy_chains_leaves_a_cluster_once_its_ranks_end() {
    let mut g = new_graph();
    g.set_parent("a", "sg1").unwrap();
    cluster(&mut g, "sg1", 0, 2);
    chain(&mut g, "a", "b", &[("d1", 2), ("d2", 3), ("d3", 4)]);

    parent_dummy_chains(&mut g).unwrap();
    assert_eq!(g.parent("d1"), Some("sg1"));
    assert_eq!(g.parent("d2"), None);
    assert_eq!(g.parent("d3"), None);
}

#[test]
fn parent_dummy_chains_enters_a_cluster_once_its_ranks_start() {
    let mut g = new_graph();
    g.set_parent("b", "sg1").unwrap();
    cluster(&mut g, "sg1", 3, 5);
    chain(&mut g, "a", "b", &[("d1", 1), ("d2", 2), ("d3", 3)]);

    parent_dummy_chains(&mut g).unwrap();
    assert_eq!(g.parent("d1"), None);
    assert_eq!(g.parent("d2"), None);
    assert_eq!(g.parent("d3"), Some("sg1"));
}

#[test]
fn parent_dummy_chains_climbs_and_descends_nested_clusters() {
    let mut g = new_graph();
    g.set_parent("a", "sg2").unwrap();
    g.set_parent("sg2", "sg1").unwrap();
    g.set_parent("b", "sg4").unwrap();
    g.set_parent("sg4", "sg3").unwrap();
    cluster(&mut g, "sg1", 0, 4);
    cluster(&mut g, "sg2", 1, 3);
    cluster(&mut g, "sg3", 6, 10);
    cluster(&mut g, "sg4", 7, 9);
    chain(
        &mut g,
        "a",
        "b",
        &[("d1", 3), ("d2", 4), ("d3", 5), ("d4", 6), ("d5", 7)],
    );

    parent_dummy_chains(&mut g).unwrap();
    assert_eq!(g.parent("d1"), Some("sg2"));
    assert_eq!(g.parent("d2"), Some("sg1"));
    assert_eq!(g.parent("d3"), None);
    assert_eq!(g.parent("d4"), Some("sg3"));
    assert_eq!(g.parent("d5"), Some("sg4"));
}

#[test]
fn parent_dummy_chains_handles_overlapping_rank_ranges() {
    let mut g = new_graph();
    g.set_parent("a", "sg1").unwrap();
    g.set_parent("b", "sg2").unwrap();
    cluster(&mut g, "sg1", 0, 3);
    cluster(&mut g, "sg2", 2, 6);
    chain(&mut g, "a", "b", &[("d1", 2), ("d2", 3), ("d3", 4)]);

    parent_dummy_chains(&mut g).unwrap();
    assert_eq!(g.parent("d1"), Some("sg1"));
    assert_eq!(g.parent("d2"), Some("sg1"));
    assert_eq!(g.parent("d3"), Some("sg2"));
}

#[test]
fn parent_dummy_chains_stops_at_a_common_ancestor_cluster() {
    let mut g = new_graph();
    g.set_parent("a", "sg1").unwrap();
    g.set_parent("sg2", "sg1").unwrap();
    g.set_parent("b", "sg2").unwrap();
    cluster(&mut g, "sg1", 0, 6);
    cluster(&mut g, "sg2", 3, 5);
    chain(&mut g, "a", "b", &[("d1", 2), ("d2", 3)]);

    parent_dummy_chains(&mut g).unwrap();
    assert_eq!(g.parent("d1"), Some("sg1"));
    assert_eq!(g.parent("d2"), Some("sg2"));
}

#[test]
fn parent_dummy_chains_reports_a_containment_cycle() {
    let mut g = new_graph();
    chain(&mut g, "a", "b", &[("d1", 1)]);
    g.set_parent("a", "sg1").unwrap();
    g.set_parent("sg1", "d1").unwrap();
    cluster(&mut g, "sg1", 0, 2);

    let err = parent_dummy_chains(&mut g).unwrap_err();
    assert!(
        matches!(&err, LayoutError::Graph(GraphError::ContainmentCycle { child, parent }) if child == "d1" && parent == "sg1"),
        "{err:?}"
    );
}
