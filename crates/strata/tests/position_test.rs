use strata::graphlib::{Graph, GraphOptions};
use strata::model::{Align, Dummy, GraphLabel, LayoutGraph, LayoutNode, LayoutState};
use strata::position::{bk, position, position_y};

fn new_graph(config: GraphLabel) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        ..Default::default()
    });
    g.set_graph(LayoutState {
        config,
        ..Default::default()
    });
    g
}

fn placed(rank: i32, order: usize, width: f64, height: f64) -> LayoutNode {
    LayoutNode {
        rank: Some(rank),
        order: Some(order),
        width,
        height,
        ..Default::default()
    }
}

fn x(g: &LayoutGraph, v: &str) -> f64 {
    g.node(v).unwrap().x.unwrap()
}

fn y(g: &LayoutGraph, v: &str) -> f64 {
    g.node(v).unwrap().y.unwrap()
}

#[test]
fn position_y_stacks_ranks_by_tallest_node_and_ranksep() {
    let mut g = new_graph(GraphLabel {
        ranksep: 1000.0,
        ..Default::default()
    });
    g.set_node("a", placed(0, 0, 50.0, 100.0));
    g.set_node("b", placed(0, 1, 50.0, 80.0));
    g.set_node("c", placed(1, 0, 50.0, 90.0));

    position_y(&mut g);
    assert_eq!(y(&g, "a"), 50.0);
    assert_eq!(y(&g, "b"), 50.0);
    assert_eq!(y(&g, "c"), 100.0 + 1000.0 + 45.0);
}

#[test]
fn position_places_a_single_node_at_the_origin() {
    let mut g = new_graph(GraphLabel::default());
    g.set_node("a", placed(0, 0, 50.0, 100.0));

    position(&mut g).unwrap();
    assert_eq!(x(&g, "a"), 0.0);
    assert_eq!(y(&g, "a"), 50.0);
}

#[test]
fn position_separates_nodes_in_a_rank_by_nodesep() {
    let mut g = new_graph(GraphLabel {
        nodesep: 1000.0,
        ..Default::default()
    });
    g.set_node("a", placed(0, 0, 50.0, 100.0));
    g.set_node("b", placed(0, 1, 70.0, 80.0));

    position(&mut g).unwrap();
    assert_eq!(x(&g, "b") - x(&g, "a"), 25.0 + 1000.0 + 35.0);
}

#[test]
fn position_separates_dummies_by_edgesep() {
    let mut g = new_graph(GraphLabel {
        nodesep: 100.0,
        edgesep: 20.0,
        ..Default::default()
    });
    g.set_node(
        "a",
        LayoutNode {
            dummy: Some(Dummy::Edge),
            ..placed(0, 0, 50.0, 0.0)
        },
    );
    g.set_node("b", placed(0, 1, 50.0, 10.0));

    position(&mut g).unwrap();
    // (50 + 20) / 2 on the dummy side, (50 + 100) / 2 on the node side.
    assert_eq!(x(&g, "b") - x(&g, "a"), 35.0 + 75.0);
}

#[test]
fn position_aligns_a_chain_vertically() {
    let mut g = new_graph(GraphLabel::default());
    g.set_node("a", placed(0, 0, 50.0, 40.0));
    g.set_node("b", placed(1, 0, 80.0, 40.0));
    g.set_edge("a", "b");

    position(&mut g).unwrap();
    assert_eq!(x(&g, "a"), x(&g, "b"));
    assert!(y(&g, "b") > y(&g, "a"));
}

#[test]
fn position_centers_a_parent_over_its_children() {
    let mut g = new_graph(GraphLabel {
        nodesep: 50.0,
        ..Default::default()
    });
    g.set_node("a", placed(0, 0, 50.0, 40.0));
    g.set_node("b", placed(1, 0, 50.0, 40.0));
    g.set_node("c", placed(1, 1, 50.0, 40.0));
    g.set_edge("a", "b");
    g.set_edge("a", "c");

    position(&mut g).unwrap();
    assert_eq!(x(&g, "c") - x(&g, "b"), 100.0);
    assert_eq!(x(&g, "a"), (x(&g, "b") + x(&g, "c")) / 2.0);
}

#[test]
fn position_honors_a_forced_alignment() {
    let mut g = new_graph(GraphLabel {
        nodesep: 50.0,
        align: Some(Align::UL),
        ..Default::default()
    });
    g.set_node("a", placed(0, 0, 50.0, 40.0));
    g.set_node("b", placed(1, 0, 50.0, 40.0));
    g.set_node("c", placed(1, 1, 50.0, 40.0));
    g.set_edge("a", "b");
    g.set_edge("a", "c");

    position(&mut g).unwrap();
    // Up-left packs the parent onto its leftmost child.
    assert_eq!(x(&g, "a"), x(&g, "b"));
    assert_eq!(x(&g, "c") - x(&g, "b"), 100.0);
}

#[test]
fn position_ignores_cluster_nodes() {
    let mut g = new_graph(GraphLabel::default());
    g.set_node("a", placed(0, 0, 50.0, 40.0));
    g.set_parent("a", "sg").unwrap();

    position(&mut g).unwrap();
    assert_eq!(x(&g, "a"), 0.0);
    assert_eq!(g.node("sg").unwrap().x, None);
}

#[test]
fn type1_conflicts_favor_inner_segments() {
    let mut g = new_graph(GraphLabel::default());
    // a -> d crosses the inner segment d1 -> d2.
    g.set_node("a", placed(0, 0, 10.0, 10.0));
    g.set_node(
        "d1",
        LayoutNode {
            dummy: Some(Dummy::Edge),
            ..placed(0, 1, 0.0, 0.0)
        },
    );
    g.set_node(
        "d2",
        LayoutNode {
            dummy: Some(Dummy::Edge),
            ..placed(1, 0, 0.0, 0.0)
        },
    );
    g.set_node("d", placed(1, 1, 10.0, 10.0));
    g.set_edge("a", "d");
    g.set_edge("d1", "d2");

    let layering = strata::util::build_layer_matrix(&g);
    let conflicts = bk::find_type1_conflicts(&g, &layering);
    assert!(conflicts.has("a", "d"));
    assert!(!conflicts.has("d1", "d2"));
}

#[test]
fn type1_conflicts_ignore_non_crossing_segments() {
    let mut g = new_graph(GraphLabel::default());
    g.set_node("a", placed(0, 0, 10.0, 10.0));
    g.set_node(
        "d1",
        LayoutNode {
            dummy: Some(Dummy::Edge),
            ..placed(0, 1, 0.0, 0.0)
        },
    );
    g.set_node("b", placed(1, 0, 10.0, 10.0));
    g.set_node(
        "d2",
        LayoutNode {
            dummy: Some(Dummy::Edge),
            ..placed(1, 1, 0.0, 0.0)
        },
    );
    g.set_edge("a", "b");
    g.set_edge("d1", "d2");

    let layering = strata::util::build_layer_matrix(&g);
    assert!(bk::find_type1_conflicts(&g, &layering).is_empty());
}

#[test]
fn vertical_alignment_joins_median_neighbors() {
    let mut g = new_graph(GraphLabel::default());
    g.set_node("a", placed(0, 0, 10.0, 10.0));
    g.set_node("b", placed(1, 0, 10.0, 10.0));
    g.set_edge("a", "b");

    let layering = strata::util::build_layer_matrix(&g);
    let alignment = bk::vertical_alignment(&layering, &bk::Conflicts::default(), |v| g.predecessors(v));
    assert_eq!(alignment.root["a"], "a");
    assert_eq!(alignment.root["b"], "a");
    assert_eq!(alignment.align["a"], "b");
    assert_eq!(alignment.align["b"], "a");
}

#[test]
fn vertical_alignment_respects_conflicts() {
    let mut g = new_graph(GraphLabel::default());
    g.set_node("a", placed(0, 0, 10.0, 10.0));
    g.set_node("b", placed(1, 0, 10.0, 10.0));
    g.set_edge("a", "b");

    let layering = strata::util::build_layer_matrix(&g);
    let mut conflicts = bk::Conflicts::default();
    conflicts.add("b", "a");
    let alignment = bk::vertical_alignment(&layering, &conflicts, |v| g.predecessors(v));
    assert_eq!(alignment.root["b"], "b");
    assert_eq!(alignment.align["a"], "a");
}
