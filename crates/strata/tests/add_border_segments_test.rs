use strata::add_border_segments::add_border_segments;
use strata::graphlib::{Graph, GraphOptions};
use strata::model::{BorderType, Dummy, LayoutGraph};

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

fn border(g: &LayoutGraph, sg: &str, side: BorderType, rank: usize) -> String {
    let node = g.node(sg).unwrap();
    let column = match side {
        BorderType::Left => &node.border_left,
        BorderType::Right => &node.border_right,
    };
    column[rank].clone().unwrap()
}

#[test]
fn add_border_segments_ignores_graphs_without_clusters() {
    let mut g = new_graph();
    g.ensure_node("a");
    add_border_segments(&mut g).unwrap();
    assert_eq!(g.node_count(), 1);
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn add_border_segments_adds_one_pair_for_a_single_rank_cluster() {
    let mut g = new_graph();
    g.set_parent("a", "sg1").unwrap();
    cluster(&mut g, "sg1", 1, 1);
    add_border_segments(&mut g).unwrap();

    let node = g.node("sg1").unwrap();
    assert_eq!(node.border_left.len(), 2);
    assert_eq!(node.border_left[0], None);
    assert_eq!(node.border_right[0], None);

    for side in [BorderType::Left, BorderType::Right] {
        let b = border(&g, "sg1", side, 1);
        let label = g.node(&b).unwrap();
        assert_eq!(label.dummy, Some(Dummy::Border));
        assert_eq!(label.border_type, Some(side));
        assert_eq!(label.rank, Some(1));
        assert_eq!(label.width, 0.0);
        assert_eq!(g.parent(&b), Some("sg1"));
    }
}

#[test]
fn add_border_segments_chains_borders_across_ranks() {
    let mut g = new_graph();
    g.set_parent("a", "sg1").unwrap();
    cluster(&mut g, "sg1", 1, 3);
    add_border_segments(&mut g).unwrap();

    for side in [BorderType::Left, BorderType::Right] {
        for rank in 1..3 {
            let upper = border(&g, "sg1", side, rank);
            let lower = border(&g, "sg1", side, rank + 1);
            assert_eq!(g.node(&lower).unwrap().rank, Some(rank as i32 + 1));
            let e = g.edge(&upper, &lower, None).unwrap();
            assert_eq!(e.weight, 1.0);
            assert_eq!(e.minlen, 1);
        }
    }
    // 2 per rank across 3 ranks plus the cluster and its member.
    assert_eq!(g.node_count(), 8);
    assert_eq!(g.edge_count(), 4);
}

#[test]
fn add_border_segments_handles_nested_clusters() {
    let mut g = new_graph();
    g.set_parent("a", "sg2").unwrap();
    g.set_parent("sg2", "sg1").unwrap();
    cluster(&mut g, "sg1", 0, 2);
    cluster(&mut g, "sg2", 1, 1);
    add_border_segments(&mut g).unwrap();

    let inner = border(&g, "sg2", BorderType::Left, 1);
    assert_eq!(g.parent(&inner), Some("sg2"));
    for rank in 0..=2 {
        let outer = border(&g, "sg1", BorderType::Right, rank);
        assert_eq!(g.parent(&outer), Some("sg1"));
    }
}
