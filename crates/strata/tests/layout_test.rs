use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strata::graphlib::{Graph, GraphOptions};
use strata::{
    Acyclicer, EdgeLabel, GraphLabel, LayoutError, NodeLabel, Point, RankDir, Ranker, build_layout_graph, layout,
};

type InputGraph = Graph<NodeLabel, EdgeLabel, GraphLabel>;

fn new_graph(config: GraphLabel) -> InputGraph {
    let mut g: InputGraph = Graph::new(GraphOptions {
        multigraph: true,
        ..Default::default()
    });
    g.set_graph(config);
    g
}

fn compound_graph(config: GraphLabel) -> InputGraph {
    let mut g: InputGraph = Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        ..Default::default()
    });
    g.set_graph(config);
    g
}

fn node<'a>(g: &'a InputGraph, v: &str) -> &'a NodeLabel {
    g.node(v).unwrap()
}

fn x(g: &InputGraph, v: &str) -> f64 {
    node(g, v).x.unwrap()
}

fn y(g: &InputGraph, v: &str) -> f64 {
    node(g, v).y.unwrap()
}

fn points(g: &InputGraph, v: &str, w: &str) -> Vec<Point> {
    g.edge(v, w, None).unwrap().points.clone()
}

fn minlen(n: usize) -> EdgeLabel {
    EdgeLabel {
        minlen: n,
        ..Default::default()
    }
}

#[test]
fn layout_of_an_empty_graph_is_empty() {
    let mut g = new_graph(GraphLabel::default());
    layout(&mut g).unwrap();
    assert_eq!(g.graph().width, 0.0);
    assert_eq!(g.graph().height, 0.0);
}

#[test]
fn layout_places_a_single_node_at_the_margins() {
    let mut g = new_graph(GraphLabel {
        marginx: 10.0,
        marginy: 20.0,
        ..Default::default()
    });
    g.set_node("a", NodeLabel::sized(50.0, 100.0));

    layout(&mut g).unwrap();
    assert_eq!(x(&g, "a"), 10.0 + 25.0);
    assert_eq!(y(&g, "a"), 20.0 + 50.0);
    assert_eq!(node(&g, "a").rank, Some(0));
    assert_eq!(node(&g, "a").order, Some(0));
    assert_eq!(g.graph().width, 50.0 + 2.0 * 10.0);
    assert_eq!(g.graph().height, 100.0 + 2.0 * 20.0);
}

#[test]
fn layout_stacks_a_chain_with_ranksep() {
    let mut g = new_graph(GraphLabel {
        ranksep: 40.0,
        ..Default::default()
    });
    g.set_node("a", NodeLabel::sized(50.0, 100.0));
    g.set_node("b", NodeLabel::sized(50.0, 100.0));
    g.set_edge("a", "b");

    layout(&mut g).unwrap();
    assert_eq!(x(&g, "a"), 25.0);
    assert_eq!(x(&g, "b"), 25.0);
    assert_eq!(y(&g, "a"), 50.0);
    assert_eq!(y(&g, "b"), 100.0 + 40.0 + 50.0);
    assert_eq!(
        points(&g, "a", "b"),
        vec![Point { x: 25.0, y: 100.0 }, Point { x: 25.0, y: 140.0 }]
    );
    assert_eq!(g.graph().height, 240.0);
}

#[test]
fn layout_routes_long_edges_through_every_rank() {
    let mut g = new_graph(GraphLabel::default());
    for v in ["a", "b", "c"] {
        g.set_node(v, NodeLabel::sized(50.0, 50.0));
    }
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "c");

    layout(&mut g).unwrap();
    assert_eq!(node(&g, "c").rank, Some(2));
    let route = points(&g, "a", "c");
    assert_eq!(route.len(), 3);
    assert_eq!(route[1].y, y(&g, "b"));
    assert!(route.windows(2).all(|p| p[0].y < p[1].y));
}

#[test]
fn layout_respects_minlen() {
    let mut g = new_graph(GraphLabel::default());
    g.set_node("a", NodeLabel::sized(10.0, 10.0));
    g.set_node("b", NodeLabel::sized(10.0, 10.0));
    g.set_edge_with_label("a", "b", minlen(3));

    layout(&mut g).unwrap();
    assert_eq!(node(&g, "b").rank.unwrap() - node(&g, "a").rank.unwrap(), 3);
    assert_eq!(points(&g, "a", "b").len(), 4);
}

#[test]
fn layout_separates_unconnected_nodes() {
    let mut g = new_graph(GraphLabel {
        nodesep: 30.0,
        ..Default::default()
    });
    g.set_node("a", NodeLabel::sized(50.0, 50.0));
    g.set_node("b", NodeLabel::sized(70.0, 50.0));

    layout(&mut g).unwrap();
    assert_eq!(y(&g, "a"), y(&g, "b"));
    assert_eq!((x(&g, "a") - x(&g, "b")).abs(), 25.0 + 30.0 + 35.0);
    assert_eq!(g.graph().width, 50.0 + 30.0 + 70.0);
}

#[test]
fn layout_left_to_right_swaps_axes() {
    let mut g = new_graph(GraphLabel {
        rankdir: RankDir::LR,
        ranksep: 50.0,
        ..Default::default()
    });
    g.set_node("a", NodeLabel::sized(50.0, 100.0));
    g.set_node("b", NodeLabel::sized(50.0, 100.0));
    g.set_edge("a", "b");

    layout(&mut g).unwrap();
    assert_eq!(node(&g, "a").width, 50.0);
    assert_eq!(y(&g, "a"), y(&g, "b"));
    assert_eq!(x(&g, "a"), 25.0);
    assert_eq!(x(&g, "b"), 50.0 + 50.0 + 25.0);
    assert_eq!(g.graph().width, 150.0);
    assert_eq!(g.graph().height, 100.0);
}

#[test]
fn layout_bottom_to_top_puts_sources_last() {
    let mut g = new_graph(GraphLabel {
        rankdir: RankDir::BT,
        ..Default::default()
    });
    g.set_node("a", NodeLabel::sized(50.0, 50.0));
    g.set_node("b", NodeLabel::sized(50.0, 50.0));
    g.set_edge("a", "b");

    layout(&mut g).unwrap();
    assert!(y(&g, "b") < y(&g, "a"));
    let route = points(&g, "a", "b");
    assert!(route[0].y > route[route.len() - 1].y);
}

#[test]
fn layout_right_to_left_puts_sources_right() {
    let mut g = new_graph(GraphLabel {
        rankdir: RankDir::RL,
        ..Default::default()
    });
    g.set_node("a", NodeLabel::sized(50.0, 50.0));
    g.set_node("b", NodeLabel::sized(50.0, 50.0));
    g.set_edge("a", "b");

    layout(&mut g).unwrap();
    assert!(x(&g, "b") < x(&g, "a"));
    assert_eq!(y(&g, "a"), y(&g, "b"));
}

#[test]
fn layout_handles_cycles_and_keeps_edge_directions() {
    let mut g = new_graph(GraphLabel::default());
    g.set_node("a", NodeLabel::sized(50.0, 100.0));
    g.set_node("b", NodeLabel::sized(50.0, 100.0));
    g.set_edge("a", "b");
    g.set_edge("b", "a");

    layout(&mut g).unwrap();
    assert_eq!(g.edge_count(), 2);
    assert_ne!(node(&g, "a").rank, node(&g, "b").rank);

    let forward = points(&g, "a", "b");
    let back = points(&g, "b", "a");
    assert!(forward[0].y < forward[forward.len() - 1].y);
    assert!(back[0].y > back[back.len() - 1].y);
}

#[test]
fn layout_with_greedy_acyclicer_handles_cycles() {
    let mut g = new_graph(GraphLabel {
        acyclicer: Acyclicer::Greedy,
        ..Default::default()
    });
    for v in ["a", "b", "c"] {
        g.set_node(v, NodeLabel::sized(20.0, 20.0));
    }
    g.set_path(&["a", "b", "c", "a"]);

    layout(&mut g).unwrap();
    assert!(g.has_edge("c", "a", None));
    assert!(g.edge_keys().iter().all(|e| !g.edge_by_key(e).unwrap().points.is_empty()));
}

#[test]
fn layout_draws_self_loops_beside_their_node() {
    let mut g = new_graph(GraphLabel::default());
    g.set_node("a", NodeLabel::sized(50.0, 50.0));
    g.set_node("b", NodeLabel::sized(50.0, 50.0));
    g.set_edge("a", "a");
    g.set_edge("a", "b");

    layout(&mut g).unwrap();
    assert_eq!(g.node_count(), 2);
    let route = points(&g, "a", "a");
    assert_eq!(route.len(), 7);
    let right = x(&g, "a") + 25.0;
    assert!(route[1..6].iter().all(|p| p.x >= right));
}

#[test]
fn layout_keeps_parallel_edges_apart() {
    let mut g = new_graph(GraphLabel::default());
    g.set_node("a", NodeLabel::sized(50.0, 50.0));
    g.set_node("b", NodeLabel::sized(50.0, 50.0));
    g.set_edge_with_label("a", "b", minlen(2));
    g.set_edge_named("a", "b", Some("x"), Some(minlen(2))).unwrap();

    layout(&mut g).unwrap();
    let plain = points(&g, "a", "b");
    let named = g.edge("a", "b", Some("x")).unwrap().points.clone();
    assert_eq!(plain.len(), 3);
    assert_eq!(named.len(), 3);
    assert_ne!(plain[1].x, named[1].x);
}

#[test]
fn layout_honors_every_ranker() {
    for ranker in [Ranker::NetworkSimplex, Ranker::TightTree, Ranker::LongestPath] {
        let mut g = new_graph(GraphLabel {
            ranker,
            ..Default::default()
        });
        for v in ["a", "b", "c", "d"] {
            g.set_node(v, NodeLabel::sized(20.0, 20.0));
        }
        g.set_path(&["a", "b", "d"]);
        g.set_edge_with_label("a", "c", minlen(2));
        g.set_edge("c", "d");

        layout(&mut g).unwrap();
        for e in g.edge_keys() {
            let (rv, rw) = (node(&g, &e.v).rank.unwrap(), node(&g, &e.w).rank.unwrap());
            let len = g.edge_by_key(&e).unwrap().minlen as i32;
            assert!(rw - rv >= len, "{ranker:?}: {e:?}");
        }
    }
}

#[test]
fn layout_boxes_clusters_around_their_members() {
    let mut g = compound_graph(GraphLabel::default());
    g.set_node("a", NodeLabel::sized(50.0, 50.0));
    g.set_node("b", NodeLabel::sized(30.0, 30.0));
    g.set_parent("a", "sg").unwrap();
    g.set_edge("a", "b");

    layout(&mut g).unwrap();
    let sg = node(&g, "sg");
    let a = node(&g, "a");
    let (sx, sy) = (sg.x.unwrap(), sg.y.unwrap());
    let (ax, ay) = (a.x.unwrap(), a.y.unwrap());
    assert!(sg.width >= 50.0);
    assert!(sg.height >= 50.0);
    assert!(sx - sg.width / 2.0 <= ax - 25.0);
    assert!(sx + sg.width / 2.0 >= ax + 25.0);
    assert!(sy - sg.height / 2.0 <= ay - 25.0);
    assert!(sy + sg.height / 2.0 >= ay + 25.0);
    assert_eq!(sg.rank, None);
    assert!(y(&g, "b") > ay);
}

fn assert_inside(g: &InputGraph, cluster: &str, member: &str) {
    let sg = node(g, cluster);
    let m = node(g, member);
    let (sx, sy) = (sg.x.unwrap(), sg.y.unwrap());
    let (mx, my) = (m.x.unwrap(), m.y.unwrap());
    let eps = 1e-6;
    assert!(
        sx - sg.width / 2.0 <= mx - m.width / 2.0 + eps && mx + m.width / 2.0 <= sx + sg.width / 2.0 + eps,
        "{member} x={mx} w={} outside {cluster} x={sx} w={}",
        m.width,
        sg.width
    );
    assert!(
        sy - sg.height / 2.0 <= my - m.height / 2.0 + eps && my + m.height / 2.0 <= sy + sg.height / 2.0 + eps,
        "{member} y={my} h={} outside {cluster} y={sy} h={}",
        m.height,
        sg.height
    );
}

#[test]
fn layout_keeps_members_inside_a_cluster_fed_from_outside() {
    let mut g = compound_graph(GraphLabel::default());
    for v in ["a", "b", "d"] {
        g.set_node(v, NodeLabel::sized(50.0, 50.0));
    }
    g.set_parent("a", "c").unwrap();
    g.set_parent("b", "c").unwrap();
    g.set_edge("a", "b");
    g.set_edge("d", "a");

    layout(&mut g).unwrap();
    assert!(node(&g, "c").width >= 50.0);
    assert_inside(&g, "c", "a");
    assert_inside(&g, "c", "b");
}

#[test]
fn layout_boxes_clusters_of_random_graphs_in_every_direction() {
    let mut rng = StdRng::seed_from_u64(0xc105);
    for rankdir in [RankDir::TB, RankDir::BT, RankDir::LR, RankDir::RL] {
        for _ in 0..25 {
            let mut g = compound_graph(GraphLabel {
                rankdir,
                ..Default::default()
            });
            let n = rng.gen_range(3..10);
            let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
            for v in &ids {
                g.set_node(
                    v.clone(),
                    NodeLabel::sized(rng.gen_range(10.0..60.0), rng.gen_range(10.0..60.0)),
                );
            }
            for i in 0..n {
                for j in i + 1..n {
                    if rng.gen_bool(0.3) {
                        g.set_edge(ids[i].clone(), ids[j].clone());
                    }
                }
            }

            let mut members: Vec<(String, String)> = Vec::new();
            for (i, v) in ids.iter().enumerate() {
                if rng.gen_bool(0.5) {
                    let cluster = format!("sg{}", i % 2);
                    g.set_parent(v.clone(), cluster.clone()).unwrap();
                    members.push((cluster, v.clone()));
                }
            }

            layout(&mut g).unwrap();
            for (cluster, member) in &members {
                assert_inside(&g, cluster, member);
            }
        }
    }
}

#[test]
fn layout_separates_same_rank_nodes_of_random_dags() {
    let mut rng = StdRng::seed_from_u64(0x5e9a);
    for _ in 0..60 {
        let nodesep = rng.gen_range(10.0..80.0);
        let mut g = new_graph(GraphLabel {
            nodesep,
            ..Default::default()
        });
        let n = rng.gen_range(2..14);
        let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        for v in &ids {
            g.set_node(v.clone(), NodeLabel::sized(rng.gen_range(5.0..90.0), 20.0));
        }
        for i in 0..n {
            for j in i + 1..n {
                if rng.gen_bool(0.25) {
                    g.set_edge_with_label(ids[i].clone(), ids[j].clone(), minlen(rng.gen_range(1..3)));
                }
            }
        }

        layout(&mut g).unwrap();
        let mut by_rank: Vec<Vec<(f64, f64)>> = Vec::new();
        for v in &ids {
            let label = node(&g, v);
            let rank = label.rank.unwrap() as usize;
            if by_rank.len() <= rank {
                by_rank.resize_with(rank + 1, Vec::new);
            }
            by_rank[rank].push((label.x.unwrap(), label.width));
        }
        for layer in &mut by_rank {
            layer.sort_by(|a, b| a.0.total_cmp(&b.0));
            for pair in layer.windows(2) {
                let ((x1, w1), (x2, w2)) = (pair[0], pair[1]);
                assert!(x2 - x1 >= w1 / 2.0 + w2 / 2.0 + nodesep - 1e-6, "{x1} and {x2} overlap");
            }
        }
    }
}

#[test]
fn layout_of_a_compound_graph_leaves_no_synthetic_nodes() {
    let mut g = compound_graph(GraphLabel::default());
    for v in ["a", "b", "c"] {
        g.set_node(v, NodeLabel::sized(40.0, 40.0));
    }
    g.set_parent("a", "sg1").unwrap();
    g.set_parent("b", "sg2").unwrap();
    g.set_parent("sg2", "sg1").unwrap();
    g.set_edge("a", "b");
    g.set_edge("c", "b");
    g.set_edge_with_label("c", "a", minlen(3));

    layout(&mut g).unwrap();
    assert_eq!(g.node_count(), 5);
    assert_eq!(g.edge_count(), 3);
    for v in ["a", "b", "c", "sg1", "sg2"] {
        assert!(node(&g, v).x.is_some(), "{v} has no x");
        assert!(node(&g, v).y.is_some(), "{v} has no y");
    }
    for e in g.edge_keys() {
        assert!(g.edge_by_key(&e).unwrap().points.len() >= 2);
    }
}

#[test]
fn build_layout_graph_copies_sizes_and_options() {
    let mut g = compound_graph(GraphLabel {
        nodesep: 7.0,
        ..Default::default()
    });
    g.set_node("a", NodeLabel::sized(5.0, 6.0));
    g.set_parent("a", "sg").unwrap();
    g.set_edge_with_label(
        "a",
        "b",
        EdgeLabel {
            weight: 2.0,
            minlen: 3,
            ..Default::default()
        },
    );

    let lg = build_layout_graph(&g).unwrap();
    assert!(lg.is_compound());
    assert!(lg.is_multigraph());
    assert_eq!(lg.graph().config.nodesep, 7.0);
    assert_eq!(lg.node("a").unwrap().width, 5.0);
    assert_eq!(lg.parent("a"), Some("sg"));
    let e = lg.edge("a", "b", None).unwrap();
    assert_eq!((e.weight, e.minlen), (2.0, 3));
}

#[test]
fn graph_label_parses_json_with_defaults() {
    let label = GraphLabel::from_json(r#"{"rankdir": "LR", "nodesep": 10}"#).unwrap();
    assert_eq!(label.rankdir, RankDir::LR);
    assert_eq!(label.nodesep, 10.0);
    assert_eq!(label.ranksep, 50.0);
    assert_eq!(label.edgesep, 20.0);
    assert_eq!(label.acyclicer, Acyclicer::Dfs);
    assert_eq!(label.ranker, Ranker::NetworkSimplex);

    let label = GraphLabel::from_json(r#"{"direction": "BT", "ranker": "longest-path", "acyclicer": "greedy"}"#)
        .unwrap();
    assert_eq!(label.rankdir, RankDir::BT);
    assert_eq!(label.ranker, Ranker::LongestPath);
    assert_eq!(label.acyclicer, Acyclicer::Greedy);

    assert_eq!(GraphLabel::from_json("{}").unwrap(), GraphLabel::default());
}

#[test]
fn graph_label_rejects_bad_options() {
    let err = GraphLabel::from_json(r#"{"rankdir": "XY"}"#).unwrap_err();
    assert!(matches!(err, LayoutError::Config(_)));
    assert!(!err.is_cycle());
    assert!(err.to_string().starts_with("invalid layout configuration"));
}
