//! The layout entry point.
//!
//! [`layout`] copies the caller's graph into a [`LayoutGraph`], runs every stage in canonical
//! top-to-bottom orientation, and writes ranks, orders, coordinates and edge routes back.

use crate::Result;
use crate::graphlib::{Graph, GraphOptions};
use crate::model::{
    Dummy, EdgeLabel, GraphLabel, LayoutEdge, LayoutGraph, LayoutNode, LayoutState, NodeLabel, Point,
};
use crate::util::{self, Rect};
use crate::{
    acyclic, add_border_segments, coordinate_system, nesting_graph, normalize, order, parent_dummy_chains,
    position, rank, self_edges,
};

/// Lays out `g` in place.
///
/// Every node gets `rank`, `order`, `x` and `y` (cluster nodes get `x`, `y`, `width` and
/// `height` instead of a rank), every edge gets its route in `points`, and the graph label
/// gets the drawing's `width` and `height`.
pub fn layout(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) -> Result<()> {
    let _span = tracing::debug_span!("layout", nodes = g.node_count(), edges = g.edge_count()).entered();
    let mut lg = build_layout_graph(g)?;
    run_layout(&mut lg)?;
    update_input_graph(g, &lg);
    Ok(())
}

/// Runs one pipeline stage inside a span named after it.
macro_rules! stage {
    ($name:literal, $body:expr) => {{
        let _span = tracing::debug_span!($name).entered();
        $body
    }};
}

fn run_layout(g: &mut LayoutGraph) -> Result<()> {
    let compound = g.is_compound();

    stage!("self_edges", self_edges::remove_self_edges(g));
    stage!("acyclic", acyclic::run(g))?;
    if compound {
        stage!("nesting_graph", nesting_graph::run(g))?;
    }
    stage!("rank", rank_non_compound(g))?;
    stage!("remove_empty_ranks", util::remove_empty_ranks(g));
    if compound {
        stage!("nesting_cleanup", nesting_graph::cleanup(g));
    }
    util::normalize_ranks(g);
    nesting_graph::assign_rank_min_max(g);

    stage!("normalize", normalize::run(g))?;
    if compound {
        stage!("parent_dummy_chains", parent_dummy_chains::parent_dummy_chains(g))?;
        stage!("add_border_segments", add_border_segments::add_border_segments(g))?;
    }
    stage!("order", order::order(g))?;
    stage!("insert_self_edges", self_edges::insert_self_edges(g));

    coordinate_system::adjust(g);
    stage!("position", position::position(g))?;
    stage!("position_self_edges", self_edges::position_self_edges(g))?;
    if compound {
        remove_border_nodes(g);
    }
    stage!("normalize_undo", normalize::undo(g))?;
    coordinate_system::undo(g);

    translate_graph(g);
    assign_node_intersects(g);
    reverse_points_for_reversed_edges(g);
    stage!("acyclic_undo", acyclic::undo(g))?;
    Ok(())
}

/// Copies what the stages read from the caller's graph: sizes, weights, minimum lengths,
/// nesting and options.
pub fn build_layout_graph(input: &Graph<NodeLabel, EdgeLabel, GraphLabel>) -> Result<LayoutGraph> {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        directed: true,
        multigraph: true,
        compound: input.is_compound(),
    });
    g.set_graph(LayoutState {
        config: input.graph().clone(),
        ..Default::default()
    });

    input.for_each_node(|v, node| {
        g.set_node(v, LayoutNode::sized(node.width, node.height));
    });
    if input.is_compound() {
        for v in input.nodes() {
            if let Some(parent) = input.parent(v) {
                g.set_parent(v, parent)?;
            }
        }
    }
    for e in input.edges() {
        let Some(label) = input.edge_by_key(e) else {
            continue;
        };
        g.set_edge_key(e.clone(), LayoutEdge::new(label.weight, label.minlen))?;
    }

    Ok(g)
}

fn rank_non_compound(g: &mut LayoutGraph) -> Result<()> {
    let mut flat = util::as_non_compound_graph(g)?;
    rank::rank(&mut flat)?;
    flat.for_each_node(|v, node| {
        if let Some(n) = g.node_mut(v) {
            n.rank = node.rank;
        }
    });
    Ok(())
}

/// Sizes every cluster from its border nodes, then drops all border nodes.
fn remove_border_nodes(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if g.children(&v).is_empty() {
            continue;
        }
        let Some(node) = g.node(&v) else {
            continue;
        };
        let coord = |id: Option<&String>| g.node(id?.as_str()).and_then(|n| Some((n.x?, n.y?)));
        let top = coord(node.border_top.as_ref());
        let bottom = coord(node.border_bottom.as_ref());
        let left = coord(node.border_left.last().and_then(Option::as_ref));
        let right = coord(node.border_right.last().and_then(Option::as_ref));
        let (Some((_, ty)), Some((_, by)), Some((lx, _)), Some((rx, _))) = (top, bottom, left, right) else {
            continue;
        };

        if let Some(n) = g.node_mut(&v) {
            n.width = (rx - lx).abs();
            n.height = (by - ty).abs();
            n.x = Some(lx + n.width / 2.0);
            n.y = Some(ty + n.height / 2.0);
        }
    }

    for v in g.node_ids() {
        if g.node(&v).and_then(|n| n.dummy) == Some(Dummy::Border) {
            g.remove_node(&v);
        }
    }
}

/// Moves the drawing so its top-left corner sits at the margins and records its size.
fn translate_graph(g: &mut LayoutGraph) {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    g.for_each_node(|_, n| {
        let (Some(x), Some(y)) = (n.x, n.y) else {
            return;
        };
        min_x = min_x.min(x - n.width / 2.0);
        max_x = max_x.max(x + n.width / 2.0);
        min_y = min_y.min(y - n.height / 2.0);
        max_y = max_y.max(y + n.height / 2.0);
    });
    if !min_x.is_finite() {
        return;
    }

    let config = &g.graph().config;
    let (margin_x, margin_y) = (config.marginx, config.marginy);
    let dx = margin_x - min_x;
    let dy = margin_y - min_y;

    g.for_each_node_mut(|_, n| {
        if let Some(x) = n.x.as_mut() {
            *x += dx;
        }
        if let Some(y) = n.y.as_mut() {
            *y += dy;
        }
    });
    g.for_each_edge_mut(|_, e| {
        for p in &mut e.points {
            p.x += dx;
            p.y += dy;
        }
    });

    let state = g.graph_mut();
    state.width = max_x - min_x + 2.0 * margin_x;
    state.height = max_y - min_y + 2.0 * margin_y;
}

/// Clips every route to the boundaries of its endpoint nodes.
fn assign_node_intersects(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        let (Some(v), Some(w)) = (g.node(&e.v), g.node(&e.w)) else {
            continue;
        };
        let (v_rect, w_rect) = (Rect::of(v), Rect::of(w));
        let Some(label) = g.edge_mut_by_key(&e) else {
            continue;
        };
        let center = |r: Rect| Point { x: r.x, y: r.y };
        let toward_v = label.points.first().copied().unwrap_or(center(w_rect));
        let toward_w = label.points.last().copied().unwrap_or(center(v_rect));
        label.points.insert(0, util::intersect_rect(v_rect, toward_v));
        label.points.push(util::intersect_rect(w_rect, toward_w));
    }
}

fn reverse_points_for_reversed_edges(g: &mut LayoutGraph) {
    g.for_each_edge_mut(|_, e| {
        if e.reversed {
            e.points.reverse();
        }
    });
}

fn update_input_graph(input: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>, g: &LayoutGraph) {
    let compound = input.is_compound();
    for v in input.node_ids() {
        let Some(layout) = g.node(&v) else {
            continue;
        };
        let is_cluster = compound && !input.children(&v).is_empty();
        let Some(node) = input.node_mut(&v) else {
            continue;
        };
        node.x = layout.x;
        node.y = layout.y;
        node.rank = layout.rank;
        node.order = layout.order;
        if is_cluster {
            node.width = layout.width;
            node.height = layout.height;
        }
    }

    for e in input.edge_keys() {
        let Some(points) = g.edge_by_key(&e).map(|l| l.points.clone()) else {
            continue;
        };
        if let Some(label) = input.edge_mut_by_key(&e) {
            label.points = points;
        }
    }

    let state = g.graph();
    let label = input.graph_mut();
    label.width = state.width;
    label.height = state.height;
}
