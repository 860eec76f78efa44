//! Helpers shared by several pipeline stages.

use crate::graphlib::{Graph, GraphOptions};
use crate::model::{Dummy, LayoutEdge, LayoutGraph, LayoutNode, Point};
use crate::Result;
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn of(node: &LayoutNode) -> Self {
        Self {
            x: node.x.unwrap_or(0.0),
            y: node.y.unwrap_or(0.0),
            width: node.width,
            height: node.height,
        }
    }
}

/// Copy of `g` without parallel edges: each `v -> w` pair keeps the summed weight and the
/// largest minlen of the edges it replaces.
pub fn simplify(g: &LayoutGraph) -> LayoutGraph {
    let mut simplified: LayoutGraph = Graph::new(GraphOptions::default());
    simplified.set_graph(g.graph().clone());
    g.for_each_node(|v, label| {
        simplified.set_node(v, label.clone());
    });

    g.for_each_edge(|e, label| {
        let merged = match simplified.edge(&e.v, &e.w, None) {
            Some(prev) => LayoutEdge::new(prev.weight + label.weight, prev.minlen.max(label.minlen)),
            None => LayoutEdge::new(label.weight, label.minlen),
        };
        simplified.set_edge_with_label(e.v.clone(), e.w.clone(), merged);
    });

    simplified
}

/// Copy of `g` without nesting: cluster nodes (nodes with children) are dropped along with
/// any edge touching them.
pub fn as_non_compound_graph(g: &LayoutGraph) -> Result<LayoutGraph> {
    let mut flat: LayoutGraph = Graph::new(GraphOptions {
        multigraph: g.is_multigraph(),
        ..Default::default()
    });
    flat.set_graph(g.graph().clone());

    for v in g.nodes() {
        if !g.children(v).is_empty() {
            continue;
        }
        if let Some(label) = g.node(v) {
            flat.set_node(v, label.clone());
        }
    }

    for e in g.edges() {
        if !flat.has_node(&e.v) || !flat.has_node(&e.w) {
            continue;
        }
        if let Some(label) = g.edge_by_key(e) {
            flat.set_edge_key(e.clone(), label.clone())?;
        }
    }

    Ok(flat)
}

/// Point where the segment from the rectangle's center toward `point` leaves the rectangle.
pub fn intersect_rect(rect: Rect, point: Point) -> Point {
    let dx = point.x - rect.x;
    let dy = point.y - rect.y;
    let mut w = rect.width / 2.0;
    let mut h = rect.height / 2.0;

    // A point at the center has no direction; use the right side.
    if dx == 0.0 && dy == 0.0 {
        return Point {
            x: rect.x + w,
            y: rect.y,
        };
    }

    let (sx, sy) = if dy.abs() * w > dx.abs() * h {
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };

    Point {
        x: rect.x + sx,
        y: rect.y + sy,
    }
}

/// Node ids grouped by rank (index = rank) and sorted by order within each rank.
pub fn build_layer_matrix(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut layers: Vec<Vec<(usize, String)>> = Vec::new();
    g.for_each_node(|v, node| {
        let Some(rank) = node.rank else {
            return;
        };
        let idx = rank.max(0) as usize;
        if layers.len() <= idx {
            layers.resize_with(idx + 1, Vec::new);
        }
        layers[idx].push((node.order.unwrap_or(0), v.to_string()));
    });

    layers
        .into_iter()
        .map(|mut layer| {
            layer.sort_by_key(|(order, _)| *order);
            layer.into_iter().map(|(_, v)| v).collect()
        })
        .collect()
}

pub fn max_rank(g: &LayoutGraph) -> Option<i32> {
    let mut max: Option<i32> = None;
    g.for_each_node(|_, node| {
        if let Some(rank) = node.rank {
            max = Some(max.map_or(rank, |m| m.max(rank)));
        }
    });
    max
}

/// Shifts ranks so the smallest is 0.
pub fn normalize_ranks(g: &mut LayoutGraph) {
    let mut min_rank = i32::MAX;
    g.for_each_node(|_, node| {
        if let Some(rank) = node.rank {
            min_rank = min_rank.min(rank);
        }
    });
    if min_rank == i32::MAX {
        return;
    }
    g.for_each_node_mut(|_, node| {
        if let Some(rank) = node.rank.as_mut() {
            *rank -= min_rank;
        }
    });
}

/// Collapses ranks that hold no nodes, except those on the nesting rank grid
/// (multiples of the node rank factor), which keep cluster borders apart.
pub fn remove_empty_ranks(g: &mut LayoutGraph) {
    let Some(factor) = g.graph().node_rank_factor.filter(|&f| f > 0) else {
        return;
    };

    let mut offset = i32::MAX;
    g.for_each_node(|_, node| {
        if let Some(rank) = node.rank {
            offset = offset.min(rank);
        }
    });
    if offset == i32::MAX {
        return;
    }

    let mut layers: Vec<Vec<String>> = Vec::new();
    g.for_each_node(|v, node| {
        let Some(rank) = node.rank else {
            return;
        };
        let idx = (rank - offset) as usize;
        if layers.len() <= idx {
            layers.resize_with(idx + 1, Vec::new);
        }
        layers[idx].push(v.to_string());
    });

    let mut delta = 0i32;
    for (i, layer) in layers.iter().enumerate() {
        if layer.is_empty() && i % factor != 0 {
            delta -= 1;
            continue;
        }
        if delta == 0 {
            continue;
        }
        for v in layer {
            if let Some(rank) = g.node_mut(v).and_then(|n| n.rank.as_mut()) {
                *rank += delta;
            }
        }
    }
}

/// Adds a synthetic node with an id derived from `prefix` that is not yet in the graph.
pub fn add_dummy_node(g: &mut LayoutGraph, kind: Dummy, mut label: LayoutNode, prefix: &str) -> String {
    let mut n = g.node_count();
    let mut v = format!("{prefix}{n}");
    while g.has_node(&v) {
        n += 1;
        v = format!("{prefix}{n}");
    }
    label.dummy = Some(kind);
    g.set_node(v.clone(), label);
    v
}

/// Adds a zero-sized border node, optionally pinned to `rank`.
pub fn add_border_node(g: &mut LayoutGraph, prefix: &str, rank: Option<i32>) -> String {
    let label = LayoutNode {
        rank,
        ..Default::default()
    };
    add_dummy_node(g, Dummy::Border, label, prefix)
}

/// Index of every node id in `ids`.
pub(crate) fn positions<'a>(ids: impl IntoIterator<Item = &'a String>) -> HashMap<&'a str, usize> {
    ids.into_iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect()
}
