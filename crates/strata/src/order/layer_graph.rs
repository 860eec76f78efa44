//! Rank-local graphs for ordering sweeps.

use crate::Result;
use crate::graphlib::{Graph, GraphOptions};
use crate::model::LayoutGraph;

/// Which neighbor rank a sweep sorts against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// Predecessors on the rank above (downward sweep).
    InEdges,
    /// Successors on the rank below (upward sweep).
    OutEdges,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerNode {
    pub order: Option<usize>,
    /// Border nodes of a cluster on this rank.
    pub border_left: Option<String>,
    pub border_right: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerLabel {
    /// Synthetic parent of every top-level node of the rank.
    pub root: String,
}

/// Compound graph over one rank. Edges always point from the fixed neighbor rank into the
/// rank being sorted and carry the summed weight of the edges they stand for.
pub type LayerGraph = Graph<LayerNode, f64, LayerLabel>;

/// Builds the layer graph of `rank` over `nodes`, which must hold every node of the rank and
/// every cluster spanning it.
pub fn build_layer_graph(
    g: &LayoutGraph,
    rank: i32,
    relationship: Relationship,
    nodes: &[String],
) -> Result<LayerGraph> {
    let root = root_id(g);
    let mut lg: LayerGraph = Graph::new(GraphOptions {
        compound: true,
        ..Default::default()
    });
    lg.set_graph(LayerLabel { root: root.clone() });
    lg.set_node(root.clone(), LayerNode::default());

    for v in nodes {
        let Some(node) = g.node(v) else {
            continue;
        };

        let label = if node.min_rank.is_some() {
            let at = |col: &[Option<String>]| col.get(rank.max(0) as usize).cloned().flatten();
            LayerNode {
                order: node.order,
                border_left: at(&node.border_left),
                border_right: at(&node.border_right),
            }
        } else {
            LayerNode {
                order: node.order,
                ..Default::default()
            }
        };
        lg.set_node(v.clone(), label);
        let parent = g.parent(v).unwrap_or(root.as_str());
        lg.set_parent(v.clone(), parent.to_string())?;

        let edges = match relationship {
            Relationship::InEdges => g.in_edges(v, None),
            Relationship::OutEdges => g.out_edges(v, None),
        };
        for e in edges {
            let u = if e.v == *v { &e.w } else { &e.v };
            if !lg.has_node(u) {
                let order = g.node(u).and_then(|n| n.order);
                lg.set_node(u.clone(), LayerNode { order, ..Default::default() });
            }
            let weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
            let prev = lg.edge(u, v, None).copied().unwrap_or(0.0);
            lg.set_edge_with_label(u.clone(), v.clone(), prev + weight);
        }
    }

    Ok(lg)
}

fn root_id(g: &LayoutGraph) -> String {
    let mut n = 0usize;
    loop {
        let v = format!("_root{n}");
        if !g.has_node(&v) {
            return v;
        }
        n += 1;
    }
}
