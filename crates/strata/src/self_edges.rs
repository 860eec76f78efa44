//! Self-loops.
//!
//! Loops are taken out of the graph before ranking, stored on their node, and come back
//! after ordering as a [`Dummy::SelfEdge`] node placed right of the node. Positioning then
//! reserves room for the loop, and [`position_self_edges`] turns the dummy into a route.

use crate::Result;
use crate::model::{Dummy, LayoutGraph, LayoutNode, Point, SelfEdge};
use crate::util::{add_dummy_node, build_layer_matrix};

pub fn remove_self_edges(g: &mut LayoutGraph) {
    for key in g.edge_keys() {
        if !key.is_self_loop() {
            continue;
        }
        let Some(label) = g.remove_edge_key(&key) else {
            continue;
        };
        if let Some(n) = g.node_mut(&key.v) {
            n.self_edges.push(SelfEdge { key, label });
        }
    }
}

/// Re-inserts stored loops as dummy nodes following their node in its rank, shifting the
/// order of everything after them.
pub fn insert_self_edges(g: &mut LayoutGraph) {
    for layer in build_layer_matrix(g) {
        let mut shift = 0usize;
        for (i, v) in layer.iter().enumerate() {
            let Some(node) = g.node_mut(v) else {
                continue;
            };
            node.order = Some(i + shift);
            let rank = node.rank;
            let loops = std::mem::take(&mut node.self_edges);

            for SelfEdge { key, label } in loops {
                shift += 1;
                let dummy = LayoutNode {
                    rank,
                    order: Some(i + shift),
                    edge_obj: Some(key),
                    edge_label: Some(label),
                    ..Default::default()
                };
                add_dummy_node(g, Dummy::SelfEdge, dummy, "_se");
            }
        }
    }
}

/// Replaces each self-loop dummy with a five-point route around the right side of its node.
pub fn position_self_edges(g: &mut LayoutGraph) -> Result<()> {
    for v in g.node_ids() {
        let Some(node) = g.node(&v) else {
            continue;
        };
        if node.dummy != Some(Dummy::SelfEdge) {
            continue;
        }
        let (Some(key), Some(mut label)) = (node.edge_obj.clone(), node.edge_label.clone()) else {
            continue;
        };
        let dummy_x = node.x.unwrap_or(0.0);
        let Some(owner) = g.node(&key.v) else {
            continue;
        };

        let x = owner.x.unwrap_or(0.0) + owner.width / 2.0;
        let y = owner.y.unwrap_or(0.0);
        let dx = dummy_x - x;
        let dy = owner.height / 2.0;
        label.points = vec![
            Point { x: x + 2.0 * dx / 3.0, y: y - dy },
            Point { x: x + 5.0 * dx / 6.0, y: y - dy },
            Point { x: x + dx, y },
            Point { x: x + 5.0 * dx / 6.0, y: y + dy },
            Point { x: x + 2.0 * dx / 3.0, y: y + dy },
        ];

        g.remove_node(&v);
        g.set_edge_key(key, label)?;
    }
    Ok(())
}
