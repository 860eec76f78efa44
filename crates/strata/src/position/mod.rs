//! Node coordinates.
//!
//! y comes from the rank: each rank sits below the previous one by the tallest node of that
//! rank plus `ranksep`. x comes from Brandes-Köpf ([`bk`]). Both run on a non-compound view of
//! the graph; clusters get their boxes later from their border nodes.

use crate::Result;
use crate::model::LayoutGraph;
use crate::util::{as_non_compound_graph, build_layer_matrix};

pub mod bk;

pub fn position(g: &mut LayoutGraph) -> Result<()> {
    let mut flat = as_non_compound_graph(g)?;
    position_y(&mut flat);
    let xs = bk::position_x(&flat);

    flat.for_each_node(|v, label| {
        if let Some(node) = g.node_mut(v) {
            node.y = label.y;
            node.x = xs.get(v).copied();
        }
    });
    Ok(())
}

pub fn position_y(g: &mut LayoutGraph) {
    let rank_sep = g.graph().config.ranksep;
    let mut prev_y = 0.0;
    for layer in build_layer_matrix(g) {
        let max_height = layer
            .iter()
            .filter_map(|v| g.node(v))
            .map(|n| n.height)
            .fold(0.0, f64::max);
        for v in &layer {
            if let Some(n) = g.node_mut(v) {
                n.y = Some(prev_y + max_height / 2.0);
            }
        }
        prev_y += max_height + rank_sep;
    }
}
