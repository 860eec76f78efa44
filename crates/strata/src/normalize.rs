//! Long-edge normalization.
//!
//! [`run`] replaces every edge spanning more than one rank with a chain of unit-length edges
//! through one [`Dummy::Edge`] node per intermediate rank. Each dummy remembers the original
//! edge key and label, and the first dummy of each chain is recorded on the graph label.
//! [`undo`] removes the chains again and turns the dummies' positions into the original
//! edge's route points.

use crate::Result;
use crate::graphlib::EdgeKey;
use crate::model::{Dummy, LayoutEdge, LayoutGraph, LayoutNode, Point};
use crate::util::add_dummy_node;

pub fn run(g: &mut LayoutGraph) -> Result<()> {
    g.graph_mut().dummy_chains.clear();
    for e in g.edge_keys() {
        normalize_edge(g, e)?;
    }
    tracing::debug!(chains = g.graph().dummy_chains.len(), "normalized long edges");
    Ok(())
}

fn normalize_edge(g: &mut LayoutGraph, e: EdgeKey) -> Result<()> {
    let rank = |v: &str| g.node(v).and_then(|n| n.rank);
    // Edges touching a cluster node have no ranked endpoint.
    let (Some(v_rank), Some(w_rank)) = (rank(&e.v), rank(&e.w)) else {
        return Ok(());
    };
    if w_rank <= v_rank + 1 {
        return Ok(());
    }

    let Some(mut label) = g.remove_edge_key(&e) else {
        return Ok(());
    };
    label.points.clear();
    let weight = label.weight;

    let mut prev = e.v.clone();
    for r in v_rank + 1..w_rank {
        let dummy = add_dummy_node(
            g,
            Dummy::Edge,
            LayoutNode {
                rank: Some(r),
                edge_obj: Some(e.clone()),
                edge_label: Some(label.clone()),
                ..Default::default()
            },
            "_d",
        );
        if r == v_rank + 1 {
            g.graph_mut().dummy_chains.push(dummy.clone());
        }
        g.set_edge_named(
            prev,
            dummy.clone(),
            e.name.clone(),
            Some(LayoutEdge::new(weight, 1)),
        )?;
        prev = dummy;
    }

    g.set_edge_named(prev, e.w.clone(), e.name.clone(), Some(LayoutEdge::new(weight, 1)))?;
    Ok(())
}

pub fn undo(g: &mut LayoutGraph) -> Result<()> {
    let chains = std::mem::take(&mut g.graph_mut().dummy_chains);
    for start in chains {
        let Some(node) = g.node(&start) else {
            continue;
        };
        let (Some(key), Some(mut label)) = (node.edge_obj.clone(), node.edge_label.clone()) else {
            continue;
        };

        let mut v = start;
        loop {
            let Some(node) = g.node(&v) else {
                break;
            };
            if node.dummy != Some(Dummy::Edge) {
                break;
            }
            if let (Some(x), Some(y)) = (node.x, node.y) {
                label.points.push(Point { x, y });
            }
            let next = g.successors(&v).first().map(|s| s.to_string());
            g.remove_node(&v);
            match next {
                Some(next) => v = next,
                None => break,
            }
        }

        g.set_edge_key(key, label)?;
    }
    Ok(())
}
