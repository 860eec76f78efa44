//! Left/right cluster borders.
//!
//! Every cluster with a rank span gets one [`Dummy::Border`] node per rank on each side,
//! nested inside the cluster and chained top to bottom. Ordering then keeps the cluster's
//! members between its two border columns.

use crate::Result;
use crate::model::{BorderType, Dummy, LayoutEdge, LayoutGraph, LayoutNode};
use crate::util::add_dummy_node;

pub fn add_border_segments(g: &mut LayoutGraph) -> Result<()> {
    if !g.is_compound() {
        return Ok(());
    }

    for v in clusters_postorder(g) {
        let Some((min_rank, max_rank)) = g.node(&v).and_then(|n| Some((n.min_rank?, n.max_rank?)))
        else {
            continue;
        };

        let len = max_rank.max(0) as usize + 1;
        if let Some(n) = g.node_mut(&v) {
            n.border_left = vec![None; len];
            n.border_right = vec![None; len];
        }

        for rank in min_rank..=max_rank {
            add_border_node(g, &v, rank, BorderType::Left)?;
            add_border_node(g, &v, rank, BorderType::Right)?;
        }
    }
    Ok(())
}

fn add_border_node(g: &mut LayoutGraph, cluster: &str, rank: i32, side: BorderType) -> Result<()> {
    let column = |n: &LayoutNode| match side {
        BorderType::Left => n.border_left.clone(),
        BorderType::Right => n.border_right.clone(),
    };
    let prev = g
        .node(cluster)
        .map(column)
        .and_then(|col| col.get((rank - 1).max(0) as usize).cloned().flatten())
        .filter(|_| rank > 0);

    let prefix = match side {
        BorderType::Left => "_bl",
        BorderType::Right => "_br",
    };
    let label = LayoutNode {
        rank: Some(rank),
        border_type: Some(side),
        ..Default::default()
    };
    let curr = add_dummy_node(g, Dummy::Border, label, prefix);

    if let Some(n) = g.node_mut(cluster) {
        let col = match side {
            BorderType::Left => &mut n.border_left,
            BorderType::Right => &mut n.border_right,
        };
        let idx = rank.max(0) as usize;
        if col.len() <= idx {
            col.resize(idx + 1, None);
        }
        col[idx] = Some(curr.clone());
    }

    g.set_parent(curr.clone(), cluster.to_string())?;
    if let Some(prev) = prev {
        g.set_edge_with_label(prev, curr, LayoutEdge::new(1.0, 1));
    }
    Ok(())
}

/// Nodes with children, innermost first.
fn clusters_postorder(g: &LayoutGraph) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack: Vec<(&str, bool)> = g.children_root().into_iter().rev().map(|v| (v, false)).collect();
    while let Some((v, expanded)) = stack.pop() {
        let children = g.children(v);
        if children.is_empty() {
            continue;
        }
        if expanded {
            out.push(v.to_string());
            continue;
        }
        stack.push((v, true));
        stack.extend(children.into_iter().rev().map(|c| (c, false)));
    }
    out
}
