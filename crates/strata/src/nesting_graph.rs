//! Nesting graph for compound layouts.
//!
//! Adds a root node plus a top and bottom border node per cluster, linked by weighted
//! "nesting" edges, so that ranking keeps each cluster's members between its borders and the
//! ranker sees one connected graph. Original minlens are scaled by the node separation
//! (`2 * height + 1`, where height is the depth of the nesting tree) to leave room for the
//! borders.

use crate::Result;
use crate::graphlib::EdgeKey;
use crate::model::{Dummy, LayoutEdge, LayoutGraph, LayoutNode};
use crate::util::{add_border_node, add_dummy_node};
use rustc_hash::FxHashMap as HashMap;

pub fn run(g: &mut LayoutGraph) -> Result<()> {
    let root = add_dummy_node(g, Dummy::Root, LayoutNode::default(), "_root");
    let depths = tree_depths(g);
    let height = depths.values().copied().max().unwrap_or(1).saturating_sub(1);
    let node_sep = 2 * height + 1;

    g.graph_mut().nesting_root = Some(root.clone());
    g.for_each_edge_mut(|_, e| e.minlen *= node_sep);

    let mut total_weight = 0.0;
    g.for_each_edge(|_, e| total_weight += e.weight);
    let weight = total_weight + 1.0;

    for v in nesting_postorder(g) {
        if v == root {
            continue;
        }
        let children: Vec<String> = g.children(&v).into_iter().map(str::to_string).collect();
        if children.is_empty() {
            g.set_edge_with_label(root.clone(), v, nesting_edge(0.0, node_sep));
            continue;
        }

        let top = add_border_node(g, "_bt", None);
        let bottom = add_border_node(g, "_bb", None);
        g.set_parent(top.clone(), v.clone())?;
        g.set_parent(bottom.clone(), v.clone())?;
        if let Some(node) = g.node_mut(&v) {
            node.border_top = Some(top.clone());
            node.border_bottom = Some(bottom.clone());
        }

        let depth = depths.get(&v).copied().unwrap_or(1);
        for child in children {
            let (child_top, child_bottom, is_cluster) = match g.node(&child) {
                Some(node) => (
                    node.border_top.clone().unwrap_or_else(|| child.clone()),
                    node.border_bottom.clone().unwrap_or_else(|| child.clone()),
                    node.border_top.is_some(),
                ),
                None => (child.clone(), child.clone(), false),
            };
            let this_weight = if is_cluster { weight } else { 2.0 * weight };
            let minlen = if child_top != child_bottom {
                1
            } else {
                height.saturating_sub(depth) + 1
            };
            g.set_edge_with_label(top.clone(), child_top, nesting_edge(this_weight, minlen));
            g.set_edge_with_label(child_bottom, bottom.clone(), nesting_edge(this_weight, minlen));
        }

        if g.parent(&v).is_none() {
            g.set_edge_with_label(root.clone(), top, nesting_edge(0.0, height + depth));
        }
    }

    g.graph_mut().node_rank_factor = Some(node_sep);
    Ok(())
}

/// Removes the root and every nesting edge.
pub fn cleanup(g: &mut LayoutGraph) {
    if let Some(root) = g.graph_mut().nesting_root.take() {
        g.remove_node(&root);
    }

    let mut nesting: Vec<EdgeKey> = Vec::new();
    g.for_each_edge(|key, e| {
        if e.nesting_edge {
            nesting.push(key.clone());
        }
    });
    for key in nesting {
        g.remove_edge_key(&key);
    }
}

/// Gives every cluster the rank span between its top and bottom border nodes, and records the
/// largest one on the graph.
pub fn assign_rank_min_max(g: &mut LayoutGraph) {
    let mut max_rank = 0;
    for v in g.node_ids() {
        let Some(node) = g.node(&v) else {
            continue;
        };
        let (Some(top), Some(bottom)) = (node.border_top.as_deref(), node.border_bottom.as_deref()) else {
            continue;
        };
        let min_rank = g.node(top).and_then(|n| n.rank);
        let cluster_max = g.node(bottom).and_then(|n| n.rank);
        if let Some(r) = cluster_max {
            max_rank = max_rank.max(r);
        }
        if let Some(n) = g.node_mut(&v) {
            n.min_rank = min_rank;
            n.max_rank = cluster_max;
        }
    }
    g.graph_mut().max_rank = Some(max_rank);
}

fn nesting_edge(weight: f64, minlen: usize) -> LayoutEdge {
    LayoutEdge {
        weight,
        minlen,
        nesting_edge: true,
        ..Default::default()
    }
}

/// Depth of every node in the nesting tree; top-level nodes have depth 1.
fn tree_depths(g: &LayoutGraph) -> HashMap<String, usize> {
    let mut depths: HashMap<String, usize> = HashMap::default();
    let mut stack: Vec<(String, usize)> = g
        .children_root()
        .into_iter()
        .map(|v| (v.to_string(), 1))
        .collect();
    while let Some((v, depth)) = stack.pop() {
        for child in g.children(&v) {
            stack.push((child.to_string(), depth + 1));
        }
        depths.insert(v, depth);
    }
    depths
}

/// Nodes of the nesting tree, each after all of its descendants.
fn nesting_postorder(g: &LayoutGraph) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(g.node_count());
    for top in g.children_root() {
        let mut stack: Vec<(&str, Vec<&str>, usize)> = vec![(top, g.children(top), 0)];
        while let Some((v, children, i)) = stack.last_mut() {
            if let Some(&child) = children.get(*i) {
                *i += 1;
                stack.push((child, g.children(child), 0));
            } else {
                out.push(v.to_string());
                stack.pop();
            }
        }
    }
    out
}
