//! Longest-path initial ranking and edge slack.

use crate::Result;
use crate::graphlib::{EdgeKey, alg};
use crate::model::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;

/// Ranks every node as high as its out-edges allow: sinks get rank 0 and every other node
/// sits `minlen` above its lowest successor, so ranks are zero or negative.
///
/// Fails with [`GraphError::Cycle`](crate::graphlib::GraphError::Cycle) on cyclic input.
pub fn longest_path(g: &mut LayoutGraph) -> Result<()> {
    let order = alg::topsort(g)?;

    let mut ranks: HashMap<String, i32> = HashMap::default();
    for v in order.iter().rev() {
        let rank = g
            .out_edges(v, None)
            .iter()
            .map(|e| {
                let minlen = g.edge_by_key(e).map_or(1, |label| label.minlen as i32);
                ranks.get(&e.w).copied().unwrap_or(0) - minlen
            })
            .min()
            .unwrap_or(0);
        ranks.insert(v.clone(), rank);
    }

    g.for_each_node_mut(|v, node| {
        node.rank = ranks.get(v).copied();
    });
    Ok(())
}

/// How much longer the edge is than its minlen. Missing ranks count as 0.
pub fn slack(g: &LayoutGraph, e: &EdgeKey) -> i32 {
    let rank = |v: &str| g.node(v).and_then(|n| n.rank).unwrap_or(0);
    let minlen = g.edge_by_key(e).map_or(1, |label| label.minlen as i32);
    rank(&e.w) - rank(&e.v) - minlen
}
