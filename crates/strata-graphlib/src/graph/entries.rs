//! Internal storage entries for [`Graph`](super::Graph).

use super::EdgeKey;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Neighbor node index -> number of parallel edges to it, in first-seen order.
pub(in crate::graph) type Adjacency = IndexMap<usize, usize, FxBuildHasher>;

#[derive(Debug, Clone)]
pub(in crate::graph) struct NodeEntry<N> {
    pub(in crate::graph) id: String,
    pub(in crate::graph) label: N,
    pub(in crate::graph) in_edges: Vec<usize>,
    pub(in crate::graph) out_edges: Vec<usize>,
    pub(in crate::graph) preds: Adjacency,
    pub(in crate::graph) succs: Adjacency,
}

impl<N> NodeEntry<N> {
    pub(in crate::graph) fn new(id: String, label: N) -> Self {
        Self {
            id,
            label,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
            preds: Adjacency::default(),
            succs: Adjacency::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub(in crate::graph) struct EdgeEntry<E> {
    pub(in crate::graph) key: EdgeKey,
    pub(in crate::graph) v_ix: usize,
    pub(in crate::graph) w_ix: usize,
    pub(in crate::graph) label: E,
}

pub(in crate::graph) fn bump(adj: &mut Adjacency, ix: usize) {
    *adj.entry(ix).or_insert(0) += 1;
}

pub(in crate::graph) fn unbump(adj: &mut Adjacency, ix: usize) {
    let Some(count) = adj.get_mut(&ix) else {
        return;
    };
    *count -= 1;
    if *count == 0 {
        adj.shift_remove(&ix);
    }
}
