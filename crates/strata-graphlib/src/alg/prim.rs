use crate::{EdgeKey, Graph, GraphError, GraphOptions, Result};
use rustc_hash::FxHashMap as HashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Minimum spanning tree of an undirected view of `g`, returned as an undirected graph over
/// the same nodes.
///
/// Fails with [`GraphError::Disconnected`] when some node cannot be reached.
pub fn prim<N, E, G, W>(g: &Graph<N, E, G>, weight: W) -> Result<Graph<(), (), ()>>
where
    W: Fn(&EdgeKey) -> f64,
{
    let mut tree: Graph<(), (), ()> = Graph::new(GraphOptions {
        directed: false,
        ..Default::default()
    });
    let ids: Vec<&str> = g.nodes().collect();
    for &v in &ids {
        tree.ensure_node(v);
    }
    let Some(&first) = ids.first() else {
        return Ok(tree);
    };

    let pos: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    let mut best: Vec<f64> = vec![f64::INFINITY; ids.len()];
    let mut parent: Vec<Option<usize>> = vec![None; ids.len()];
    let mut in_tree: Vec<bool> = vec![false; ids.len()];
    let mut heap: BinaryHeap<Reverse<(OrdF64, usize)>> = BinaryHeap::new();
    let mut reached = 0usize;

    let start = pos.get(first).copied().unwrap_or(0);
    best[start] = 0.0;
    heap.push(Reverse((OrdF64(0.0), start)));

    while let Some(Reverse((_, ix))) = heap.pop() {
        if in_tree[ix] {
            continue;
        }
        in_tree[ix] = true;
        reached += 1;
        let v = ids[ix];
        if let Some(p) = parent[ix] {
            tree.set_edge(v, ids[p]);
        }

        for key in g.node_edges(v, None) {
            let Some(&w_ix) = pos.get(key.other(v)) else {
                continue;
            };
            if in_tree[w_ix] {
                continue;
            }
            let d = weight(&key);
            if d < best[w_ix] {
                best[w_ix] = d;
                parent[w_ix] = Some(ix);
                heap.push(Reverse((OrdF64(d), w_ix)));
            }
        }
    }

    if reached != ids.len() {
        return Err(GraphError::Disconnected);
    }
    Ok(tree)
}

#[derive(Clone, Copy, PartialEq)]
struct OrdF64(f64);

impl Eq for OrdF64 {}

impl PartialOrd for OrdF64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdF64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}
