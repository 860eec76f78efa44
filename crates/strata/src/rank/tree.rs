//! Index-addressed structures for the rank stage.
//!
//! [`RankGraph`] is a flattened copy of one connected component of the (simplified) layout
//! graph. [`SpanningTree`] is the tight spanning tree network simplex walks through; its tree
//! edges are indices into `RankGraph::edges`.

use crate::model::LayoutGraph;
use crate::util::positions;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RankEdge {
    pub v: usize,
    pub w: usize,
    pub minlen: i32,
    pub weight: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct RankGraph {
    pub ids: Vec<String>,
    pub rank: Vec<i32>,
    pub edges: Vec<RankEdge>,
    /// In-edges followed by out-edges, per node.
    pub incident: Vec<Vec<usize>>,
}

impl RankGraph {
    /// Copies the nodes in `ids` with their current ranks, and every edge between them.
    pub fn from_component(g: &LayoutGraph, ids: Vec<String>) -> Self {
        let pos = positions(&ids);
        let rank: Vec<i32> = ids
            .iter()
            .map(|v| g.node(v).and_then(|n| n.rank).unwrap_or(0))
            .collect();

        let mut edges: Vec<RankEdge> = Vec::new();
        g.for_each_edge(|e, label| {
            let (Some(&v), Some(&w)) = (pos.get(e.v.as_str()), pos.get(e.w.as_str())) else {
                return;
            };
            edges.push(RankEdge {
                v,
                w,
                minlen: label.minlen as i32,
                weight: label.weight,
            });
        });

        let mut ins: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
        let mut outs: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
        for (ix, e) in edges.iter().enumerate() {
            outs[e.v].push(ix);
            ins[e.w].push(ix);
        }
        let incident = ins
            .into_iter()
            .zip(outs)
            .map(|(mut i, o)| {
                i.extend(o);
                i
            })
            .collect();

        Self {
            ids,
            rank,
            edges,
            incident,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn slack(&self, e: usize) -> i32 {
        let edge = self.edges[e];
        self.rank[edge.w] - self.rank[edge.v] - edge.minlen
    }

    pub fn write_ranks(&self, g: &mut LayoutGraph) {
        for (v, &rank) in self.ids.iter().zip(&self.rank) {
            if let Some(node) = g.node_mut(v) {
                node.rank = Some(rank);
            }
        }
    }
}

/// Spanning tree over a [`RankGraph`] with the bookkeeping network simplex needs.
///
/// `low`/`lim` are postorder interval numbers from a DFS rooted at node 0: `u` is in the
/// subtree of `v` iff `low[v] <= lim[u] <= lim[v]`.
#[derive(Debug, Clone)]
pub(crate) struct SpanningTree {
    pub in_tree: Vec<bool>,
    /// Tree nodes in the order they joined.
    pub nodes: Vec<usize>,
    /// Tree edges in the order they joined.
    pub edges: Vec<usize>,
    pub is_tree_edge: Vec<bool>,
    /// Tree edges per node, in the order they joined.
    pub adjacent: Vec<Vec<usize>>,

    pub low: Vec<i32>,
    pub lim: Vec<i32>,
    pub parent_edge: Vec<Option<usize>>,
    /// Cut value of the edge to the node's parent.
    pub cut_value: Vec<f64>,
}

impl SpanningTree {
    pub fn new(node_count: usize, edge_count: usize) -> Self {
        Self {
            in_tree: vec![false; node_count],
            nodes: Vec::new(),
            edges: Vec::new(),
            is_tree_edge: vec![false; edge_count],
            adjacent: vec![Vec::new(); node_count],
            low: vec![0; node_count],
            lim: vec![0; node_count],
            parent_edge: vec![None; node_count],
            cut_value: vec![0.0; node_count],
        }
    }

    pub fn add_node(&mut self, v: usize) {
        if !self.in_tree[v] {
            self.in_tree[v] = true;
            self.nodes.push(v);
        }
    }

    pub fn add_edge(&mut self, rg: &RankGraph, e: usize) {
        let edge = rg.edges[e];
        self.add_node(edge.v);
        self.add_node(edge.w);
        self.is_tree_edge[e] = true;
        self.edges.push(e);
        self.adjacent[edge.v].push(e);
        self.adjacent[edge.w].push(e);
    }

    pub fn remove_edge(&mut self, rg: &RankGraph, e: usize) {
        let edge = rg.edges[e];
        self.is_tree_edge[e] = false;
        self.edges.retain(|&x| x != e);
        self.adjacent[edge.v].retain(|&x| x != e);
        self.adjacent[edge.w].retain(|&x| x != e);
    }

    /// The other end of `v`'s edge to its parent.
    pub fn parent(&self, rg: &RankGraph, v: usize) -> Option<usize> {
        self.parent_edge[v].map(|e| {
            let edge = rg.edges[e];
            if edge.v == v { edge.w } else { edge.v }
        })
    }

    pub fn is_descendant(&self, v: usize, root: usize) -> bool {
        self.low[root] <= self.lim[v] && self.lim[v] <= self.lim[root]
    }
}
