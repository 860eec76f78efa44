//! Graph algorithms over [`Graph`](crate::Graph).
//!
//! Traversals keep their own work stacks instead of recursing, so deep graphs do not
//! exhaust the call stack.

mod components;
mod dfs;
mod dijkstra;
mod floyd_warshall;
mod prim;
mod tarjan;
mod topsort;

pub use components::components;
pub use dfs::{DfsOrder, dfs, postorder, preorder};
pub use dijkstra::{Path, dijkstra, dijkstra_all, dijkstra_with};
pub use floyd_warshall::floyd_warshall;
pub use prim::prim;
pub use tarjan::{find_cycles, tarjan};
pub use topsort::{is_acyclic, topsort};

use crate::{EdgeKey, Graph};

/// Edges leaving `v` for directed graphs, every incident edge otherwise.
pub(crate) fn default_edges<N, E, G>(g: &Graph<N, E, G>, v: &str) -> Vec<EdgeKey> {
    if g.is_directed() {
        g.out_edges(v, None)
    } else {
        g.node_edges(v, None)
    }
}

/// Nodes reachable in one step: successors for directed graphs, neighbors otherwise.
pub(crate) fn navigate<'g, N, E, G>(g: &'g Graph<N, E, G>, v: &str) -> Vec<&'g str> {
    if g.is_directed() {
        g.successors(v)
    } else {
        g.neighbors(v)
    }
}
