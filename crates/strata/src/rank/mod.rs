//! Rank assignment.
//!
//! Every ranker expects an acyclic graph without nesting and leaves
//! `rank(w) - rank(v) >= minlen` satisfied for every edge `v -> w`. Ranks are not normalized.

pub mod feasible_tree;
pub mod network_simplex;
pub(crate) mod tree;
pub mod util;

pub use feasible_tree::feasible_tree;
pub use network_simplex::network_simplex;
pub use util::{longest_path, slack};

use crate::Result;
use crate::model::{LayoutGraph, Ranker};

pub fn rank(g: &mut LayoutGraph) -> Result<()> {
    let ranker = g.graph().config.ranker;
    tracing::debug!(?ranker, nodes = g.node_count(), "ranking");
    match ranker {
        Ranker::NetworkSimplex => network_simplex(g),
        Ranker::TightTree => {
            longest_path(g)?;
            feasible_tree(g).map(|_| ())
        }
        Ranker::LongestPath => longest_path(g),
    }
}
