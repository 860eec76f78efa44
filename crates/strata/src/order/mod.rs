//! Crossing minimization.
//!
//! Each rank is reordered against its already-ordered neighbor rank using barycenters, with
//! cluster contents sorted recursively and kept contiguous. Sweeps alternate direction and
//! tie-break bias, and the ordering with the fewest crossings wins.

mod barycenter;
pub use barycenter::{BarycenterEntry, SortEntry, SortResult, barycenter, resolve_conflicts, sort, sort_subgraph};

mod layer_graph;
pub use layer_graph::{LayerGraph, LayerLabel, LayerNode, Relationship, build_layer_graph};

mod constraints;
pub use constraints::add_subgraph_constraints;

mod init_order;
pub use init_order::init_order;

mod cross_count;
pub use cross_count::cross_count;

mod ordering;
pub use ordering::order;
