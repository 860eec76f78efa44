//! Directed multigraph store with compound nesting, plus the graph algorithms the `strata`
//! layout pipeline is built on.
//!
//! A [`Graph`] is directed by default and may optionally allow parallel (named) edges and
//! parent/child nesting between nodes. Node ids are strings; node, edge and graph labels are
//! generic.

pub mod alg;
mod error;
pub mod graph;
pub mod json;

pub use error::{GraphError, Result};
pub use graph::{EdgeKey, Graph, GraphOptions};
