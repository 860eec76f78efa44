//! Error type shared by the graph container and the graph algorithms.

/// Failures raised by [`Graph`](crate::Graph) mutations and by [`alg`](crate::alg).
///
/// The first group are structural violations: the caller asked for a graph shape the
/// container cannot represent. The second group are algorithmic preconditions that callers
/// are expected to either avoid or handle explicitly.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("setting {parent:?} as the parent of {child:?} would create a containment cycle")]
    ContainmentCycle { child: String, parent: String },

    #[error("cannot set a parent in a non-compound graph")]
    NotCompound,

    #[error("cannot add named edge {v:?} -> {w:?} ({name:?}) to a non-multigraph")]
    NamedEdgeInSimpleGraph { v: String, w: String, name: String },

    #[error("graph does not contain node {id:?}")]
    MissingNode { id: String },

    #[error("graph contains a cycle")]
    Cycle,

    #[error("negative edge weight {weight} on edge {v:?} -> {w:?}")]
    NegativeWeight { v: String, w: String, weight: f64 },

    #[error("graph is not connected")]
    Disconnected,
}

impl GraphError {
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Cycle)
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
