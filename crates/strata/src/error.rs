//! Layout errors.

use crate::graphlib::GraphError;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("invalid layout configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl LayoutError {
    /// True when a stage found a directed cycle it cannot handle.
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Graph(e) if e.is_cycle())
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;
