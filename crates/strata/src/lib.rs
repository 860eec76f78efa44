//! Layered drawing of directed graphs.
//!
//! [`layout`] takes a [`graphlib::Graph`] whose nodes carry sizes and whose edges carry
//! weights and minimum lengths, and assigns every node a rank, an order within its rank and
//! `x`/`y` coordinates, routing every edge through the ranks it spans. Cycles are broken
//! temporarily, compound (nested) graphs keep clusters contiguous, and the drawing can flow
//! in any of four directions.
//!
//! The stages are public modules over the internal [`LayoutGraph`] so they can be used and
//! tested on their own.

pub use strata_graphlib as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod error;
pub mod model;
pub mod util;

pub mod acyclic;
pub mod add_border_segments;
pub mod coordinate_system;
pub mod greedy_fas;
pub mod nesting_graph;
pub mod normalize;
pub mod order;
pub mod parent_dummy_chains;
pub mod position;
pub mod rank;
pub mod self_edges;

mod pipeline;

pub use error::{LayoutError, Result};
pub use model::{
    Acyclicer, Align, BorderType, Dummy, EdgeLabel, GraphLabel, LayoutEdge, LayoutGraph, LayoutNode, LayoutState,
    NodeLabel, Point, RankDir, Ranker, SelfEdge,
};
pub use pipeline::{build_layout_graph, layout};
