//! Label types.
//!
//! Callers build a [`Graph`](crate::graphlib::Graph) over [`NodeLabel`], [`EdgeLabel`] and
//! [`GraphLabel`]. The pipeline copies what it needs into a [`LayoutGraph`] whose labels carry
//! the stage bookkeeping, and writes only results back to the caller's labels.

use crate::graphlib::{EdgeKey, Graph};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LR | Self::RL)
    }
}

/// Forces Brandes-Köpf to use a single alignment instead of balancing all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    UL,
    UR,
    DL,
    DR,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acyclicer {
    Greedy,
    #[default]
    Dfs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ranker {
    #[default]
    NetworkSimplex,
    TightTree,
    LongestPath,
}

/// Layout options, plus the drawing size once layout has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphLabel {
    #[serde(alias = "direction")]
    pub rankdir: RankDir,
    pub nodesep: f64,
    pub edgesep: f64,
    pub ranksep: f64,
    pub marginx: f64,
    pub marginy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    pub acyclicer: Acyclicer,
    pub ranker: Ranker,

    #[serde(skip_deserializing)]
    pub width: f64,
    #[serde(skip_deserializing)]
    pub height: f64,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            nodesep: 50.0,
            edgesep: 20.0,
            ranksep: 50.0,
            marginx: 0.0,
            marginy: 0.0,
            align: None,
            acyclicer: Acyclicer::Dfs,
            ranker: Ranker::NetworkSimplex,
            width: 0.0,
            height: 0.0,
        }
    }
}

impl GraphLabel {
    /// Parses options from a JSON object. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl NodeLabel {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeLabel {
    pub weight: f64,
    pub minlen: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Point>,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            weight: 1.0,
            minlen: 1,
            points: Vec::new(),
        }
    }
}

/// What a synthetic node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dummy {
    /// One rank of a long edge split by normalization.
    Edge,
    /// Cluster border (top/bottom from the nesting graph, left/right from border segments).
    Border,
    /// Root of the nesting graph.
    Root,
    /// Space reserved for a self-loop next to its node.
    SelfEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderType {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelfEdge {
    pub key: EdgeKey,
    pub label: LayoutEdge,
}

/// Node label of the internal layout graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutNode {
    pub width: f64,
    pub height: f64,
    pub rank: Option<i32>,
    pub order: Option<usize>,
    pub x: Option<f64>,
    pub y: Option<f64>,

    pub dummy: Option<Dummy>,
    /// Original edge of an `Edge` or `SelfEdge` dummy.
    pub edge_obj: Option<EdgeKey>,
    pub edge_label: Option<LayoutEdge>,

    // Clusters.
    pub min_rank: Option<i32>,
    pub max_rank: Option<i32>,
    pub border_top: Option<String>,
    pub border_bottom: Option<String>,
    pub border_left: Vec<Option<String>>,
    pub border_right: Vec<Option<String>>,
    pub border_type: Option<BorderType>,

    pub self_edges: Vec<SelfEdge>,
}

impl LayoutNode {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn dummy(kind: Dummy) -> Self {
        Self {
            dummy: Some(kind),
            ..Default::default()
        }
    }
}

/// Edge label of the internal layout graph.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub weight: f64,
    pub minlen: usize,
    pub points: Vec<Point>,

    /// Set by the acyclic transform on edges it flipped.
    pub reversed: bool,
    pub forward_name: Option<String>,
    pub nesting_edge: bool,
}

impl Default for LayoutEdge {
    fn default() -> Self {
        Self {
            weight: 1.0,
            minlen: 1,
            points: Vec::new(),
            reversed: false,
            forward_name: None,
            nesting_edge: false,
        }
    }
}

impl LayoutEdge {
    pub fn new(weight: f64, minlen: usize) -> Self {
        Self {
            weight,
            minlen,
            ..Default::default()
        }
    }
}

/// Graph label of the internal layout graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutState {
    pub config: GraphLabel,
    /// First dummy node of every normalized edge chain.
    pub dummy_chains: Vec<String>,
    pub nesting_root: Option<String>,
    pub node_rank_factor: Option<usize>,
    pub max_rank: Option<i32>,
    pub width: f64,
    pub height: f64,
}

pub type LayoutGraph = Graph<LayoutNode, LayoutEdge, LayoutState>;
