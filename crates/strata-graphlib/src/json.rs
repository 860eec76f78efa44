//! Plain-data form of a [`Graph`] for serialization.
//!
//! [`write`] captures options, the graph label, every node with its parent, and every edge.
//! [`read`] rebuilds an equivalent graph, re-validating structural constraints along the way.

use crate::{Graph, GraphOptions, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument<N, E, G> {
    pub options: GraphOptions,
    pub value: G,
    pub nodes: Vec<NodeDocument<N>>,
    pub edges: Vec<EdgeDocument<E>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument<N> {
    pub v: String,
    pub value: N,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDocument<E> {
    pub v: String,
    pub w: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: E,
}

pub fn write<N, E, G>(g: &Graph<N, E, G>) -> GraphDocument<N, E, G>
where
    N: Clone,
    E: Clone,
    G: Clone,
{
    let mut nodes: Vec<NodeDocument<N>> = Vec::with_capacity(g.node_count());
    g.for_each_node(|v, label| {
        nodes.push(NodeDocument {
            v: v.to_string(),
            value: label.clone(),
            parent: g.parent(v).map(str::to_string),
        });
    });

    let mut edges: Vec<EdgeDocument<E>> = Vec::with_capacity(g.edge_count());
    g.for_each_edge(|key, label| {
        edges.push(EdgeDocument {
            v: key.v.clone(),
            w: key.w.clone(),
            name: key.name.clone(),
            value: label.clone(),
        });
    });

    GraphDocument {
        options: g.options(),
        value: g.graph().clone(),
        nodes,
        edges,
    }
}

/// Rebuilds a graph from `doc`.
///
/// Nodes are inserted before any parent link so documents may list children ahead of their
/// parents.
pub fn read<N, E, G>(doc: GraphDocument<N, E, G>) -> Result<Graph<N, E, G>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut g: Graph<N, E, G> = Graph::new(doc.options);
    g.set_graph(doc.value);

    let mut parents: Vec<(String, String)> = Vec::new();
    for node in doc.nodes {
        if let Some(parent) = node.parent {
            parents.push((node.v.clone(), parent));
        }
        g.set_node(node.v, node.value);
    }
    for (child, parent) in parents {
        g.set_parent(child, parent)?;
    }

    for edge in doc.edges {
        g.set_edge_named(edge.v, edge.w, edge.name, Some(edge.value))?;
    }

    Ok(g)
}
