//! The [`Graph`] container.
//!
//! Nodes and edges live in slot vectors addressed by index. Removing an element leaves a
//! tombstone, so the indices held by adjacency lists stay valid and iteration keeps insertion
//! order (layout algorithms break ties by that order).

mod edge_key;
mod entries;
mod options;

pub use edge_key::EdgeKey;
pub use options::GraphOptions;

use crate::error::{GraphError, Result};
use edge_key::EdgeKeyView;
use entries::{EdgeEntry, NodeEntry, bump, unbump};
use rustc_hash::FxBuildHasher;
use std::sync::Arc;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

type LabelFactory<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// A directed or undirected multigraph with optional parent/child nesting.
///
/// `N`, `E` and `G` are the node, edge and graph label types.
pub struct Graph<N, E, G> {
    options: GraphOptions,

    graph_label: G,
    default_node_label: LabelFactory<N>,
    default_edge_label: LabelFactory<E>,

    nodes: Vec<Option<NodeEntry<N>>>,
    node_index: HashMap<String, usize>,
    node_count: usize,

    edges: Vec<Option<EdgeEntry<E>>>,
    edge_index: HashMap<EdgeKey, usize>,
    edge_count: usize,

    parent: HashMap<usize, usize>,
    children: HashMap<usize, Vec<usize>>,
}

impl<N: Clone, E: Clone, G: Clone> Clone for Graph<N, E, G> {
    fn clone(&self) -> Self {
        Self {
            options: self.options,
            graph_label: self.graph_label.clone(),
            default_node_label: Arc::clone(&self.default_node_label),
            default_edge_label: Arc::clone(&self.default_edge_label),
            nodes: self.nodes.clone(),
            node_index: self.node_index.clone(),
            node_count: self.node_count,
            edges: self.edges.clone(),
            edge_index: self.edge_index.clone(),
            edge_count: self.edge_count,
            parent: self.parent.clone(),
            children: self.children.clone(),
        }
    }
}

impl<N, E, G> Graph<N, E, G> {
    pub fn new(options: GraphOptions) -> Self
    where
        N: Default + 'static,
        E: Default + 'static,
        G: Default,
    {
        Self {
            options,
            graph_label: G::default(),
            default_node_label: Arc::new(N::default),
            default_edge_label: Arc::new(E::default),
            nodes: Vec::new(),
            node_index: HashMap::default(),
            node_count: 0,
            edges: Vec::new(),
            edge_index: HashMap::default(),
            edge_count: 0,
            parent: HashMap::default(),
            children: HashMap::default(),
        }
    }

    /// An empty graph sharing this graph's options, label and label factories.
    fn empty_like(&self) -> Self
    where
        G: Clone,
    {
        Self {
            options: self.options,
            graph_label: self.graph_label.clone(),
            default_node_label: Arc::clone(&self.default_node_label),
            default_edge_label: Arc::clone(&self.default_edge_label),
            nodes: Vec::new(),
            node_index: HashMap::default(),
            node_count: 0,
            edges: Vec::new(),
            edge_index: HashMap::default(),
            edge_count: 0,
            parent: HashMap::default(),
            children: HashMap::default(),
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    pub fn is_compound(&self) -> bool {
        self.options.compound
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    pub fn set_default_node_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> N + Send + Sync + 'static,
    {
        self.default_node_label = Arc::new(f);
        self
    }

    pub fn set_default_edge_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.default_edge_label = Arc::new(f);
        self
    }

    // ---- nodes ----

    fn slot(&self, ix: usize) -> Option<&NodeEntry<N>> {
        self.nodes.get(ix).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, ix: usize) -> Option<&mut NodeEntry<N>> {
        self.nodes.get_mut(ix).and_then(Option::as_mut)
    }

    fn id_of(&self, ix: usize) -> &str {
        self.slot(ix).map(|n| n.id.as_str()).unwrap_or("")
    }

    /// Stable slot index of a node. Indices are never reused within one graph.
    pub fn node_ix(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub fn node_id_by_ix(&self, ix: usize) -> Option<&str> {
        self.slot(ix).map(|n| n.id.as_str())
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Inserts `id` with `label`, replacing the label if the node already exists.
    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(ix) = self.node_ix(&id) {
            if let Some(n) = self.slot_mut(ix) {
                n.label = label;
            }
            return self;
        }
        self.insert_node(id, label);
        self
    }

    /// Inserts `id` with the default label unless it already exists.
    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let _ = self.ensure_node_ix(id.into());
        self
    }

    fn ensure_node_ix(&mut self, id: String) -> usize {
        if let Some(ix) = self.node_ix(&id) {
            return ix;
        }
        let label = (self.default_node_label)();
        self.insert_node(id, label)
    }

    fn insert_node(&mut self, id: String, label: N) -> usize {
        let ix = self.nodes.len();
        self.node_index.insert(id.clone(), ix);
        self.nodes.push(Some(NodeEntry::new(id, label)));
        self.node_count += 1;
        ix
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_ix(id).and_then(|ix| self.slot(ix)).map(|n| &n.label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        let ix = self.node_ix(id)?;
        self.slot_mut(ix).map(|n| &mut n.label)
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().flatten().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes().map(str::to_string).collect()
    }

    pub fn for_each_node<F>(&self, mut f: F)
    where
        F: FnMut(&str, &N),
    {
        for n in self.nodes.iter().flatten() {
            f(&n.id, &n.label);
        }
    }

    pub fn for_each_node_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut N),
    {
        for n in self.nodes.iter_mut().flatten() {
            f(&n.id, &mut n.label);
        }
    }

    /// Removes `id`, its incident edges, and hands its children to its former parent.
    ///
    /// Returns the removed label.
    pub fn remove_node(&mut self, id: &str) -> Option<N> {
        let ix = self.node_index.remove(id)?;

        let incident: Vec<usize> = self
            .slot(ix)
            .map(|n| n.in_edges.iter().chain(&n.out_edges).copied().collect())
            .unwrap_or_default();
        for e in incident {
            self.remove_edge_at(e);
        }

        if self.options.compound {
            let former_parent = self.unlink_parent(ix);
            let orphans = self.children.remove(&ix).unwrap_or_default();
            for child in orphans {
                self.parent.remove(&child);
                if let Some(p) = former_parent {
                    self.link_parent(child, p);
                }
            }
        }

        self.node_count -= 1;
        self.nodes.get_mut(ix).and_then(Option::take).map(|n| n.label)
    }

    pub fn sources(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.in_edges.is_empty())
            .map(|n| n.id.as_str())
            .collect()
    }

    pub fn sinks(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.out_edges.is_empty())
            .map(|n| n.id.as_str())
            .collect()
    }

    pub fn is_leaf(&self, id: &str) -> bool {
        if self.options.directed {
            self.successors(id).is_empty()
        } else {
            self.neighbors(id).is_empty()
        }
    }

    // ---- adjacency ----

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        if !self.options.directed {
            return self.neighbors(v);
        }
        let Some(n) = self.node_ix(v).and_then(|ix| self.slot(ix)) else {
            return Vec::new();
        };
        n.preds.keys().map(|&u| self.id_of(u)).collect()
    }

    pub fn successors(&self, v: &str) -> Vec<&str> {
        if !self.options.directed {
            return self.neighbors(v);
        }
        let Some(n) = self.node_ix(v).and_then(|ix| self.slot(ix)) else {
            return Vec::new();
        };
        n.succs.keys().map(|&w| self.id_of(w)).collect()
    }

    /// Predecessors followed by successors, without duplicates.
    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let Some(n) = self.node_ix(v).and_then(|ix| self.slot(ix)) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = n.preds.keys().map(|&u| self.id_of(u)).collect();
        for &w in n.succs.keys() {
            if !n.preds.contains_key(&w) {
                out.push(self.id_of(w));
            }
        }
        out
    }

    // ---- edges ----

    fn canonical_view<'a>(&self, v: &'a str, w: &'a str, name: Option<&'a str>) -> EdgeKeyView<'a> {
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };
        let name = if self.options.multigraph { name } else { None };
        EdgeKeyView { v, w, name }
    }

    fn edge_ix(&self, v: &str, w: &str, name: Option<&str>) -> Option<usize> {
        self.edge_index
            .get(&self.canonical_view(v, w, name))
            .copied()
    }

    fn edge_slot(&self, ix: usize) -> Option<&EdgeEntry<E>> {
        self.edges.get(ix).and_then(Option::as_ref)
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Edge keys in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().flatten().map(|e| &e.key)
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges().cloned().collect()
    }

    pub fn for_each_edge<F>(&self, mut f: F)
    where
        F: FnMut(&EdgeKey, &E),
    {
        for e in self.edges.iter().flatten() {
            f(&e.key, &e.label);
        }
    }

    pub fn for_each_edge_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&EdgeKey, &mut E),
    {
        for e in self.edges.iter_mut().flatten() {
            f(&e.key, &mut e.label);
        }
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.insert_edge(v.into(), w.into(), None, None);
        self
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.insert_edge(v.into(), w.into(), None, Some(label));
        self
    }

    /// Adds or updates the edge `v -> w` called `name`.
    ///
    /// Missing endpoints are created with the default node label. When `label` is `None` an
    /// existing edge keeps its label and a new one gets the default edge label.
    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> Result<&mut Self> {
        let (v, w) = (v.into(), w.into());
        let name: Option<String> = name.map(Into::into);
        if let Some(name) = &name {
            if !self.options.multigraph {
                return Err(GraphError::NamedEdgeInSimpleGraph {
                    v,
                    w,
                    name: name.clone(),
                });
            }
        }
        self.insert_edge(v, w, name, label);
        Ok(self)
    }

    pub fn set_edge_key(&mut self, key: EdgeKey, label: E) -> Result<&mut Self> {
        self.set_edge_named(key.v, key.w, key.name, Some(label))
    }

    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    fn insert_edge(&mut self, v: String, w: String, name: Option<String>, label: Option<E>) {
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };
        let name = if self.options.multigraph { name } else { None };

        if let Some(ix) = self.edge_ix(&v, &w, name.as_deref()) {
            if let (Some(label), Some(Some(e))) = (label, self.edges.get_mut(ix)) {
                e.label = label;
            }
            return;
        }

        let v_ix = self.ensure_node_ix(v.clone());
        let w_ix = self.ensure_node_ix(w.clone());
        let label = label.unwrap_or_else(|| (self.default_edge_label)());
        let key = EdgeKey { v, w, name };

        let ix = self.edges.len();
        self.edge_index.insert(key.clone(), ix);
        self.edges.push(Some(EdgeEntry {
            key,
            v_ix,
            w_ix,
            label,
        }));
        self.edge_count += 1;

        if let Some(n) = self.slot_mut(v_ix) {
            n.out_edges.push(ix);
            bump(&mut n.succs, w_ix);
        }
        if let Some(n) = self.slot_mut(w_ix) {
            n.in_edges.push(ix);
            bump(&mut n.preds, v_ix);
        }
    }

    fn remove_edge_at(&mut self, ix: usize) -> Option<E> {
        let entry = self.edges.get_mut(ix).and_then(Option::take)?;
        self.edge_index.remove(&entry.key);
        self.edge_count -= 1;
        if let Some(n) = self.slot_mut(entry.v_ix) {
            n.out_edges.retain(|&e| e != ix);
            unbump(&mut n.succs, entry.w_ix);
        }
        if let Some(n) = self.slot_mut(entry.w_ix) {
            n.in_edges.retain(|&e| e != ix);
            unbump(&mut n.preds, entry.v_ix);
        }
        Some(entry.label)
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edge_ix(v, w, name).is_some()
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        let ix = self.edge_ix(v, w, name)?;
        self.edge_slot(ix).map(|e| &e.label)
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let ix = self.edge_ix(v, w, name)?;
        self.edges
            .get_mut(ix)
            .and_then(Option::as_mut)
            .map(|e| &mut e.label)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        self.edge_mut(&key.v, &key.w, key.name.as_deref())
    }

    /// Removes the edge and returns its label.
    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<E> {
        let ix = self.edge_ix(v, w, name)?;
        self.remove_edge_at(ix)
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> Option<E> {
        self.remove_edge(&key.v, &key.w, key.name.as_deref())
    }

    fn collect_edges<'a>(
        &self,
        ixs: impl Iterator<Item = &'a usize>,
        other: Option<usize>,
        pick_other: impl Fn(&EdgeEntry<E>) -> usize,
    ) -> Vec<EdgeKey> {
        ixs.filter_map(|&ix| self.edge_slot(ix))
            .filter(|e| other.is_none_or(|o| pick_other(e) == o))
            .map(|e| e.key.clone())
            .collect()
    }

    /// Edges entering `v`, optionally only those leaving `u`.
    pub fn in_edges(&self, v: &str, u: Option<&str>) -> Vec<EdgeKey> {
        if !self.options.directed {
            return self.node_edges(v, u);
        }
        let Some(n) = self.node_ix(v).and_then(|ix| self.slot(ix)) else {
            return Vec::new();
        };
        let other = match u {
            Some(u) => match self.node_ix(u) {
                Some(ix) => Some(ix),
                None => return Vec::new(),
            },
            None => None,
        };
        self.collect_edges(n.in_edges.iter(), other, |e| e.v_ix)
    }

    /// Edges leaving `v`, optionally only those entering `w`.
    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        if !self.options.directed {
            return self.node_edges(v, w);
        }
        let Some(n) = self.node_ix(v).and_then(|ix| self.slot(ix)) else {
            return Vec::new();
        };
        let other = match w {
            Some(w) => match self.node_ix(w) {
                Some(ix) => Some(ix),
                None => return Vec::new(),
            },
            None => None,
        };
        self.collect_edges(n.out_edges.iter(), other, |e| e.w_ix)
    }

    /// All edges incident on `v` (in either direction), optionally only those touching `w`.
    pub fn node_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        let Some(v_ix) = self.node_ix(v) else {
            return Vec::new();
        };
        let Some(n) = self.slot(v_ix) else {
            return Vec::new();
        };
        let other = match w {
            Some(w) => match self.node_ix(w) {
                Some(ix) => Some(ix),
                None => return Vec::new(),
            },
            None => None,
        };
        let mut seen: HashSet<usize> = HashSet::default();
        n.in_edges
            .iter()
            .chain(&n.out_edges)
            .filter(|&&ix| seen.insert(ix))
            .filter_map(|&ix| self.edge_slot(ix))
            .filter(|e| {
                other.is_none_or(|o| {
                    let far = if e.v_ix == v_ix { e.w_ix } else { e.v_ix };
                    far == o
                })
            })
            .map(|e| e.key.clone())
            .collect()
    }

    // ---- nesting ----

    fn link_parent(&mut self, child: usize, parent: usize) {
        self.parent.insert(child, parent);
        self.children.entry(parent).or_default().push(child);
    }

    fn unlink_parent(&mut self, child: usize) -> Option<usize> {
        let prev = self.parent.remove(&child)?;
        if let Some(siblings) = self.children.get_mut(&prev) {
            siblings.retain(|&c| c != child);
        }
        Some(prev)
    }

    /// Nests `child` under `parent`, creating either node if needed.
    ///
    /// Fails on non-compound graphs and when `parent` is `child` or one of its descendants.
    pub fn set_parent(
        &mut self,
        child: impl Into<String>,
        parent: impl Into<String>,
    ) -> Result<&mut Self> {
        if !self.options.compound {
            return Err(GraphError::NotCompound);
        }
        let child = child.into();
        let parent = parent.into();

        let mut ancestor = Some(parent.as_str());
        while let Some(a) = ancestor {
            if a == child {
                return Err(GraphError::ContainmentCycle { child, parent });
            }
            ancestor = self.parent(a);
        }

        let child_ix = self.ensure_node_ix(child);
        let parent_ix = self.ensure_node_ix(parent);
        self.unlink_parent(child_ix);
        self.link_parent(child_ix, parent_ix);
        Ok(self)
    }

    /// Moves `child` back to the root of the nesting tree.
    pub fn clear_parent(&mut self, child: &str) -> &mut Self {
        if let Some(ix) = self.node_ix(child) {
            self.unlink_parent(ix);
        }
        self
    }

    pub fn parent(&self, child: &str) -> Option<&str> {
        let ix = self.node_ix(child)?;
        self.parent.get(&ix).map(|&p| self.id_of(p))
    }

    pub fn children(&self, parent: &str) -> Vec<&str> {
        let Some(ix) = self.node_ix(parent) else {
            return Vec::new();
        };
        self.children
            .get(&ix)
            .map(|ch| ch.iter().map(|&c| self.id_of(c)).collect())
            .unwrap_or_default()
    }

    /// Top-level nodes of the nesting tree (all nodes for non-compound graphs).
    pub fn children_root(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(ix, n)| n.as_ref().map(|n| (ix, n)))
            .filter(|(ix, _)| !self.parent.contains_key(ix))
            .map(|(_, n)| n.id.as_str())
            .collect()
    }

    // ---- subgraphs ----

    /// Induced subgraph over the nodes accepted by `keep`.
    ///
    /// In compound graphs a kept node whose parent was dropped is attached to its nearest kept
    /// ancestor.
    pub fn filter_nodes<F>(&self, keep: F) -> Self
    where
        F: Fn(&str, &N) -> bool,
        N: Clone,
        E: Clone,
        G: Clone,
    {
        let mut out = self.empty_like();
        for n in self.nodes.iter().flatten() {
            if keep(&n.id, &n.label) {
                out.insert_node(n.id.clone(), n.label.clone());
            }
        }

        for e in self.edges.iter().flatten() {
            if out.has_node(&e.key.v) && out.has_node(&e.key.w) {
                out.insert_edge(
                    e.key.v.clone(),
                    e.key.w.clone(),
                    e.key.name.clone(),
                    Some(e.label.clone()),
                );
            }
        }

        if self.options.compound {
            let kept: Vec<String> = out.node_ids();
            for v in kept {
                let mut ancestor = self.parent(&v);
                while let Some(a) = ancestor {
                    if out.has_node(a) {
                        break;
                    }
                    ancestor = self.parent(a);
                }
                if let (Some(a), Some(child_ix)) = (ancestor, out.node_ix(&v)) {
                    if let Some(parent_ix) = out.node_ix(a) {
                        out.link_parent(child_ix, parent_ix);
                    }
                }
            }
        }

        out
    }
}
