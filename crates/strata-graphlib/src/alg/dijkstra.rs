use super::default_edges;
use crate::{EdgeKey, Graph, GraphError, Result};
use rustc_hash::FxHashMap as HashMap;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

/// Shortest-path result for one target node.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// `f64::INFINITY` when the node is unreachable.
    pub distance: f64,
    pub predecessor: Option<String>,
}

impl Path {
    fn unreachable() -> Self {
        Self {
            distance: f64::INFINITY,
            predecessor: None,
        }
    }
}

/// Min-heap entry. Stale entries are skipped on pop instead of being decreased in place.
#[derive(Clone, Copy, PartialEq)]
struct Queued {
    distance: f64,
    ix: usize,
}

impl Eq for Queued {}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.ix.cmp(&self.ix))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source shortest paths from `source`, following out-edges (all incident edges for
/// undirected graphs).
pub fn dijkstra<N, E, G, W>(
    g: &Graph<N, E, G>,
    source: &str,
    weight: W,
) -> Result<BTreeMap<String, Path>>
where
    W: Fn(&EdgeKey) -> f64,
{
    dijkstra_with(g, source, weight, |v| default_edges(g, v))
}

/// Like [`dijkstra`], with `edges(v)` choosing which edges leave `v`.
///
/// Fails with [`GraphError::NegativeWeight`] as soon as a negative edge is relaxed.
pub fn dijkstra_with<N, E, G, W, F>(
    g: &Graph<N, E, G>,
    source: &str,
    weight: W,
    edges: F,
) -> Result<BTreeMap<String, Path>>
where
    W: Fn(&EdgeKey) -> f64,
    F: Fn(&str) -> Vec<EdgeKey>,
{
    if !g.has_node(source) {
        return Err(GraphError::MissingNode {
            id: source.to_string(),
        });
    }

    let ids: Vec<&str> = g.nodes().collect();
    let pos: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    let mut dist: Vec<f64> = vec![f64::INFINITY; ids.len()];
    let mut pred: Vec<Option<usize>> = vec![None; ids.len()];
    let mut done: Vec<bool> = vec![false; ids.len()];
    let mut heap: BinaryHeap<Queued> = BinaryHeap::new();

    let Some(&start) = pos.get(source) else {
        return Ok(BTreeMap::new());
    };
    dist[start] = 0.0;
    heap.push(Queued {
        distance: 0.0,
        ix: start,
    });

    while let Some(Queued { distance, ix }) = heap.pop() {
        if done[ix] || distance > dist[ix] {
            continue;
        }
        done[ix] = true;
        let v = ids[ix];

        for key in edges(v) {
            let w = key.other(v);
            let Some(&w_ix) = pos.get(w) else {
                continue;
            };
            let d = weight(&key);
            if d < 0.0 {
                return Err(GraphError::NegativeWeight {
                    v: key.v.clone(),
                    w: key.w.clone(),
                    weight: d,
                });
            }
            let candidate = distance + d;
            if candidate < dist[w_ix] {
                dist[w_ix] = candidate;
                pred[w_ix] = Some(ix);
                heap.push(Queued {
                    distance: candidate,
                    ix: w_ix,
                });
            }
        }
    }

    Ok(ids
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let path = if dist[i].is_finite() {
                Path {
                    distance: dist[i],
                    predecessor: pred[i].map(|p| ids[p].to_string()),
                }
            } else {
                Path::unreachable()
            };
            (v.to_string(), path)
        })
        .collect())
}

/// Shortest paths from every node.
pub fn dijkstra_all<N, E, G, W>(
    g: &Graph<N, E, G>,
    weight: W,
) -> Result<BTreeMap<String, BTreeMap<String, Path>>>
where
    W: Fn(&EdgeKey) -> f64,
{
    g.nodes()
        .map(|v| dijkstra(g, v, &weight).map(|paths| (v.to_string(), paths)))
        .collect()
}
