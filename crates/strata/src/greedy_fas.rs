//! Greedy feedback arc set (Eades, Lin and Smyth).
//!
//! Repeatedly strips sinks and sources; when neither is left, removes the node with the
//! largest `out - in` weight difference and puts its remaining in-edges into the arc set.
//! Nodes are addressed by their position in insertion order.

use crate::graphlib::{EdgeKey, Graph};
use crate::util::positions;
use rustc_hash::FxHashMap as HashMap;
use std::collections::VecDeque;

pub fn greedy_fas<N, E, G>(g: &Graph<N, E, G>) -> Vec<EdgeKey> {
    greedy_fas_with_weight(g, |_| 1)
}

/// Like [`greedy_fas`], weighting each edge with `weight_fn(label)`. Parallel edges are
/// merged with their weights summed.
pub fn greedy_fas_with_weight<N, E, G>(
    g: &Graph<N, E, G>,
    weight_fn: impl Fn(&E) -> i64,
) -> Vec<EdgeKey> {
    if g.node_count() <= 1 {
        return Vec::new();
    }

    let ids = g.node_ids();
    let pos = positions(&ids);
    let n = ids.len();

    let mut state = State {
        in_w: vec![0; n],
        out_w: vec![0; n],
        ins: vec![Vec::new(); n],
        outs: vec![Vec::new(); n],
        alive: vec![true; n],
        alive_count: n,
        buckets: Vec::new(),
        bucket_of: vec![None; n],
        zero_idx: 0,
    };

    let mut pair_ix: HashMap<(usize, usize), usize> = HashMap::default();
    let mut pairs: Vec<(usize, usize, i64)> = Vec::new();
    for e in g.edges() {
        let (Some(&v), Some(&w)) = (pos.get(e.v.as_str()), pos.get(e.w.as_str())) else {
            continue;
        };
        let weight = g.edge_by_key(e).map(&weight_fn).unwrap_or(1);
        match pair_ix.get(&(v, w)) {
            Some(&ix) => pairs[ix].2 += weight,
            None => {
                pair_ix.insert((v, w), pairs.len());
                pairs.push((v, w, weight));
            }
        }
        state.out_w[v] += weight;
        state.in_w[w] += weight;
    }
    for &(v, w, weight) in &pairs {
        state.outs[v].push((w, weight));
        state.ins[w].push((v, weight));
    }

    let max_in = state.in_w.iter().copied().max().unwrap_or(0);
    let max_out = state.out_w.iter().copied().max().unwrap_or(0);
    state.zero_idx = max_in + 1;
    state.buckets = vec![VecDeque::new(); (max_out + max_in + 3).max(3) as usize];
    for v in 0..n {
        state.assign_bucket(v);
    }

    let mut results: Vec<(usize, usize)> = Vec::new();
    let last = state.buckets.len() - 1;
    while state.alive_count > 0 {
        while let Some(v) = state.pop_bucket(0) {
            state.remove_node(v, None);
        }
        while let Some(v) = state.pop_bucket(last) {
            state.remove_node(v, None);
        }
        if state.alive_count == 0 {
            break;
        }

        let picked = (1..last).rev().find_map(|i| state.pop_bucket(i));
        match picked {
            Some(v) => state.remove_node(v, Some(&mut results)),
            // Every live node sits in some bucket, so this only guards against looping.
            None => match state.alive.iter().position(|&a| a) {
                Some(v) => state.remove_node(v, None),
                None => break,
            },
        }
    }

    results
        .into_iter()
        .flat_map(|(v, w)| g.out_edges(&ids[v], Some(ids[w].as_str())))
        .collect()
}

struct State {
    in_w: Vec<i64>,
    out_w: Vec<i64>,
    ins: Vec<Vec<(usize, i64)>>,
    outs: Vec<Vec<(usize, i64)>>,
    alive: Vec<bool>,
    alive_count: usize,
    buckets: Vec<VecDeque<usize>>,
    bucket_of: Vec<Option<usize>>,
    zero_idx: i64,
}

impl State {
    fn pop_bucket(&mut self, idx: usize) -> Option<usize> {
        while let Some(v) = self.buckets[idx].pop_back() {
            if self.alive[v] && self.bucket_of[v] == Some(idx) {
                self.bucket_of[v] = None;
                return Some(v);
            }
        }
        None
    }

    fn assign_bucket(&mut self, v: usize) {
        if let Some(prev) = self.bucket_of[v] {
            if let Some(at) = self.buckets[prev].iter().position(|&x| x == v) {
                self.buckets[prev].remove(at);
            }
        }

        let last = self.buckets.len() - 1;
        let idx = if self.out_w[v] == 0 {
            0
        } else if self.in_w[v] == 0 {
            last
        } else {
            (self.out_w[v] - self.in_w[v] + self.zero_idx).clamp(0, last as i64) as usize
        };
        self.buckets[idx].push_front(v);
        self.bucket_of[v] = Some(idx);
    }

    /// Removes `v`; with `collect`, records its live in-edges as feedback arcs.
    fn remove_node(&mut self, v: usize, mut collect: Option<&mut Vec<(usize, usize)>>) {
        if !self.alive[v] {
            return;
        }
        self.alive[v] = false;
        self.alive_count -= 1;
        self.bucket_of[v] = None;

        for i in 0..self.ins[v].len() {
            let (u, weight) = self.ins[v][i];
            if !self.alive[u] {
                continue;
            }
            if let Some(out) = collect.as_deref_mut() {
                out.push((u, v));
            }
            self.out_w[u] -= weight;
            self.assign_bucket(u);
        }
        for i in 0..self.outs[v].len() {
            let (w, weight) = self.outs[v][i];
            if !self.alive[w] {
                continue;
            }
            self.in_w[w] -= weight;
            self.assign_bucket(w);
        }
    }
}
