//! Network simplex ranking (Gansner et al., "A Technique for Drawing Directed Graphs").
//!
//! Each connected component is solved on its own [`RankGraph`]: longest-path ranks, a tight
//! spanning tree, then repeated exchanges of a tree edge with negative cut value for the
//! non-tree edge of minimum slack that reconnects the two halves.

use super::feasible_tree::tight_spanning_tree;
use super::tree::{RankGraph, SpanningTree};
use super::util::longest_path;
use crate::Result;
use crate::graphlib::alg;
use crate::model::LayoutGraph;
use crate::util::simplify;

pub fn network_simplex(g: &mut LayoutGraph) -> Result<()> {
    let mut simplified = simplify(g);
    longest_path(&mut simplified)?;

    let mut exchanges = 0usize;
    for component in alg::components(&simplified) {
        let mut rg = RankGraph::from_component(&simplified, component);
        let tree = tight_spanning_tree(&mut rg);
        let mut simplex = Simplex { rg: &mut rg, tree };
        simplex.init_low_lim_values();
        simplex.init_cut_values();

        while let Some(e) = simplex.leave_edge() {
            let Some(f) = simplex.enter_edge(e) else {
                break;
            };
            tracing::trace!(leave = e, enter = f, "network simplex exchange");
            simplex.exchange_edges(e, f);
            exchanges += 1;
        }
        rg.write_ranks(g);
    }

    tracing::debug!(exchanges, "network simplex done");
    Ok(())
}

struct Simplex<'a> {
    rg: &'a mut RankGraph,
    tree: SpanningTree,
}

impl Simplex<'_> {
    /// Postorder `low`/`lim` numbering and parent edges, from a DFS rooted at node 0.
    fn init_low_lim_values(&mut self) {
        let tree = &mut self.tree;
        let rg = &*self.rg;
        if rg.len() == 0 {
            return;
        }
        let mut visited = vec![false; rg.len()];
        let mut next_lim = 1i32;

        // (node, edge to parent, low, next adjacent edge)
        let mut stack: Vec<(usize, Option<usize>, i32, usize)> = vec![(0, None, next_lim, 0)];
        visited[0] = true;

        while let Some((v, parent_edge, low, i)) = stack.last_mut() {
            let v = *v;
            if let Some(&e) = tree.adjacent[v].get(*i) {
                *i += 1;
                let edge = rg.edges[e];
                let w = if edge.v == v { edge.w } else { edge.v };
                if !visited[w] {
                    visited[w] = true;
                    stack.push((w, Some(e), next_lim, 0));
                }
                continue;
            }

            tree.low[v] = *low;
            tree.lim[v] = next_lim;
            tree.parent_edge[v] = *parent_edge;
            next_lim += 1;
            stack.pop();
        }
    }

    /// Cut values for every tree edge, children before parents.
    fn init_cut_values(&mut self) {
        let mut by_lim: Vec<usize> = (0..self.rg.len()).collect();
        by_lim.sort_by_key(|&v| self.tree.lim[v]);
        for v in by_lim {
            if self.tree.parent_edge[v].is_some() {
                self.tree.cut_value[v] = self.calc_cut_value(v);
            }
        }
    }

    /// Cut value of the edge between `child` and its parent. Relies on the cut values of
    /// `child`'s own tree children.
    fn calc_cut_value(&self, child: usize) -> f64 {
        let (rg, tree) = (&*self.rg, &self.tree);
        let Some(parent_edge) = tree.parent_edge[child] else {
            return 0.0;
        };
        let Some(parent) = tree.parent(rg, child) else {
            return 0.0;
        };
        let child_is_tail = rg.edges[parent_edge].v == child;
        let mut cut_value = rg.edges[parent_edge].weight;

        for &e in &rg.incident[child] {
            let edge = rg.edges[e];
            let is_out_edge = edge.v == child;
            let other = if is_out_edge { edge.w } else { edge.v };
            if other == parent {
                continue;
            }

            let points_to_head = is_out_edge == child_is_tail;
            cut_value += if points_to_head {
                edge.weight
            } else {
                -edge.weight
            };

            if tree.is_tree_edge[e] {
                let other_cut_value = tree.cut_value[other];
                cut_value += if points_to_head {
                    -other_cut_value
                } else {
                    other_cut_value
                };
            }
        }

        cut_value
    }

    /// First tree edge (in the order edges joined the tree) with a negative cut value.
    fn leave_edge(&self) -> Option<usize> {
        self.tree.edges.iter().copied().find(|&e| {
            let edge = self.rg.edges[e];
            let child = if self.tree.parent_edge[edge.v] == Some(e) {
                edge.v
            } else {
                edge.w
            };
            self.tree.cut_value[child] < 0.0
        })
    }

    /// Non-tree edge of minimum slack crossing the cut made by removing `e`, oriented the
    /// same way as `e`.
    fn enter_edge(&self, e: usize) -> Option<usize> {
        let (rg, tree) = (&*self.rg, &self.tree);
        let edge = rg.edges[e];
        let (tail, flip) = if tree.lim[edge.v] > tree.lim[edge.w] {
            (edge.w, true)
        } else {
            (edge.v, false)
        };

        let mut best: Option<(usize, i32)> = None;
        for (f, candidate) in rg.edges.iter().enumerate() {
            if flip != tree.is_descendant(candidate.v, tail)
                || flip == tree.is_descendant(candidate.w, tail)
            {
                continue;
            }
            let slack = rg.slack(f);
            if best.is_none_or(|(_, s)| slack < s) {
                best = Some((f, slack));
            }
        }
        best.map(|(f, _)| f)
    }

    fn exchange_edges(&mut self, e: usize, f: usize) {
        self.tree.remove_edge(self.rg, e);
        self.tree.add_edge(self.rg, f);
        self.init_low_lim_values();
        self.init_cut_values();
        self.update_ranks();
    }

    /// Re-derives ranks from the root down so every tree edge is tight again.
    fn update_ranks(&mut self) {
        let mut by_lim: Vec<usize> = (0..self.rg.len()).collect();
        by_lim.sort_by_key(|&v| std::cmp::Reverse(self.tree.lim[v]));
        for v in by_lim {
            let Some(e) = self.tree.parent_edge[v] else {
                continue;
            };
            let edge = self.rg.edges[e];
            self.rg.rank[v] = if edge.v == v {
                self.rg.rank[edge.w] - edge.minlen
            } else {
                self.rg.rank[edge.v] + edge.minlen
            };
        }
    }
}
