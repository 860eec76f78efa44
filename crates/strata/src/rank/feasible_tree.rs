//! Tight spanning tree construction.
//!
//! Starting from the first node, the tree greedily absorbs every node reachable through tight
//! edges. While nodes remain outside, the tree is shifted by the slack of the cheapest edge
//! leaving it, which makes that edge tight and lets the tree grow again.

use super::tree::{RankGraph, SpanningTree};
use crate::Result;
use crate::graphlib::{Graph, GraphOptions, alg};
use crate::model::LayoutGraph;

/// Builds a tight spanning tree for every connected component of `g`, adjusting ranks as
/// needed, and returns the forest as an undirected graph.
///
/// `g` must already be ranked (for example by [`longest_path`](super::util::longest_path)).
pub fn feasible_tree(g: &mut LayoutGraph) -> Result<Graph<(), (), ()>> {
    let mut forest: Graph<(), (), ()> = Graph::new(GraphOptions {
        directed: false,
        ..Default::default()
    });

    for component in alg::components(g) {
        let mut rg = RankGraph::from_component(g, component);
        let tree = tight_spanning_tree(&mut rg);
        rg.write_ranks(g);

        for &v in &tree.nodes {
            forest.ensure_node(rg.ids[v].as_str());
        }
        for &e in &tree.edges {
            let edge = rg.edges[e];
            forest.set_edge(rg.ids[edge.v].as_str(), rg.ids[edge.w].as_str());
        }
    }

    Ok(forest)
}

/// Tight spanning tree of a connected [`RankGraph`], rooted at node 0.
pub(crate) fn tight_spanning_tree(rg: &mut RankGraph) -> SpanningTree {
    let mut tree = SpanningTree::new(rg.len(), rg.edges.len());
    if rg.len() == 0 {
        return tree;
    }
    tree.add_node(0);

    while grow_tight_tree(&mut tree, rg) < rg.len() {
        let Some((e, slack)) = find_min_slack_edge(&tree, rg) else {
            break;
        };
        let delta = if tree.in_tree[rg.edges[e].v] { slack } else { -slack };
        for &v in &tree.nodes {
            rg.rank[v] += delta;
        }
    }

    tree
}

/// Depth-first absorption of nodes reachable through tight edges. Returns the tree size.
fn grow_tight_tree(tree: &mut SpanningTree, rg: &RankGraph) -> usize {
    let roots = tree.nodes.clone();
    for root in roots {
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some((v, i)) = stack.last_mut() {
            let v = *v;
            let Some(&e) = rg.incident[v].get(*i) else {
                stack.pop();
                continue;
            };
            *i += 1;

            let edge = rg.edges[e];
            let w = if edge.v == v { edge.w } else { edge.v };
            if !tree.in_tree[w] && rg.slack(e) == 0 {
                tree.add_edge(rg, e);
                stack.push((w, 0));
            }
        }
    }
    tree.nodes.len()
}

/// First edge with exactly one end in the tree that has the smallest slack.
fn find_min_slack_edge(tree: &SpanningTree, rg: &RankGraph) -> Option<(usize, i32)> {
    let mut best: Option<(usize, i32)> = None;
    for (e, edge) in rg.edges.iter().enumerate() {
        if tree.in_tree[edge.v] == tree.in_tree[edge.w] {
            continue;
        }
        let slack = rg.slack(e);
        if best.is_none_or(|(_, s)| slack < s) {
            best = Some((e, slack));
        }
    }
    best
}
