//! Break cycles by reversing a feedback arc set, and restore the edges afterwards.
//!
//! A reversed edge is re-inserted as `w -> v` under a fresh `rev{n}` name; its label remembers
//! the original name and carries `reversed = true` until [`undo`] flips it back.

use crate::Result;
use crate::graphlib::EdgeKey;
use crate::model::{Acyclicer, LayoutGraph};
use rustc_hash::FxHashSet as HashSet;

pub fn run(g: &mut LayoutGraph) -> Result<()> {
    let fas = match g.graph().config.acyclicer {
        Acyclicer::Greedy => crate::greedy_fas::greedy_fas_with_weight(g, |label| {
            if label.weight.is_finite() {
                label.weight.round() as i64
            } else {
                0
            }
        }),
        Acyclicer::Dfs => dfs_fas(g),
    };
    tracing::debug!(reversed = fas.len(), "feedback arc set");

    for e in fas {
        if e.is_self_loop() {
            continue;
        }
        let Some(mut label) = g.remove_edge_key(&e) else {
            continue;
        };
        label.forward_name = e.name.clone();
        label.reversed = true;

        let name = unique_rev_name(g, &e.w, &e.v);
        g.set_edge_named(e.w, e.v, Some(name), Some(label))?;
    }
    Ok(())
}

/// Restores every reversed edge to its original direction and name.
pub fn undo(g: &mut LayoutGraph) -> Result<()> {
    for e in g.edge_keys() {
        if !g.edge_by_key(&e).is_some_and(|label| label.reversed) {
            continue;
        }
        let Some(mut label) = g.remove_edge_key(&e) else {
            continue;
        };
        let forward_name = label.forward_name.take();
        label.reversed = false;
        g.set_edge_named(e.w, e.v, forward_name, Some(label))?;
    }
    Ok(())
}

fn unique_rev_name(g: &LayoutGraph, v: &str, w: &str) -> String {
    let mut i = 1usize;
    loop {
        let candidate = format!("rev{i}");
        if !g.has_edge(v, w, Some(&candidate)) {
            return candidate;
        }
        i += 1;
    }
}

/// Back edges of a depth-first search over out-edges, started from every node in insertion
/// order.
pub fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeKey> {
    let mut fas: Vec<EdgeKey> = Vec::new();
    let mut visited: HashSet<String> = HashSet::default();
    let mut on_path: HashSet<String> = HashSet::default();

    for root in g.nodes() {
        if !visited.insert(root.to_string()) {
            continue;
        }
        on_path.insert(root.to_string());
        let mut stack: Vec<(String, Vec<EdgeKey>, usize)> =
            vec![(root.to_string(), g.out_edges(root, None), 0)];

        while let Some((v, out, i)) = stack.last_mut() {
            let Some(e) = out.get(*i).cloned() else {
                on_path.remove(v.as_str());
                stack.pop();
                continue;
            };
            *i += 1;
            if e.is_self_loop() {
                continue;
            }
            if on_path.contains(&e.w) {
                fas.push(e);
            } else if visited.insert(e.w.clone()) {
                on_path.insert(e.w.clone());
                let next = g.out_edges(&e.w, None);
                stack.push((e.w, next, 0));
            }
        }
    }

    fas
}
