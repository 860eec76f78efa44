//! Nesting for normalized edge chains in compound graphs.
//!
//! A dummy node on a long edge belongs to the cluster that spans its rank on the path from
//! the edge's source up to the lowest common ancestor of both endpoints and back down to the
//! target. Containment tests use postorder `low`/`lim` numbers over the nesting tree.

use crate::Result;
use crate::model::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone, Copy)]
struct Interval {
    low: usize,
    lim: usize,
}

pub fn parent_dummy_chains(g: &mut LayoutGraph) -> Result<()> {
    let intervals = postorder(g);

    for start in g.graph().dummy_chains.clone() {
        let Some(edge_obj) = g.node(&start).and_then(|n| n.edge_obj.clone()) else {
            continue;
        };
        let (path, lca) = find_path(g, &intervals, &edge_obj.v, &edge_obj.w);

        let mut v = start;
        let mut path_idx = 0usize;
        let mut path_v = path.first().cloned().flatten();
        let mut ascending = true;

        while v != edge_obj.w {
            let rank = g.node(&v).and_then(|n| n.rank).unwrap_or(0);

            if ascending {
                while path_v != lca
                    && path_v
                        .as_deref()
                        .and_then(|p| g.node(p))
                        .and_then(|n| n.max_rank)
                        .is_some_and(|max_rank| max_rank < rank)
                {
                    path_idx += 1;
                    path_v = path.get(path_idx).cloned().flatten();
                }
                if path_v == lca {
                    ascending = false;
                }
            }

            if !ascending {
                while path
                    .get(path_idx + 1)
                    .and_then(|p| p.as_deref())
                    .and_then(|p| g.node(p))
                    .and_then(|n| n.min_rank)
                    .is_some_and(|min_rank| min_rank <= rank)
                {
                    path_idx += 1;
                }
                path_v = path.get(path_idx).cloned().flatten();
            }

            match &path_v {
                Some(parent) => {
                    g.set_parent(v.clone(), parent.clone())?;
                }
                None => {
                    g.clear_parent(&v);
                }
            }

            let Some(next) = g.successors(&v).first().map(|s| s.to_string()) else {
                break;
            };
            v = next;
        }
    }
    Ok(())
}

/// Clusters from `v` up to (and including) the LCA of `v` and `w`, then down to `w`'s parent.
/// `None` stands for the root of the nesting tree.
fn find_path(
    g: &LayoutGraph,
    intervals: &HashMap<String, Interval>,
    v: &str,
    w: &str,
) -> (Vec<Option<String>>, Option<String>) {
    let (Some(v_iv), Some(w_iv)) = (intervals.get(v), intervals.get(w)) else {
        return (vec![None], None);
    };
    let low = v_iv.low.min(w_iv.low);
    let lim = v_iv.lim.max(w_iv.lim);

    let mut path: Vec<Option<String>> = Vec::new();
    let mut cur = v.to_string();
    let lca = loop {
        let parent = g.parent(&cur).map(str::to_string);
        path.push(parent.clone());
        let Some(p) = parent else {
            break None;
        };
        let contains = intervals
            .get(&p)
            .is_some_and(|iv| iv.low <= low && lim <= iv.lim);
        if contains {
            break Some(p);
        }
        cur = p;
    };

    let mut down: Vec<Option<String>> = Vec::new();
    let mut cur = w.to_string();
    while let Some(p) = g.parent(&cur).map(str::to_string) {
        if Some(&p) == lca.as_ref() {
            break;
        }
        down.push(Some(p.clone()));
        cur = p;
    }
    down.reverse();
    path.extend(down);

    (path, lca)
}

fn postorder(g: &LayoutGraph) -> HashMap<String, Interval> {
    let mut out: HashMap<String, Interval> = HashMap::default();
    let mut lim = 0usize;

    for top in g.children_root() {
        // (node, children, next child, low)
        let mut stack: Vec<(&str, Vec<&str>, usize, usize)> = vec![(top, g.children(top), 0, lim)];
        while let Some((v, children, i, low)) = stack.last_mut() {
            if let Some(&child) = children.get(*i) {
                *i += 1;
                stack.push((child, g.children(child), 0, lim));
                continue;
            }
            out.insert(v.to_string(), Interval { low: *low, lim });
            lim += 1;
            stack.pop();
        }
    }
    out
}
