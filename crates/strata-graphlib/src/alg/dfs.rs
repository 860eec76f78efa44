use super::navigate;
use crate::{Graph, GraphError, Result};
use rustc_hash::FxHashSet as HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfsOrder {
    Pre,
    Post,
}

/// Depth-first traversal from each of `roots` in turn, skipping nodes already visited.
///
/// Fails with [`GraphError::MissingNode`] if a root is not in the graph.
pub fn dfs<N, E, G>(g: &Graph<N, E, G>, roots: &[&str], order: DfsOrder) -> Result<Vec<String>> {
    if let Some(missing) = roots.iter().find(|r| !g.has_node(r)) {
        return Err(GraphError::MissingNode {
            id: missing.to_string(),
        });
    }

    let mut visited: HashSet<&str> = HashSet::default();
    let mut out: Vec<String> = Vec::with_capacity(g.node_count());

    for &root in roots {
        if !visited.insert(root) {
            continue;
        }
        if order == DfsOrder::Pre {
            out.push(root.to_string());
        }

        let mut stack: Vec<(&str, Vec<&str>, usize)> = vec![(root, navigate(g, root), 0)];
        while let Some((v, next, i)) = stack.last_mut() {
            if let Some(&w) = next.get(*i) {
                *i += 1;
                if visited.insert(w) {
                    if order == DfsOrder::Pre {
                        out.push(w.to_string());
                    }
                    stack.push((w, navigate(g, w), 0));
                }
            } else {
                if order == DfsOrder::Post {
                    out.push(v.to_string());
                }
                stack.pop();
            }
        }
    }

    Ok(out)
}

pub fn preorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Result<Vec<String>> {
    dfs(g, roots, DfsOrder::Pre)
}

pub fn postorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Result<Vec<String>> {
    dfs(g, roots, DfsOrder::Post)
}
