use crate::{Graph, GraphError, Result};
use rustc_hash::FxHashSet as HashSet;

/// Topological order (every edge points from an earlier to a later node).
///
/// Walks backwards from each sink through predecessors. Reaching a node that is still on the
/// active path, or finishing without having seen every node, means the graph has a cycle.
pub fn topsort<N, E, G>(g: &Graph<N, E, G>) -> Result<Vec<String>> {
    let mut visited: HashSet<&str> = HashSet::default();
    let mut on_path: HashSet<&str> = HashSet::default();
    let mut out: Vec<String> = Vec::with_capacity(g.node_count());

    for sink in g.sinks() {
        if !visited.insert(sink) {
            continue;
        }
        on_path.insert(sink);

        let mut stack: Vec<(&str, Vec<&str>, usize)> = vec![(sink, g.predecessors(sink), 0)];
        while let Some((v, preds, i)) = stack.last_mut() {
            if let Some(&u) = preds.get(*i) {
                *i += 1;
                if on_path.contains(u) {
                    return Err(GraphError::Cycle);
                }
                if visited.insert(u) {
                    on_path.insert(u);
                    stack.push((u, g.predecessors(u), 0));
                }
            } else {
                let v = *v;
                on_path.remove(v);
                out.push(v.to_string());
                stack.pop();
            }
        }
    }

    if visited.len() != g.node_count() {
        return Err(GraphError::Cycle);
    }
    Ok(out)
}

pub fn is_acyclic<N, E, G>(g: &Graph<N, E, G>) -> bool {
    topsort(g).is_ok()
}
