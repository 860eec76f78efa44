use crate::Graph;
use rustc_hash::FxHashSet as HashSet;

/// Weakly connected components, ignoring edge direction.
///
/// Components are listed in the insertion order of their first node.
pub fn components<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>> {
    let mut seen: HashSet<&str> = HashSet::default();
    let mut out: Vec<Vec<String>> = Vec::new();

    for start in g.nodes() {
        if !seen.insert(start) {
            continue;
        }
        let mut comp: Vec<String> = Vec::new();
        let mut stack: Vec<&str> = vec![start];
        while let Some(v) = stack.pop() {
            comp.push(v.to_string());
            for w in g.neighbors(v) {
                if seen.insert(w) {
                    stack.push(w);
                }
            }
        }
        out.push(comp);
    }

    out
}
