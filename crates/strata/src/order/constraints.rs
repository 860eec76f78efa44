use crate::graphlib::Graph;
use crate::order::LayerGraph;
use rustc_hash::FxHashMap as HashMap;

/// Records in `cg` the left-to-right order that `vs` gave to sibling clusters, so later ranks
/// keep those clusters in the same relative order.
pub fn add_subgraph_constraints(lg: &LayerGraph, cg: &mut Graph<(), (), ()>, vs: &[String]) {
    let mut prev: HashMap<&str, &str> = HashMap::default();
    let mut root_prev: Option<&str> = None;

    for v in vs {
        let mut child = lg.parent(v);
        while let Some(c) = child {
            let parent = lg.parent(c);
            let prev_child = match parent {
                Some(p) => prev.insert(p, c),
                None => root_prev.replace(c),
            };
            if let Some(prev_child) = prev_child.filter(|&p| p != c) {
                cg.set_edge(prev_child, c);
                break;
            }
            child = parent;
        }
    }
}
