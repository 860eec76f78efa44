use crate::model::LayoutGraph;
use rustc_hash::FxHashSet as HashSet;

/// Initial ordering: a depth-first walk from the leaf nodes in rank order, appending each
/// node to its rank as it is first reached.
pub fn init_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut simple: Vec<(i32, &str)> = g
        .nodes()
        .filter(|v| g.children(v).is_empty())
        .filter_map(|v| Some((g.node(v)?.rank?, v)))
        .collect();
    let Some(max_rank) = simple.iter().map(|&(r, _)| r).max() else {
        return Vec::new();
    };
    simple.sort_by_key(|&(r, _)| r);

    let mut layers: Vec<Vec<String>> = vec![Vec::new(); max_rank.max(0) as usize + 1];
    let mut visited: HashSet<&str> = HashSet::default();
    let mut stack: Vec<&str> = Vec::new();

    for (_, start) in simple {
        stack.push(start);
        while let Some(v) = stack.pop() {
            if !visited.insert(v) {
                continue;
            }
            if let Some(layer) = g.node(v).and_then(|n| n.rank).and_then(|r| layers.get_mut(r.max(0) as usize)) {
                layer.push(v.to_string());
            }
            stack.extend(g.successors(v).into_iter().rev());
        }
    }
    layers
}
