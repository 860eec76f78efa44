//! Barycenters, constraint-aware merging and the sort itself.

use crate::graphlib::Graph;
use crate::order::LayerGraph;
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub v: String,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

/// A run of nodes that moves as one unit. `i` is the smallest original index in the run.
#[derive(Debug, Clone, PartialEq)]
pub struct SortEntry {
    pub vs: Vec<String>,
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortResult {
    pub vs: Vec<String>,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

/// Weighted mean order of each node's neighbors in the fixed rank. Nodes without neighbors
/// get no barycenter.
pub fn barycenter(lg: &LayerGraph, movable: &[String]) -> Vec<BarycenterEntry> {
    movable
        .iter()
        .map(|v| {
            let mut sum = 0.0;
            let mut weight = 0.0;
            for e in lg.in_edges(v, None) {
                let w = lg.edge_by_key(&e).copied().unwrap_or(0.0);
                let order = lg.node(&e.v).and_then(|n| n.order).unwrap_or(0) as f64;
                sum += w * order;
                weight += w;
            }
            let (barycenter, weight) = if weight > 0.0 {
                (Some(sum / weight), Some(weight))
            } else {
                (None, None)
            };
            BarycenterEntry {
                v: v.clone(),
                barycenter,
                weight,
            }
        })
        .collect()
}

struct ConflictEntry {
    indegree: usize,
    ins: Vec<usize>,
    outs: Vec<usize>,
    vs: Vec<usize>,
    i: usize,
    barycenter: Option<f64>,
    weight: Option<f64>,
    merged: bool,
}

/// Merges entries whose barycenters contradict a constraint edge `v -> w` in `cg` (`v` must
/// stay left of `w`) into a single entry with their combined barycenter.
pub fn resolve_conflicts(entries: &[BarycenterEntry], cg: &Graph<(), (), ()>) -> Vec<SortEntry> {
    let index: HashMap<&str, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.v.as_str(), i))
        .collect();
    let mut conflicts: Vec<ConflictEntry> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| ConflictEntry {
            indegree: 0,
            ins: Vec::new(),
            outs: Vec::new(),
            vs: vec![i],
            i,
            barycenter: e.barycenter,
            weight: e.weight,
            merged: false,
        })
        .collect();

    for e in cg.edges() {
        let (Some(&v), Some(&w)) = (index.get(e.v.as_str()), index.get(e.w.as_str())) else {
            continue;
        };
        conflicts[w].indegree += 1;
        conflicts[v].outs.push(w);
    }

    let mut sources: Vec<usize> = (0..conflicts.len())
        .filter(|&i| conflicts[i].indegree == 0)
        .collect();
    let mut processed: Vec<usize> = Vec::with_capacity(conflicts.len());

    while let Some(v) = sources.pop() {
        processed.push(v);

        let ins = std::mem::take(&mut conflicts[v].ins);
        for u in ins.into_iter().rev() {
            if conflicts[u].merged {
                continue;
            }
            let merge = match (conflicts[u].barycenter, conflicts[v].barycenter) {
                (Some(ub), Some(vb)) => ub >= vb,
                _ => true,
            };
            if merge {
                merge_entries(&mut conflicts, v, u);
            }
        }

        let outs = std::mem::take(&mut conflicts[v].outs);
        for w in outs {
            conflicts[w].ins.push(v);
            conflicts[w].indegree -= 1;
            if conflicts[w].indegree == 0 {
                sources.push(w);
            }
        }
    }

    processed
        .into_iter()
        .filter(|&ix| !conflicts[ix].merged)
        .map(|ix| {
            let c = &conflicts[ix];
            SortEntry {
                vs: c.vs.iter().map(|&j| entries[j].v.clone()).collect(),
                i: c.i,
                barycenter: c.barycenter,
                weight: c.weight,
            }
        })
        .collect()
}

fn merge_entries(conflicts: &mut [ConflictEntry], target: usize, source: usize) {
    let mut sum = 0.0;
    let mut weight = 0.0;
    for ix in [target, source] {
        if let (Some(b), Some(w)) = (conflicts[ix].barycenter, conflicts[ix].weight) {
            if w != 0.0 {
                sum += b * w;
                weight += w;
            }
        }
    }

    let mut vs = std::mem::take(&mut conflicts[source].vs);
    vs.append(&mut conflicts[target].vs);
    let source_i = conflicts[source].i;
    conflicts[source].merged = true;

    let t = &mut conflicts[target];
    t.vs = vs;
    if weight != 0.0 {
        t.barycenter = Some(sum / weight);
        t.weight = Some(weight);
    }
    t.i = t.i.min(source_i);
}

/// Sorts entries by barycenter; ties go by original index, reversed when `bias_right`.
/// Entries without a barycenter keep their original index and are spliced in between.
pub fn sort(entries: &[SortEntry], bias_right: bool) -> SortResult {
    let (mut sortable, mut unsortable): (Vec<&SortEntry>, Vec<&SortEntry>) =
        entries.iter().partition(|e| e.barycenter.is_some());
    unsortable.sort_by(|a, b| b.i.cmp(&a.i));
    sortable.sort_by(|a, b| {
        let (ab, bb) = (a.barycenter.unwrap_or(0.0), b.barycenter.unwrap_or(0.0));
        ab.partial_cmp(&bb)
            .filter(|o| o.is_ne())
            .unwrap_or_else(|| if bias_right { b.i.cmp(&a.i) } else { a.i.cmp(&b.i) })
    });

    let mut vs: Vec<String> = Vec::new();
    let mut sum = 0.0;
    let mut weight = 0.0;
    let mut index = consume_unsortable(&mut vs, &mut unsortable, 0);

    for entry in sortable {
        index += entry.vs.len();
        vs.extend(entry.vs.iter().cloned());
        let w = entry.weight.unwrap_or(0.0);
        sum += entry.barycenter.unwrap_or(0.0) * w;
        weight += w;
        index = consume_unsortable(&mut vs, &mut unsortable, index);
    }
    for entry in unsortable.into_iter().rev() {
        vs.extend(entry.vs.iter().cloned());
    }

    let (barycenter, weight) = if weight != 0.0 {
        (Some(sum / weight), Some(weight))
    } else {
        (None, None)
    };
    SortResult { vs, barycenter, weight }
}

fn consume_unsortable(vs: &mut Vec<String>, unsortable: &mut Vec<&SortEntry>, mut index: usize) -> usize {
    while let Some(last) = unsortable.last().filter(|e| e.i <= index) {
        vs.extend(last.vs.iter().cloned());
        unsortable.pop();
        index += 1;
    }
    index
}

/// Orders the children of `v`, sorting nested clusters first and placing each cluster's
/// contents as one contiguous run between its border nodes.
pub fn sort_subgraph(lg: &LayerGraph, v: &str, cg: &Graph<(), (), ()>, bias_right: bool) -> SortResult {
    let mut sorted: HashMap<String, SortResult> = HashMap::default();
    for sg in clusters_postorder(lg, v) {
        let result = sort_cluster(lg, sg, cg, bias_right, &mut sorted);
        sorted.insert(sg.to_string(), result);
    }
    sorted.remove(v).unwrap_or_default()
}

fn sort_cluster(
    lg: &LayerGraph,
    v: &str,
    cg: &Graph<(), (), ()>,
    bias_right: bool,
    sorted: &mut HashMap<String, SortResult>,
) -> SortResult {
    let node = lg.node(v);
    let bl = node.and_then(|n| n.border_left.clone());
    let br = node.and_then(|n| n.border_right.clone());

    let movable: Vec<String> = lg
        .children(v)
        .into_iter()
        .filter(|&w| bl.as_deref() != Some(w) && br.as_deref() != Some(w))
        .map(str::to_string)
        .collect();

    let mut subgraphs: HashMap<String, SortResult> = HashMap::default();
    let mut barycenters = barycenter(lg, &movable);
    for entry in &mut barycenters {
        if let Some(result) = sorted.remove(&entry.v) {
            merge_barycenters(entry, &result);
            subgraphs.insert(entry.v.clone(), result);
        }
    }

    let mut entries = resolve_conflicts(&barycenters, cg);
    for entry in &mut entries {
        entry.vs = entry
            .vs
            .iter()
            .flat_map(|w| match subgraphs.get(w) {
                Some(sg) => sg.vs.clone(),
                None => vec![w.clone()],
            })
            .collect();
    }

    let mut result = sort(&entries, bias_right);

    if let (Some(bl), Some(br)) = (bl, br) {
        let bl_pred = lg.predecessors(&bl).first().and_then(|p| lg.node(p)).and_then(|n| n.order);
        let br_pred = lg.predecessors(&br).first().and_then(|p| lg.node(p)).and_then(|n| n.order);

        let mut vs = Vec::with_capacity(result.vs.len() + 2);
        vs.push(bl);
        vs.append(&mut result.vs);
        vs.push(br);
        result.vs = vs;

        if let (Some(bl_order), Some(br_order)) = (bl_pred, br_pred) {
            let bc = result.barycenter.unwrap_or(0.0);
            let w = result.weight.unwrap_or(0.0);
            result.barycenter = Some((bc * w + bl_order as f64 + br_order as f64) / (w + 2.0));
            result.weight = Some(w + 2.0);
        }
    }

    result
}

fn merge_barycenters(target: &mut BarycenterEntry, other: &SortResult) {
    let (Some(other_bc), Some(other_w)) = (other.barycenter, other.weight) else {
        return;
    };
    match (target.barycenter, target.weight) {
        (Some(bc), Some(w)) => {
            target.barycenter = Some((bc * w + other_bc * other_w) / (w + other_w));
            target.weight = Some(w + other_w);
        }
        _ => {
            target.barycenter = Some(other_bc);
            target.weight = Some(other_w);
        }
    }
}

/// `v` and every cluster below it, children before parents.
fn clusters_postorder<'a>(lg: &'a LayerGraph, v: &'a str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut stack: Vec<(&str, bool)> = vec![(v, false)];
    while let Some((w, expanded)) = stack.pop() {
        if expanded {
            out.push(w);
            continue;
        }
        stack.push((w, true));
        for c in lg.children(w).into_iter().rev() {
            if !lg.children(c).is_empty() {
                stack.push((c, false));
            }
        }
    }
    out
}
