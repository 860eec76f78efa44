//! Brandes-Köpf horizontal coordinate assignment.
//!
//! "Fast and Simple Horizontal Coordinate Assignment", Ulrik Brandes and Boris Köpf. Each of
//! the four alignments packs nodes into vertical blocks around their median neighbors and
//! compacts the blocks left (or right). The results are aligned to the narrowest one and
//! averaged, unless the graph asks for a single alignment.

use crate::graphlib::{Graph, GraphOptions};
use crate::model::{Align, BorderType, Dummy, LayoutGraph};
use crate::util::build_layer_matrix;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub const ALIGNMENTS: [Align; 4] = [Align::UL, Align::UR, Align::DL, Align::DR];

/// Unordered node pairs that must not share a block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conflicts(HashSet<(String, String)>);

impl Conflicts {
    pub fn add(&mut self, v: &str, w: &str) {
        let (v, w) = if v <= w { (v, w) } else { (w, v) };
        self.0.insert((v.to_string(), w.to_string()));
    }

    pub fn has(&self, v: &str, w: &str) -> bool {
        let (v, w) = if v <= w { (v, w) } else { (w, v) };
        self.0.contains(&(v.to_string(), w.to_string()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend(&mut self, other: Conflicts) {
        self.0.extend(other.0);
    }
}

fn is_dummy(g: &LayoutGraph, v: &str) -> bool {
    g.node(v).is_some_and(|n| n.dummy.is_some())
}

fn order_of(g: &LayoutGraph, v: &str) -> usize {
    g.node(v).and_then(|n| n.order).unwrap_or(0)
}

/// Type-1 conflicts: a non-inner segment crossing an inner segment (an edge between two
/// dummies). The inner segment wins.
pub fn find_type1_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::default();

    for pair in layering.windows(2) {
        let (prev_layer, layer) = (&pair[0], &pair[1]);
        let mut k0 = 0usize;
        let mut scan_pos = 0usize;

        for (i, v) in layer.iter().enumerate() {
            let w = other_inner_segment_node(g, v);
            let k1 = w.map_or(prev_layer.len(), |w| order_of(g, w));

            if w.is_none() && i + 1 != layer.len() {
                continue;
            }
            for scan_node in &layer[scan_pos..=i] {
                for u in g.predecessors(scan_node) {
                    let u_pos = order_of(g, u);
                    if (u_pos < k0 || k1 < u_pos) && !(is_dummy(g, u) && is_dummy(g, scan_node)) {
                        conflicts.add(u, scan_node);
                    }
                }
            }
            scan_pos = i + 1;
            k0 = k1;
        }
    }

    conflicts
}

/// Type-2 conflicts: two inner segments crossing, where one runs along a cluster border.
pub fn find_type2_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::default();

    for pair in layering.windows(2) {
        let (north, south) = (&pair[0], &pair[1]);
        let mut prev_north_pos: isize = -1;
        let mut south_pos = 0usize;

        for (lookahead, v) in south.iter().enumerate() {
            if g.node(v).and_then(|n| n.dummy) != Some(Dummy::Border) {
                continue;
            }
            let Some(&u) = g.predecessors(v).first() else {
                continue;
            };
            let next_north_pos = order_of(g, u) as isize;
            scan_inner_segments(g, &mut conflicts, &south[south_pos..lookahead], prev_north_pos, next_north_pos);
            south_pos = lookahead;
            prev_north_pos = next_north_pos;
        }
        scan_inner_segments(g, &mut conflicts, &south[south_pos..], prev_north_pos, north.len() as isize);
    }

    conflicts
}

fn scan_inner_segments(g: &LayoutGraph, conflicts: &mut Conflicts, south: &[String], lo: isize, hi: isize) {
    for v in south.iter().filter(|v| is_dummy(g, v)) {
        for u in g.predecessors(v) {
            if !is_dummy(g, u) {
                continue;
            }
            let pos = order_of(g, u) as isize;
            if pos < lo || pos > hi {
                conflicts.add(u, v);
            }
        }
    }
}

fn other_inner_segment_node<'g>(g: &'g LayoutGraph, v: &str) -> Option<&'g str> {
    if !is_dummy(g, v) {
        return None;
    }
    g.predecessors(v).into_iter().find(|u| is_dummy(g, u))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    /// Block root of every node.
    pub root: HashMap<String, String>,
    /// Next node of the block, cycling back to the root.
    pub align: HashMap<String, String>,
}

/// Aligns every node with a median neighbor returned by `neighbors`, walking `layering`
/// top to bottom and each layer left to right.
pub fn vertical_alignment<'g, F>(layering: &[Vec<String>], conflicts: &Conflicts, neighbors: F) -> Alignment
where
    F: Fn(&str) -> Vec<&'g str>,
{
    let mut alignment = Alignment::default();
    let mut pos: HashMap<&str, usize> = HashMap::default();
    for layer in layering {
        for (i, v) in layer.iter().enumerate() {
            alignment.root.insert(v.clone(), v.clone());
            alignment.align.insert(v.clone(), v.clone());
            pos.insert(v.as_str(), i);
        }
    }

    for layer in layering {
        let mut prev_idx: isize = -1;
        for v in layer {
            let mut ws = neighbors(v);
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|w| pos.get(w).copied().unwrap_or(usize::MAX));
            let mp = (ws.len() - 1) as f64 / 2.0;

            for w in &ws[mp.floor() as usize..=mp.ceil() as usize] {
                let Some(&w_pos) = pos.get(w) else {
                    continue;
                };
                let unaligned = alignment.align.get(v.as_str()) == Some(v);
                if unaligned && prev_idx < w_pos as isize && !conflicts.has(v, w) {
                    let w_root = alignment.root.get(*w).cloned().unwrap_or_else(|| w.to_string());
                    alignment.align.insert(w.to_string(), v.clone());
                    alignment.align.insert(v.clone(), w_root.clone());
                    alignment.root.insert(v.clone(), w_root);
                    prev_idx = w_pos as isize;
                }
            }
        }
    }

    alignment
}

/// Places every block as far left as its separation constraints allow, then pulls blocks
/// right to close gaps they do not need. Returns the x of every node.
pub fn horizontal_compaction(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    alignment: &Alignment,
    reverse_sep: bool,
) -> HashMap<String, f64> {
    let block_g = build_block_graph(g, layering, &alignment.root);
    let border_type = if reverse_sep {
        BorderType::Left
    } else {
        BorderType::Right
    };
    let mut xs: HashMap<String, f64> = HashMap::default();

    iterate(&block_g, |v| block_g.predecessors(v), |v| {
        let x = block_g
            .in_edges(v, None)
            .iter()
            .map(|e| xs.get(&e.v).copied().unwrap_or(0.0) + block_g.edge_by_key(e).copied().unwrap_or(0.0))
            .fold(0.0, f64::max);
        xs.insert(v.to_string(), x);
    });

    iterate(&block_g, |v| block_g.successors(v), |v| {
        let min = block_g
            .out_edges(v, None)
            .iter()
            .map(|e| xs.get(&e.w).copied().unwrap_or(0.0) - block_g.edge_by_key(e).copied().unwrap_or(0.0))
            .fold(f64::INFINITY, f64::min);
        let on_border = g.node(v).and_then(|n| n.border_type) == Some(border_type);
        if min.is_finite() && !on_border {
            let x = xs.entry(v.to_string()).or_insert(0.0);
            *x = x.max(min);
        }
    });

    alignment
        .align
        .keys()
        .map(|v| {
            let root = alignment.root.get(v).unwrap_or(v);
            (v.clone(), xs.get(root).copied().unwrap_or(0.0))
        })
        .collect()
}

// Postorder over the block graph along `next`, calling `set` once all of a node's `next`
// nodes are placed.
fn iterate<'b, N, S>(block_g: &'b Graph<(), f64, ()>, next: N, mut set: S)
where
    N: Fn(&str) -> Vec<&'b str>,
    S: FnMut(&str),
{
    let mut stack: Vec<&str> = block_g.nodes().collect();
    let mut visited: HashSet<&str> = HashSet::default();
    while let Some(v) = stack.pop() {
        if visited.contains(v) {
            set(v);
            continue;
        }
        visited.insert(v);
        stack.push(v);
        stack.extend(next(v));
    }
}

/// One node per block; an edge `u -> v` carries the minimum distance between the blocks of
/// two neighbors in some layer.
fn build_block_graph(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    root: &HashMap<String, String>,
) -> Graph<(), f64, ()> {
    let mut block_g: Graph<(), f64, ()> = Graph::new(GraphOptions::default());
    for layer in layering {
        let mut prev: Option<&str> = None;
        for v in layer {
            let v_root = root.get(v).unwrap_or(v);
            block_g.ensure_node(v_root.clone());
            if let Some(u) = prev {
                let u_root = root.get(u).map_or(u, String::as_str);
                let prev_sep = block_g.edge(u_root, v_root, None).copied().unwrap_or(0.0);
                let sep = separation(g, v, u);
                block_g.set_edge_with_label(u_root.to_string(), v_root.clone(), sep.max(prev_sep));
            }
            prev = Some(v);
        }
    }
    block_g
}

/// Minimum center distance between neighbors `v` and `w`: half of each width plus half of
/// `nodesep` for real nodes or `edgesep` for dummies.
fn separation(g: &LayoutGraph, v: &str, w: &str) -> f64 {
    let config = &g.graph().config;
    let half = |id: &str| {
        g.node(id).map_or(0.0, |n| {
            let spacing = if n.dummy.is_some() { config.edgesep } else { config.nodesep };
            (n.width + spacing) / 2.0
        })
    };
    half(v) + half(w)
}

fn width(g: &LayoutGraph, v: &str) -> f64 {
    g.node(v).map_or(0.0, |n| n.width)
}

/// Index into the four coordinate sets of the alignment that spans the least width.
pub fn find_smallest_width_alignment(g: &LayoutGraph, xss: &[HashMap<String, f64>; 4]) -> usize {
    let mut best = 0usize;
    let mut best_width = f64::INFINITY;
    for (i, xs) in xss.iter().enumerate() {
        let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
        for (v, &x) in xs {
            let half = width(g, v) / 2.0;
            min = min.min(x - half);
            max = max.max(x + half);
        }
        if max - min < best_width {
            best_width = max - min;
            best = i;
        }
    }
    best
}

/// Shifts each left alignment so its minimum matches the reference's minimum, and each right
/// alignment so its maximum matches the reference's maximum.
pub fn align_coordinates(xss: &mut [HashMap<String, f64>; 4], align_to: usize) {
    let bounds = |xs: &HashMap<String, f64>| {
        xs.values()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)))
    };
    let (to_min, to_max) = bounds(&xss[align_to]);

    for (i, align) in ALIGNMENTS.iter().enumerate() {
        if i == align_to || xss[i].is_empty() {
            continue;
        }
        let (min, max) = bounds(&xss[i]);
        let delta = match align {
            Align::UL | Align::DL => to_min - min,
            Align::UR | Align::DR => to_max - max,
        };
        if delta != 0.0 {
            for x in xss[i].values_mut() {
                *x += delta;
            }
        }
    }
}

/// Final x per node: the chosen alignment, or the mean of the two median candidates.
///
/// Only the median pair is averaged, not all four candidates. Same-rank separation still holds
/// because each order statistic of the candidates preserves it.
pub fn balance(xss: &[HashMap<String, f64>; 4], align: Option<Align>) -> HashMap<String, f64> {
    xss[0]
        .keys()
        .map(|v| {
            let x = match align {
                Some(a) => {
                    let i = ALIGNMENTS.iter().position(|&b| b == a).unwrap_or(0);
                    xss[i].get(v).copied().unwrap_or(0.0)
                }
                None => {
                    let mut vals: Vec<f64> = xss.iter().filter_map(|xs| xs.get(v).copied()).collect();
                    vals.sort_by(f64::total_cmp);
                    match vals.len() {
                        4 => (vals[1] + vals[2]) / 2.0,
                        0 => 0.0,
                        n => vals[n / 2],
                    }
                }
            };
            (v.clone(), x)
        })
        .collect()
}

/// x coordinate of every node of the (non-compound) graph.
pub fn position_x(g: &LayoutGraph) -> HashMap<String, f64> {
    let layering = build_layer_matrix(g);
    let mut conflicts = find_type1_conflicts(g, &layering);
    conflicts.extend(find_type2_conflicts(g, &layering));
    tracing::trace!(conflicts = conflicts.len(), "marked alignment conflicts");

    let mut xss: [HashMap<String, f64>; 4] = Default::default();
    for (i, align) in ALIGNMENTS.iter().enumerate() {
        let up = matches!(align, Align::UL | Align::UR);
        let right = matches!(align, Align::UR | Align::DR);

        let mut adjusted: Vec<Vec<String>> = if up {
            layering.clone()
        } else {
            layering.iter().rev().cloned().collect()
        };
        if right {
            for layer in &mut adjusted {
                layer.reverse();
            }
        }

        let alignment = if up {
            vertical_alignment(&adjusted, &conflicts, |v| g.predecessors(v))
        } else {
            vertical_alignment(&adjusted, &conflicts, |v| g.successors(v))
        };
        let mut xs = horizontal_compaction(g, &adjusted, &alignment, right);
        if right {
            for x in xs.values_mut() {
                *x = -*x;
            }
        }
        xss[i] = xs;
    }

    let smallest = find_smallest_width_alignment(g, &xss);
    align_coordinates(&mut xss, smallest);
    let align = g.graph().config.align;
    tracing::debug!(reference = ?ALIGNMENTS[smallest], forced = ?align, "balanced alignments");
    balance(&xss, align)
}
