use super::{Relationship, add_subgraph_constraints, build_layer_graph, cross_count, init_order, sort_subgraph};
use crate::Result;
use crate::graphlib::{Graph, GraphOptions};
use crate::model::LayoutGraph;
use crate::util::build_layer_matrix;

/// Assigns `order` to every ranked node.
///
/// Starts from [`init_order`], then sweeps up and down the ranks until four consecutive
/// sweeps fail to lower the crossing count. The best swept layering is kept; on ties the
/// earlier one wins. The seed itself never competes, since it ignores cluster borders.
pub fn order(g: &mut LayoutGraph) -> Result<()> {
    let mut nodes_by_rank: Vec<Vec<String>> = Vec::new();
    g.for_each_node(|v, node| {
        let span = match (node.rank, node.min_rank, node.max_rank) {
            (Some(r), _, _) => r..=r,
            (None, Some(lo), Some(hi)) => lo..=hi,
            _ => return,
        };
        for r in span {
            let idx = r.max(0) as usize;
            if nodes_by_rank.len() <= idx {
                nodes_by_rank.resize_with(idx + 1, Vec::new);
            }
            nodes_by_rank[idx].push(v.to_string());
        }
    });
    if nodes_by_rank.is_empty() {
        return Ok(());
    }
    let max_rank = nodes_by_rank.len() - 1;

    let layering = init_order(g);
    assign_order(g, &layering);

    let mut best_cc = f64::INFINITY;
    let mut best = layering;
    let mut i = 0usize;
    let mut last_best = 0usize;
    while last_best < 4 {
        let bias_right = i % 4 >= 2;
        if i % 2 == 1 {
            sweep(g, &nodes_by_rank, 1..=max_rank, Relationship::InEdges, bias_right)?;
        } else {
            sweep(g, &nodes_by_rank, (0..max_rank).rev(), Relationship::OutEdges, bias_right)?;
        }

        let layering = build_layer_matrix(g);
        let cc = cross_count(g, &layering);
        tracing::trace!(sweep = i, crossings = cc, "ordering sweep");
        if cc < best_cc {
            last_best = 0;
            best_cc = cc;
            best = layering;
        }
        i += 1;
        last_best += 1;
    }

    assign_order(g, &best);
    tracing::debug!(crossings = best_cc, sweeps = i, "ordered ranks");
    Ok(())
}

fn sweep(
    g: &mut LayoutGraph,
    nodes_by_rank: &[Vec<String>],
    ranks: impl Iterator<Item = usize>,
    relationship: Relationship,
    bias_right: bool,
) -> Result<()> {
    let mut cg: Graph<(), (), ()> = Graph::new(GraphOptions::default());
    for rank in ranks {
        let lg = build_layer_graph(g, rank as i32, relationship, &nodes_by_rank[rank])?;
        let sorted = sort_subgraph(&lg, &lg.graph().root, &cg, bias_right);
        for (i, v) in sorted.vs.iter().enumerate() {
            if let Some(n) = g.node_mut(v) {
                n.order = Some(i);
            }
        }
        add_subgraph_constraints(&lg, &mut cg, &sorted.vs);
    }
    Ok(())
}

fn assign_order(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    for layer in layering {
        for (i, v) in layer.iter().enumerate() {
            if let Some(n) = g.node_mut(v) {
                n.order = Some(i);
            }
        }
    }
}
