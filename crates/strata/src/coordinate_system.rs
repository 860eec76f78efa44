//! Rank direction adapter.
//!
//! Ranking, ordering and positioning always work top to bottom. [`adjust`] swaps node sizes
//! for horizontal layouts before positioning and [`undo`] maps the resulting coordinates,
//! including edge route points, into the requested direction.

use crate::model::{LayoutGraph, RankDir};

pub fn adjust(g: &mut LayoutGraph) {
    if g.graph().config.rankdir.is_horizontal() {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut LayoutGraph) {
    let rankdir = g.graph().config.rankdir;
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
    if rankdir.is_horizontal() {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, n| {
        (n.width, n.height) = (n.height, n.width);
    });
}

fn reverse_y(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, n| {
        if let Some(y) = n.y.as_mut() {
            *y = -*y;
        }
    });
    g.for_each_edge_mut(|_, e| {
        for p in &mut e.points {
            p.y = -p.y;
        }
    });
}

fn swap_xy(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, n| {
        (n.x, n.y) = (n.y, n.x);
    });
    g.for_each_edge_mut(|_, e| {
        for p in &mut e.points {
            (p.x, p.y) = (p.y, p.x);
        }
    });
}
