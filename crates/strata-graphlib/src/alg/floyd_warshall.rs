use super::{Path, default_edges};
use crate::{EdgeKey, Graph};
use rustc_hash::FxHashMap as HashMap;
use std::collections::BTreeMap;

/// All-pairs shortest paths. Negative weights are allowed; negative cycles are not detected.
pub fn floyd_warshall<N, E, G, W>(
    g: &Graph<N, E, G>,
    weight: W,
) -> BTreeMap<String, BTreeMap<String, Path>>
where
    W: Fn(&EdgeKey) -> f64,
{
    let ids: Vec<&str> = g.nodes().collect();
    let n = ids.len();
    let pos: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, &v)| (v, i)).collect();

    let mut dist: Vec<Vec<f64>> = vec![vec![f64::INFINITY; n]; n];
    let mut pred: Vec<Vec<Option<usize>>> = vec![vec![None; n]; n];

    for (i, &v) in ids.iter().enumerate() {
        dist[i][i] = 0.0;
        for key in default_edges(g, v) {
            let Some(&j) = pos.get(key.other(v)) else {
                continue;
            };
            let d = weight(&key);
            if d < dist[i][j] {
                dist[i][j] = d;
                pred[i][j] = Some(i);
            }
        }
    }

    for k in 0..n {
        for i in 0..n {
            let ik = dist[i][k];
            if !ik.is_finite() {
                continue;
            }
            for j in 0..n {
                let alt = ik + dist[k][j];
                if alt < dist[i][j] {
                    dist[i][j] = alt;
                    pred[i][j] = pred[k][j];
                }
            }
        }
    }

    ids.iter()
        .enumerate()
        .map(|(i, v)| {
            let row = ids
                .iter()
                .enumerate()
                .map(|(j, w)| {
                    let path = Path {
                        distance: dist[i][j],
                        predecessor: pred[i][j].map(|p| ids[p].to_string()),
                    };
                    (w.to_string(), path)
                })
                .collect();
            (v.to_string(), row)
        })
        .collect()
}
