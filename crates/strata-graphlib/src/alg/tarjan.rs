use crate::Graph;
use rustc_hash::FxHashMap as HashMap;

#[derive(Clone, Copy)]
struct Visit {
    index: usize,
    low: usize,
    on_stack: bool,
}

#[derive(Default)]
struct Tarjan<'g> {
    next_index: usize,
    visits: HashMap<&'g str, Visit>,
    scc_stack: Vec<&'g str>,
}

impl<'g> Tarjan<'g> {
    fn enter(&mut self, v: &'g str) {
        self.visits.insert(
            v,
            Visit {
                index: self.next_index,
                low: self.next_index,
                on_stack: true,
            },
        );
        self.next_index += 1;
        self.scc_stack.push(v);
    }

    fn lower(&mut self, v: &str, low: usize) {
        if let Some(visit) = self.visits.get_mut(v) {
            visit.low = visit.low.min(low);
        }
    }

    fn pop_component(&mut self, root: &str) -> Vec<String> {
        let mut comp: Vec<String> = Vec::new();
        while let Some(w) = self.scc_stack.pop() {
            if let Some(visit) = self.visits.get_mut(w) {
                visit.on_stack = false;
            }
            comp.push(w.to_string());
            if w == root {
                break;
            }
        }
        comp
    }
}

/// Strongly connected components (Tarjan), each listed in the order its nodes leave the
/// component stack.
pub fn tarjan<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>> {
    let mut state = Tarjan::default();
    let mut out: Vec<Vec<String>> = Vec::new();

    for root in g.nodes() {
        if state.visits.contains_key(root) {
            continue;
        }
        state.enter(root);
        let mut call_stack: Vec<(&str, Vec<&str>, usize)> = vec![(root, g.successors(root), 0)];

        while let Some((v, succs, i)) = call_stack.last_mut() {
            let v = *v;
            if let Some(&w) = succs.get(*i) {
                *i += 1;
                match state.visits.get(w).copied() {
                    None => {
                        state.enter(w);
                        call_stack.push((w, g.successors(w), 0));
                    }
                    Some(visit) if visit.on_stack => state.lower(v, visit.index),
                    Some(_) => {}
                }
                continue;
            }

            call_stack.pop();
            let Some(visit) = state.visits.get(v).copied() else {
                continue;
            };
            if visit.low == visit.index {
                out.push(state.pop_component(v));
            }
            if let Some(&(parent, _, _)) = call_stack.last() {
                state.lower(parent, visit.low);
            }
        }
    }

    out
}

/// Strongly connected components that contain a cycle: more than one node, or a single node
/// with a self-loop.
pub fn find_cycles<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>> {
    tarjan(g)
        .into_iter()
        .filter(|comp| match comp.as_slice() {
            [v] => !g.out_edges(v, Some(v)).is_empty(),
            _ => true,
        })
        .collect()
}
