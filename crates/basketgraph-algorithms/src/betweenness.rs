//! Edge betweenness centrality
//!
//! Brandes (2001) accumulation, adapted to score edges instead of nodes:
//! every edge `(v, w)` on a shortest path DAG from `s` receives
//! `σ_sv / σ_sw × (1 + δ_s(w))`. Sources are processed in parallel.

use super::common::{EdgeIdx, GraphView};
use rayon::prelude::*;
use std::collections::VecDeque;

/// Compute edge betweenness over the edges marked `active`.
///
/// With `undirected` set, edges are traversed in both directions and each
/// shortest path (seen once from either end) is halved, so scores match the
/// usual undirected definition. Inactive edges score 0.0 and are ignored
/// during traversal.
pub fn edge_betweenness(view: &GraphView, active: &[bool], undirected: bool) -> Vec<f64> {
    let m = view.edge_count();
    debug_assert_eq!(active.len(), m);

    if view.node_count == 0 || m == 0 {
        return vec![0.0; m];
    }

    let mut scores = (0..view.node_count)
        .into_par_iter()
        .map(|source| single_source(view, active, undirected, source))
        .reduce(
            || vec![0.0; m],
            |mut acc, part| {
                for (a, p) in acc.iter_mut().zip(part) {
                    *a += p;
                }
                acc
            },
        );

    if undirected {
        for s in &mut scores {
            *s /= 2.0;
        }
    }

    scores
}

/// BFS from one source followed by the dependency back-propagation.
fn single_source(view: &GraphView, active: &[bool], undirected: bool, source: usize) -> Vec<f64> {
    let n = view.node_count;
    let mut sigma = vec![0.0_f64; n];
    let mut dist = vec![-1_i64; n];
    let mut preds: Vec<Vec<(usize, EdgeIdx)>> = vec![Vec::new(); n];
    let mut order = Vec::with_capacity(n);

    sigma[source] = 1.0;
    dist[source] = 0;
    let mut queue = VecDeque::from([source]);

    while let Some(v) = queue.pop_front() {
        order.push(v);

        let mut visit = |w: usize, e: EdgeIdx| {
            if !active[e] {
                return;
            }
            if dist[w] < 0 {
                dist[w] = dist[v] + 1;
                queue.push_back(w);
            }
            if dist[w] == dist[v] + 1 {
                sigma[w] += sigma[v];
                preds[w].push((v, e));
            }
        };

        if undirected {
            for (w, e) in view.undirected_neighbors(v) {
                visit(w, e);
            }
        } else {
            for e in view.out_edges(v) {
                visit(view.out_targets[e], e);
            }
        }
    }

    let mut delta = vec![0.0_f64; n];
    let mut scores = vec![0.0_f64; view.edge_count()];

    for &w in order.iter().rev() {
        for &(v, e) in &preds[w] {
            let contribution = sigma[v] / sigma[w] * (1.0 + delta[w]);
            scores[e] += contribution;
            delta[v] += contribution;
        }
    }

    scores
}
