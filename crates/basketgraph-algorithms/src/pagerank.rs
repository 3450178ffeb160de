//! PageRank over weighted edges
//!
//! Used to size nodes when drawing rule graphs: products that many
//! high-confidence rules point at rank higher.

use super::common::{GraphView, NodeId};
use std::collections::HashMap;

/// PageRank configuration
#[derive(Debug, Clone, Copy)]
pub struct PageRankConfig {
    /// Damping factor (usually 0.85)
    pub damping_factor: f64,
    /// Maximum number of iterations
    pub iterations: usize,
    /// Stop once the L1 change between iterations drops below this
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            iterations: 20,
            tolerance: 0.0001,
        }
    }
}

/// Calculate PageRank for the graph view
///
/// Scores start at 1.0 and use the `(1 - d) + d * Σ` form, so the mean score
/// stays close to 1.0. Each node splits its score across outgoing edges in
/// proportion to edge weight; unweighted views split evenly.
pub fn page_rank(view: &GraphView, config: PageRankConfig) -> HashMap<NodeId, f64> {
    let n = view.node_count;

    if n == 0 {
        return HashMap::new();
    }

    let out_weight: Vec<f64> = (0..n)
        .map(|i| view.out_edges(i).map(|e| view.edge_weight(e)).sum())
        .collect();

    let mut scores = vec![1.0; n];
    let mut next_scores = vec![0.0; n];

    let d = config.damping_factor;
    let base_score = 1.0 - d;

    for _ in 0..config.iterations {
        next_scores.iter_mut().for_each(|s| *s = 0.0);

        for source in 0..n {
            if out_weight[source] <= 0.0 {
                continue;
            }
            let share = scores[source] / out_weight[source];
            for e in view.out_edges(source) {
                next_scores[view.out_targets[e]] += share * view.edge_weight(e);
            }
        }

        let mut total_diff = 0.0;
        for i in 0..n {
            let updated = base_score + d * next_scores[i];
            total_diff += (updated - scores[i]).abs();
            scores[i] = updated;
        }

        if total_diff < config.tolerance {
            break;
        }
    }

    scores
        .into_iter()
        .enumerate()
        .map(|(idx, score)| (view.index_to_node[idx], score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_outranks_sources() {
        // 1 -> 3, 2 -> 3
        let view = GraphView::from_edges(vec![1, 2, 3], vec![(0, 2), (1, 2)]);
        let ranks = page_rank(&view, PageRankConfig::default());

        assert!(ranks[&3] > ranks[&1]);
        assert!((ranks[&1] - ranks[&2]).abs() < 1e-12);
        assert!((ranks[&1] - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_weights_steer_rank() {
        // 1 -> 2 (0.9), 1 -> 3 (0.1)
        let view = GraphView::from_weighted_edges(vec![1, 2, 3], vec![(0, 1, 0.9), (0, 2, 0.1)]);
        let ranks = page_rank(&view, PageRankConfig::default());
        assert!(ranks[&2] > ranks[&3]);
    }

    #[test]
    fn test_empty_view() {
        let view = GraphView::default();
        assert!(page_rank(&view, PageRankConfig::default()).is_empty());
    }
}
