//! Community detection algorithms
//!
//! - Weakly connected components (union-find)
//! - Girvan–Newman divisive clustering by edge betweenness, cut at maximum modularity

use super::betweenness::edge_betweenness;
use super::common::{GraphView, NodeId};
use std::collections::HashMap;

/// Relative tolerance when comparing betweenness and modularity scores.
const EPSILON: f64 = 1e-9;

/// Result of WCC algorithm
#[derive(Debug, Clone)]
pub struct WccResult {
    /// Map of Component ID -> List of NodeIds
    pub components: HashMap<usize, Vec<NodeId>>,
    /// Map of NodeId -> Component ID
    pub node_component: HashMap<NodeId, usize>,
}

/// Result of edge-betweenness community detection
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommunityResult {
    /// Communities, each a list of NodeIds. Ordered by the smallest dense
    /// index they contain, so output is deterministic.
    pub communities: Vec<Vec<NodeId>>,
    /// Map of NodeId -> position in `communities`
    pub node_community: HashMap<NodeId, usize>,
    /// Modularity of the returned partition
    pub modularity: f64,
    /// Number of edges removed before the returned partition appeared
    pub removed_edges: usize,
}

/// Union-Find data structure
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            self.parent[i] = self.find(self.parent[i]); // Path compression
        }
        self.parent[i]
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }
}

/// Dense component labels (0..k) over the active edges.
///
/// Labels are assigned in order of the lowest node index in each component.
fn component_labels(view: &GraphView, active: &[bool]) -> (Vec<usize>, usize) {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    for (e, &on) in active.iter().enumerate() {
        if on {
            let (u, v) = view.endpoints(e);
            uf.union(u, v);
        }
    }

    let mut root_label: HashMap<usize, usize> = HashMap::new();
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let root = uf.find(i);
        let next = root_label.len();
        labels.push(*root_label.entry(root).or_insert(next));
    }

    let count = root_label.len();
    (labels, count)
}

/// Weakly Connected Components (WCC)
///
/// Finds all disjoint subgraphs in the graph.
/// Ignores edge direction.
pub fn weakly_connected_components(view: &GraphView) -> WccResult {
    let active = vec![true; view.edge_count()];
    let (labels, _) = component_labels(view, &active);

    let mut components = HashMap::new();
    let mut node_component = HashMap::new();

    for (i, &label) in labels.iter().enumerate() {
        let node_id = view.index_to_node[i];
        components.entry(label).or_insert_with(Vec::new).push(node_id);
        node_component.insert(node_id, label);
    }

    WccResult {
        components,
        node_component,
    }
}

/// Weighted Newman–Girvan modularity of a partition, treating the view as undirected.
///
/// `membership[i]` is the community of dense node `i`. Returns 0.0 for a
/// graph without edge weight.
pub fn modularity(view: &GraphView, membership: &[usize]) -> f64 {
    let communities = membership.iter().copied().max().map_or(0, |m| m + 1);
    let mut internal = vec![0.0_f64; communities];
    let mut degree = vec![0.0_f64; communities];
    let mut total = 0.0_f64;

    for e in 0..view.edge_count() {
        let (u, v) = view.endpoints(e);
        let w = view.edge_weight(e);
        total += w;
        degree[membership[u]] += w;
        degree[membership[v]] += w;
        if membership[u] == membership[v] {
            internal[membership[u]] += 2.0 * w;
        }
    }

    if total <= 0.0 {
        return 0.0;
    }

    let two_m = 2.0 * total;
    internal
        .iter()
        .zip(&degree)
        .map(|(&inside, &deg)| inside / two_m - (deg / two_m).powi(2))
        .sum()
}

/// Girvan–Newman community detection.
///
/// Repeatedly removes the edge with the highest (unweighted, undirected)
/// betweenness, recomputing betweenness after each removal. Every time the
/// number of components grows, the weighted modularity of the new partition
/// is evaluated; the partition with the highest modularity wins. Ties keep
/// the coarser (earlier) partition.
///
/// Every node ends up in exactly one community, including isolated nodes.
pub fn edge_betweenness_communities(view: &GraphView) -> CommunityResult {
    let n = view.node_count;
    if n == 0 {
        return CommunityResult::default();
    }

    let m = view.edge_count();
    let mut active = vec![true; m];

    let (mut best_labels, mut components) = component_labels(view, &active);
    let mut best_q = modularity(view, &best_labels);
    let mut best_removed = 0;

    for removed in 1..=m {
        let scores = edge_betweenness(view, &active, true);

        // Highest score among active edges; lowest index breaks ties
        let mut target: Option<usize> = None;
        for e in (0..m).filter(|&e| active[e]) {
            match target {
                Some(t) if scores[e] <= scores[t] + EPSILON => {}
                _ => target = Some(e),
            }
        }
        let Some(edge) = target else { break };
        active[edge] = false;

        let (labels, count) = component_labels(view, &active);
        if count > components {
            components = count;
            let q = modularity(view, &labels);
            if q > best_q + EPSILON {
                best_q = q;
                best_labels = labels;
                best_removed = removed;
            }
        }
    }

    build_result(view, &best_labels, best_q, best_removed)
}

fn build_result(view: &GraphView, labels: &[usize], modularity: f64, removed_edges: usize) -> CommunityResult {
    let count = labels.iter().copied().max().map_or(0, |m| m + 1);
    let mut communities = vec![Vec::new(); count];
    let mut node_community = HashMap::with_capacity(labels.len());

    for (idx, &label) in labels.iter().enumerate() {
        let node_id = view.index_to_node[idx];
        communities[label].push(node_id);
        node_community.insert(node_id, label);
    }

    CommunityResult {
        communities,
        node_community,
        modularity,
        removed_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn two_triangles() -> GraphView {
        // Nodes 1..=6: triangles {1,2,3} and {4,5,6} joined by 3-4
        let edges = vec![(0, 1), (1, 2), (0, 2), (2, 3), (3, 4), (4, 5), (3, 5)];
        GraphView::from_edges(vec![1, 2, 3, 4, 5, 6], edges)
    }

    #[test]
    fn test_wcc() {
        // Nodes: 1, 2, 3, 4, 5, 6
        // Edges: 1->2, 3->4->5, 6 (isolated)
        let view = GraphView::from_edges(vec![1, 2, 3, 4, 5, 6], vec![(0, 1), (2, 3), (3, 4)]);

        let result = weakly_connected_components(&view);

        assert_eq!(result.components.len(), 3);

        let c1 = result.node_component[&1];
        let c2 = result.node_component[&2];
        assert_eq!(c1, c2);

        let c3 = result.node_component[&3];
        let c4 = result.node_component[&4];
        let c5 = result.node_component[&5];
        assert_eq!(c3, c4);
        assert_eq!(c4, c5);
        assert_ne!(c1, c3);
    }

    #[test]
    fn test_modularity_of_natural_split() {
        let view = two_triangles();
        let split = vec![0, 0, 0, 1, 1, 1];
        let single = vec![0; 6];

        // 7 edges, each side has 3 internal edges and degree sum 7
        let expected = 2.0 * (6.0 / 14.0 - (7.0_f64 / 14.0).powi(2));
        assert!((modularity(&view, &split) - expected).abs() < 1e-9);
        assert!(modularity(&view, &single).abs() < 1e-9);
    }

    #[test]
    fn test_girvan_newman_splits_at_bridge() {
        let view = two_triangles();
        let result = edge_betweenness_communities(&view);

        assert_eq!(result.communities.len(), 2);
        assert_eq!(result.removed_edges, 1);
        assert_eq!(result.node_community[&1], result.node_community[&3]);
        assert_eq!(result.node_community[&4], result.node_community[&6]);
        assert_ne!(result.node_community[&3], result.node_community[&4]);
        assert!(result.modularity > 0.3);
    }

    #[test]
    fn test_communities_partition_nodes() {
        // Single connected component: a 5-cycle with a chord
        let edges = vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (0, 2)];
        let view = GraphView::from_weighted_edges(
            vec![10, 20, 30, 40, 50],
            edges.into_iter().map(|(u, v)| (u, v, 2.5)),
        );
        let result = edge_betweenness_communities(&view);

        let mut seen = HashSet::new();
        for community in &result.communities {
            assert!(!community.is_empty());
            for node in community {
                assert!(seen.insert(*node), "node {node} in two communities");
            }
        }
        let all: HashSet<NodeId> = view.index_to_node.iter().copied().collect();
        assert_eq!(seen, all);
        assert_eq!(result.node_community.len(), 5);
    }

    #[test]
    fn test_empty_and_edgeless_graphs() {
        let empty = GraphView::from_edges(Vec::new(), Vec::new());
        assert_eq!(edge_betweenness_communities(&empty), CommunityResult::default());

        let isolated = GraphView::from_edges(vec![7, 8], Vec::new());
        let result = edge_betweenness_communities(&isolated);
        assert_eq!(result.communities, vec![vec![7], vec![8]]);
        assert_eq!(result.modularity, 0.0);
    }
}
