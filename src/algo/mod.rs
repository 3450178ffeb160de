//! Graph algorithms module
//!
//! Algorithms are implemented in the `basketgraph-algorithms` crate.
//! This module provides the integration/adapter layer: it projects rule
//! graphs into a `GraphView` and maps dense results back to products.

use crate::graph::{RuleGraph, UndirectedGraph};
use crate::types::ProductId;
use basketgraph_algorithms::GraphView;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

// Re-export algorithms
pub use basketgraph_algorithms::{
    edge_betweenness, edge_betweenness_communities, modularity, page_rank,
    weakly_connected_components, CommunityResult, PageRankConfig, WccResult,
};

/// Build a directed, weighted `GraphView` of a rule graph.
///
/// View node ids are product ids; dense indices follow graph node order.
pub fn build_view(graph: &RuleGraph) -> GraphView {
    let nodes = graph.nodes().map(|n| n.id.as_u64()).collect();
    GraphView::from_weighted_edges(nodes, graph.indexed_edges())
}

/// Build a `GraphView` holding each undirected edge once.
pub fn build_undirected_view(graph: &UndirectedGraph) -> GraphView {
    let nodes = graph.nodes().map(|n| n.id.as_u64()).collect();
    GraphView::from_weighted_edges(nodes, graph.indexed_edges())
}

/// A partition of products into disjoint communities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Communities {
    pub clusters: Vec<Vec<ProductId>>,
    pub membership: IndexMap<ProductId, usize>,
    pub modularity: f64,
    /// Connected components of the graph before any edge was removed
    pub components: usize,
}

impl Communities {
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Community of a product
    pub fn community_of(&self, id: ProductId) -> Option<usize> {
        self.membership.get(&id).copied()
    }
}

/// Edge-betweenness (Girvan–Newman) communities of the undirected collapse,
/// cut where weighted modularity peaks.
pub fn detect_communities(graph: &UndirectedGraph) -> Communities {
    let view = build_undirected_view(graph);
    let components = weakly_connected_components(&view).components.len();
    let result = edge_betweenness_communities(&view);

    let clusters: Vec<Vec<ProductId>> = result
        .communities
        .iter()
        .map(|c| c.iter().copied().map(ProductId).collect())
        .collect();

    // Membership in graph node order
    let membership = graph
        .nodes()
        .filter_map(|n| Some((n.id, *result.node_community.get(&n.id.as_u64())?)))
        .collect();

    info!(
        nodes = graph.node_count(),
        components,
        communities = clusters.len(),
        modularity = result.modularity,
        "detected communities"
    );

    Communities {
        clusters,
        membership,
        modularity: result.modularity,
        components,
    }
}

/// Weighted PageRank of each product in the directed rule graph
pub fn product_rank(graph: &RuleGraph) -> HashMap<ProductId, f64> {
    let view = build_view(graph);
    page_rank(&view, PageRankConfig::default())
        .into_iter()
        .map(|(id, score)| (ProductId(id), score))
        .collect()
}
