//! Undirected collapse of a rule graph

use super::rule_graph::ProductNode;
use crate::types::ProductId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An undirected edge; `a` precedes `b` in node order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndirectedEdge {
    pub a: ProductId,
    pub b: ProductId,
    /// Sum of the weights of every directed edge between `a` and `b`
    pub weight: f64,
}

/// Simple weighted undirected graph: at most one edge per product pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UndirectedGraph {
    nodes: IndexMap<ProductId, ProductNode>,
    edges: Vec<UndirectedEdge>,
}

impl UndirectedGraph {
    pub fn new(nodes: Vec<ProductNode>, edges: Vec<UndirectedEdge>) -> Self {
        UndirectedGraph {
            nodes: nodes.into_iter().map(|n| (n.id, n)).collect(),
            edges,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ProductNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[UndirectedEdge] {
        &self.edges
    }

    pub fn node(&self, id: ProductId) -> Option<&ProductNode> {
        self.nodes.get(&id)
    }

    pub fn index_of(&self, id: ProductId) -> Option<usize> {
        self.nodes.get_index_of(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges as `(a_idx, b_idx, weight)`
    pub fn indexed_edges(&self) -> Vec<(usize, usize, f64)> {
        self.edges
            .iter()
            .filter_map(|e| Some((self.index_of(e.a)?, self.index_of(e.b)?, e.weight)))
            .collect()
    }
}
