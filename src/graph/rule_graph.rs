//! Directed rule graph: node = product, edge = rule

use super::undirected::{UndirectedEdge, UndirectedGraph};
use crate::ingest::Catalog;
use crate::mining::AssociationRule;
use crate::types::ProductId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A product appearing in at least one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductNode {
    pub id: ProductId,
    /// Catalog name; `None` when the product is not catalogued
    pub label: Option<String>,
}

impl ProductNode {
    /// Label for drawing: the catalog name, or `#<id>`
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("#{}", self.id),
        }
    }
}

/// A directed edge for one rule `source → target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEdge {
    pub source: ProductId,
    pub target: ProductId,
    pub confidence: f64,
    /// `confidence × weight_scale`
    pub weight: f64,
}

/// Directed, weighted multigraph of pairwise rules.
///
/// Parallel edges are kept: two rules between the same products give two
/// edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleGraph {
    nodes: IndexMap<ProductId, ProductNode>,
    edges: Vec<RuleEdge>,
    skipped_rules: usize,
}

impl RuleGraph {
    /// Build the graph from mined rules.
    ///
    /// Only rules with a single product on each side become edges; the rest
    /// are counted in [`skipped_rules`](Self::skipped_rules). Nodes are the
    /// endpoints of those edges in first-seen order, labelled from
    /// `catalog`. Catalog entries that no rule mentions are not added.
    pub fn from_rules(rules: &[AssociationRule], catalog: &Catalog, weight_scale: f64) -> Self {
        let mut graph = RuleGraph::default();

        for rule in rules {
            if !rule.is_pairwise() {
                graph.skipped_rules += 1;
                continue;
            }
            let source = rule.antecedent[0];
            let target = rule.consequent[0];

            for id in [source, target] {
                graph.nodes.entry(id).or_insert_with(|| ProductNode {
                    id,
                    label: catalog.name(id).map(str::to_string),
                });
            }

            graph.edges.push(RuleEdge {
                source,
                target,
                confidence: rule.confidence,
                weight: rule.confidence * weight_scale,
            });
        }

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            skipped = graph.skipped_rules,
            "built rule graph"
        );
        graph
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ProductNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[RuleEdge] {
        &self.edges
    }

    pub fn node(&self, id: ProductId) -> Option<&ProductNode> {
        self.nodes.get(&id)
    }

    /// Dense position of a node, stable for the lifetime of the graph
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

    /// Rules left out because a side held more than one product
    pub fn skipped_rules(&self) -> usize {
        self.skipped_rules
    }

    /// Edges as `(source_idx, target_idx, weight)`
    pub fn indexed_edges(&self) -> Vec<(usize, usize, f64)> {
        self.edges
            .iter()
            .filter_map(|e| Some((self.index_of(e.source)?, self.index_of(e.target)?, e.weight)))
            .collect()
    }

    /// Drop direction and merge edges between the same pair of products,
    /// summing their weights.
    pub fn to_undirected(&self) -> UndirectedGraph {
        let mut merged: IndexMap<(usize, usize), f64> = IndexMap::new();
        for (u, v, w) in self.indexed_edges() {
            let key = if u <= v { (u, v) } else { (v, u) };
            *merged.entry(key).or_insert(0.0) += w;
        }

        let edges = merged
            .into_iter()
            .map(|((u, v), weight)| UndirectedEdge {
                a: self.nodes[u].id,
                b: self.nodes[v].id,
                weight,
            })
            .collect();

        UndirectedGraph::new(self.nodes.values().cloned().collect(), edges)
    }
}
