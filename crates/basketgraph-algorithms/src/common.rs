//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm execution.

use std::collections::HashMap;
use std::ops::Range;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// Dense edge identifier: position of the edge in `out_targets`.
pub type EdgeIdx = usize;

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
///
/// Every edge is stored once, in the outgoing CSR of its source. The incoming
/// CSR refers back to the same edge through `in_edges`, so algorithms that
/// walk edges in both directions (undirected traversal, edge betweenness) see
/// a single identity per edge.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,
    /// Source node index of each edge, aligned with `out_targets`
    pub edge_sources: Vec<usize>,

    /// Incoming edges CSR structure (Compressed Sparse Column effectively)
    /// Offsets into `in_sources`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub in_sources: Vec<usize>,
    /// Edge index of each incoming entry, aligned with `in_sources`
    pub in_edges: Vec<EdgeIdx>,

    /// Edge weights: aligned with `out_targets`
    pub weights: Option<Vec<f64>>,
}

impl GraphView {
    /// Build a view from a node list and `(source_idx, target_idx, weight)` triples.
    ///
    /// Edge order within a node's adjacency follows input order. Parallel
    /// edges are kept as distinct edges.
    ///
    /// # Panics
    ///
    /// Panics if an edge refers to a node index outside `index_to_node`.
    pub fn from_weighted_edges<I>(index_to_node: Vec<NodeId>, edges: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let node_count = index_to_node.len();
        let node_to_index = index_to_node
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();

        let edges: Vec<(usize, usize, f64)> = edges.into_iter().collect();
        for &(u, v, _) in &edges {
            assert!(u < node_count && v < node_count, "edge ({u}, {v}) out of range");
        }

        // Counting sort by source keeps per-node input order stable
        let mut out_offsets = vec![0usize; node_count + 1];
        for &(u, _, _) in &edges {
            out_offsets[u + 1] += 1;
        }
        for i in 0..node_count {
            out_offsets[i + 1] += out_offsets[i];
        }

        let m = edges.len();
        let mut cursor = out_offsets.clone();
        let mut out_targets = vec![0usize; m];
        let mut edge_sources = vec![0usize; m];
        let mut weights = vec![0.0f64; m];
        for &(u, v, w) in &edges {
            let pos = cursor[u];
            out_targets[pos] = v;
            edge_sources[pos] = u;
            weights[pos] = w;
            cursor[u] += 1;
        }

        let mut in_offsets = vec![0usize; node_count + 1];
        for &v in &out_targets {
            in_offsets[v + 1] += 1;
        }
        for i in 0..node_count {
            in_offsets[i + 1] += in_offsets[i];
        }

        let mut cursor = in_offsets.clone();
        let mut in_sources = vec![0usize; m];
        let mut in_edges = vec![0usize; m];
        for (e, &v) in out_targets.iter().enumerate() {
            let pos = cursor[v];
            in_sources[pos] = edge_sources[e];
            in_edges[pos] = e;
            cursor[v] += 1;
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            out_offsets,
            out_targets,
            edge_sources,
            in_offsets,
            in_sources,
            in_edges,
            weights: Some(weights),
        }
    }

    /// Build an unweighted view; every edge weighs 1.0.
    pub fn from_edges<I>(index_to_node: Vec<NodeId>, edges: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut view = Self::from_weighted_edges(
            index_to_node,
            edges.into_iter().map(|(u, v)| (u, v, 1.0)),
        );
        view.weights = None;
        view
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.out_targets.len()
    }

    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get the in-degree of a node (by index)
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        &self.out_targets[self.out_edges(idx)]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_sources[start..end]
    }

    /// Edge indices leaving a node
    pub fn out_edges(&self, idx: usize) -> Range<EdgeIdx> {
        self.out_offsets[idx]..self.out_offsets[idx + 1]
    }

    /// Edge indices entering a node
    pub fn in_edge_ids(&self, idx: usize) -> &[EdgeIdx] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_edges[start..end]
    }

    /// Get weights for outgoing edges of a node
    pub fn weights(&self, idx: usize) -> Option<&[f64]> {
        self.weights.as_ref().map(|w| &w[self.out_edges(idx)])
    }

    /// Weight of a single edge (1.0 for unweighted views)
    pub fn edge_weight(&self, edge: EdgeIdx) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[edge])
    }

    /// `(source, target)` node indices of an edge
    pub fn endpoints(&self, edge: EdgeIdx) -> (usize, usize) {
        (self.edge_sources[edge], self.out_targets[edge])
    }

    /// Neighbors ignoring direction, paired with the connecting edge.
    pub fn undirected_neighbors(&self, idx: usize) -> impl Iterator<Item = (usize, EdgeIdx)> + '_ {
        let outgoing = self.out_edges(idx).map(move |e| (self.out_targets[e], e));
        let incoming = self
            .predecessors(idx)
            .iter()
            .copied()
            .zip(self.in_edge_ids(idx).iter().copied());
        outgoing.chain(incoming)
    }
}
