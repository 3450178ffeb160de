//! Rule graph
//!
//! Products become nodes and pairwise association rules become directed
//! edges weighted by confidence. The undirected collapse feeds community
//! detection.

pub mod rule_graph;
pub mod undirected;

pub use rule_graph::{ProductNode, RuleEdge, RuleGraph};
pub use undirected::{UndirectedEdge, UndirectedGraph};
