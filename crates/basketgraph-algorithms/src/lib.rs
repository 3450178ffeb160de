//! Graph algorithms for basket rule graphs
//!
//! Algorithms run over [`GraphView`], a dense CSR projection built by the
//! caller. Nothing here knows about products or rules.

pub mod common;
pub mod betweenness;
pub mod community;
pub mod pagerank;

pub use common::{EdgeIdx, GraphView, NodeId};
pub use betweenness::edge_betweenness;
pub use community::{
    edge_betweenness_communities, modularity, weakly_connected_components, CommunityResult,
    WccResult,
};
pub use pagerank::{page_rank, PageRankConfig};
