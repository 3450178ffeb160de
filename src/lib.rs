//! Basketgraph
//!
//! Market-basket analysis over order-line CSV exports: association rules mined
//! with parallel FP-Growth, drawn as a product graph, and partitioned into
//! product communities.
//!
//! # Pipeline
//!
//! 1. **Ingestion**: order items and the product catalog are read from CSV
//!    ([`ingest`]).
//! 2. **Aggregation**: order items collapse into one basket per order
//!    ([`basket`]).
//! 3. **Mining**: frequent itemsets and association rules ([`mining`]), run
//!    inside an [`EngineSession`] worker pool.
//! 4. **Presentation**: rule graph ([`graph`]), Girvan–Newman communities
//!    ([`algo`]), SVG/HTML drawings ([`render`]) and a rules CSV ([`export`]).
//!
//! [`Pipeline`] wires the stages together.
//!
//! # Example
//!
//! ```no_run
//! use basketgraph::{Pipeline, PipelineConfig};
//!
//! let mut config = PipelineConfig::default();
//! config.input.orders = Some("order_products.csv".into());
//! config.input.products = Some("products.csv".into());
//! config.mining.min_support = 0.01;
//!
//! let report = Pipeline::new(config).run()?;
//! println!("{} rules, {} communities", report.rules.len(), report.presentation.communities.len());
//! # Ok::<(), basketgraph::PipelineError>(())
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod basket;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod ingest;
pub mod mining;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use algo::{detect_communities, product_rank, Communities};
pub use basket::{aggregate_baskets, Basket, BasketStats};
pub use config::{InputConfig, OutputConfig, PipelineConfig, PresentationConfig};
pub use error::{PipelineError, PipelineResult};
pub use graph::{ProductNode, RuleEdge, RuleGraph, UndirectedEdge, UndirectedGraph};
pub use ingest::{read_order_items, Catalog, ColumnNames};
pub use mining::{generate_rules, AssociationRule, FpGrowth, FrequentItemset, FrequentItemsets, MiningConfig, RuleSet};
pub use pipeline::{MiningOutcome, Pipeline, PipelineReport, Presentation, StageTimings};
pub use session::{EngineConfig, EngineSession};
pub use types::{OrderId, OrderItem, ProductId};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.1.0");
    }
}
