//! End-to-end pipeline
//!
//! Ingestion → aggregation → rule mining → presentation, strictly in that
//! order. Aggregation and mining run inside an [`EngineSession`], which is
//! closed as soon as the rules are in local memory. The first failure aborts
//! the run.

use crate::algo::{detect_communities, product_rank, Communities};
use crate::basket::{aggregate_baskets, Basket};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::export::write_rules_csv;
use crate::graph::{RuleGraph, UndirectedGraph};
use crate::ingest::{read_order_items, Catalog};
use crate::mining::{FpGrowth, RuleSet};
use crate::render::{render_communities, render_interactive, render_rule_graph};
use crate::session::EngineSession;
use crate::types::OrderItem;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Wall-clock time per stage, in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageTimings {
    pub ingestion_ms: u64,
    pub aggregation_ms: u64,
    pub mining_ms: u64,
    pub presentation_ms: u64,
}

/// Output of the aggregation and mining stages
#[derive(Debug, Clone)]
pub struct MiningOutcome {
    pub baskets: Vec<Basket>,
    pub frequent_itemsets: usize,
    pub rules: RuleSet,
    pub aggregation_ms: u64,
    pub mining_ms: u64,
}

/// Output of the presentation stage
#[derive(Debug, Clone, Default, Serialize)]
pub struct Presentation {
    pub graph: RuleGraph,
    pub undirected: UndirectedGraph,
    pub communities: Communities,
    #[serde(skip)]
    pub ranks: HashMap<crate::types::ProductId, f64>,
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub generated_at: DateTime<Utc>,
    pub order_items: usize,
    pub baskets: usize,
    pub frequent_itemsets: usize,
    pub rules: RuleSet,
    pub presentation: Presentation,
    pub timings: StageTimings,
    /// Files written, if an output directory was configured
    pub written: Vec<PathBuf>,
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Pipeline runner
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read the configured order-item and catalog files.
    pub fn ingest(&self) -> PipelineResult<(Vec<OrderItem>, Catalog)> {
        let input = &self.config.input;
        let orders = input
            .orders
            .as_deref()
            .ok_or_else(|| PipelineError::Config("input.orders is not set".into()))?;
        let products = input
            .products
            .as_deref()
            .ok_or_else(|| PipelineError::Config("input.products is not set".into()))?;

        let items = read_order_items(orders, &input.columns)?;
        let catalog = Catalog::from_path(products, &input.columns)?;
        info!(
            order_items = items.len(),
            products = catalog.len(),
            "ingestion complete"
        );
        Ok((items, catalog))
    }

    /// Aggregate baskets and mine rules inside a fresh session.
    ///
    /// The session is closed before returning, on success and on failure.
    pub fn mine(&self, items: &[OrderItem]) -> PipelineResult<MiningOutcome> {
        self.config.validate()?;

        let session = EngineSession::start(&self.config.engine)?;
        let outcome = self.mine_in(&session, items);
        session.close();
        outcome
    }

    fn mine_in(&self, session: &EngineSession, items: &[OrderItem]) -> PipelineResult<MiningOutcome> {
        let start = Instant::now();
        let baskets = session.install(|| aggregate_baskets(items));
        let aggregation_ms = elapsed_ms(start);
        info!(baskets = baskets.len(), elapsed_ms = aggregation_ms, "aggregation complete");

        let start = Instant::now();
        let miner = FpGrowth::new(self.config.mining.clone());
        let itemsets = session.install(|| miner.mine(&baskets))?;
        let rules = RuleSet::from_itemsets(&itemsets, self.config.mining.min_confidence);
        let mining_ms = elapsed_ms(start);
        info!(
            itemsets = itemsets.len(),
            rules = rules.len(),
            elapsed_ms = mining_ms,
            "rule mining complete"
        );

        Ok(MiningOutcome {
            baskets,
            frequent_itemsets: itemsets.len(),
            rules,
            aggregation_ms,
            mining_ms,
        })
    }

    /// Build the rule graph, its undirected collapse and its communities.
    pub fn present(&self, rules: &RuleSet, catalog: &Catalog) -> Presentation {
        let graph = RuleGraph::from_rules(&rules.rules, catalog, self.config.presentation.static_weight_scale);
        let undirected = graph.to_undirected();
        let communities = detect_communities(&undirected);
        let ranks = product_rank(&graph);

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            communities = communities.len(),
            "presentation complete"
        );

        Presentation {
            graph,
            undirected,
            communities,
            ranks,
        }
    }

    /// Run every stage on the configured input files.
    pub fn run(&self) -> PipelineResult<PipelineReport> {
        self.config.validate()?;

        let start = Instant::now();
        let (items, catalog) = self.ingest()?;
        let ingestion_ms = elapsed_ms(start);

        self.run_timed(&items, &catalog, ingestion_ms)
    }

    /// Run aggregation, mining and presentation on in-memory input.
    pub fn run_on(&self, items: &[OrderItem], catalog: &Catalog) -> PipelineResult<PipelineReport> {
        self.run_timed(items, catalog, 0)
    }

    fn run_timed(&self, items: &[OrderItem], catalog: &Catalog, ingestion_ms: u64) -> PipelineResult<PipelineReport> {
        let outcome = self.mine(items)?;

        let start = Instant::now();
        let presentation = self.present(&outcome.rules, catalog);
        let written = match &self.config.output.dir {
            Some(dir) => self.write_outputs(dir, &outcome.rules, &presentation, catalog)?,
            None => Vec::new(),
        };
        let presentation_ms = elapsed_ms(start);

        let mut report = PipelineReport {
            generated_at: Utc::now(),
            order_items: items.len(),
            baskets: outcome.baskets.len(),
            frequent_itemsets: outcome.frequent_itemsets,
            rules: outcome.rules,
            presentation,
            timings: StageTimings {
                ingestion_ms,
                aggregation_ms: outcome.aggregation_ms,
                mining_ms: outcome.mining_ms,
                presentation_ms,
            },
            written,
        };

        if self.config.output.report {
            if let Some(dir) = &self.config.output.dir {
                let json = serde_json::to_string_pretty(&report)?;
                let path = write_text(dir.join("report.json"), &json)?;
                report.written.push(path);
            }
        }

        Ok(report)
    }

    fn write_outputs(
        &self,
        dir: &Path,
        rules: &RuleSet,
        presentation: &Presentation,
        catalog: &Catalog,
    ) -> PipelineResult<Vec<PathBuf>> {
        let output = &self.config.output;
        fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
        let mut written = Vec::new();

        if output.rules {
            let path = dir.join("rules.csv");
            let file = File::create(&path).map_err(|e| PipelineError::io(&path, e))?;
            write_rules_csv(BufWriter::new(file), &rules.rules, catalog)?;
            written.push(path);
        }

        if output.static_graph {
            let svg = render_rule_graph(&presentation.graph, &presentation.ranks, &self.config.layout);
            written.push(write_text(dir.join("graph.svg"), &svg)?);
        }

        if output.interactive_graph {
            let html = render_interactive(
                &presentation.graph,
                self.config.presentation.interactive_weight_scale,
                &self.config.presentation.title,
            )?;
            written.push(write_text(dir.join("graph.html"), &html)?);
        }

        if output.communities {
            let svg = render_communities(&presentation.undirected, &presentation.communities, &self.config.layout);
            written.push(write_text(dir.join("communities.svg"), &svg)?);
        }

        info!(dir = %dir.display(), files = written.len(), "wrote outputs");
        Ok(written)
    }
}

fn write_text(path: PathBuf, contents: &str) -> PipelineResult<PathBuf> {
    fs::write(&path, contents).map_err(|e| PipelineError::io(&path, e))?;
    Ok(path)
}
