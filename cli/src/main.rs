//! Basketgraph CLI: mine association rules from order CSVs and draw them
//!
//! Every command runs the library pipeline in-process.

use anyhow::{bail, Context};
use basketgraph::export::{rule_row, write_rules_csv, RULE_COLUMNS};
use basketgraph::{
    aggregate_baskets, read_order_items, BasketStats, Catalog, Pipeline, PipelineConfig, PipelineReport,
    ProductId, RuleSet,
};
use clap::{Args, Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "basketgraph", version, about = "Market-basket association rules and product communities")]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Input files and mining thresholds shared by the commands
#[derive(Args)]
struct InputArgs {
    /// Order-items CSV (order_id, product_id)
    #[arg(long, env = "BASKETGRAPH_ORDERS")]
    orders: Option<PathBuf>,

    /// Products CSV (product_id, product_name)
    #[arg(long, env = "BASKETGRAPH_PRODUCTS")]
    products: Option<PathBuf>,

    /// YAML configuration file; flags override its values
    #[arg(long, env = "BASKETGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Minimum support, in (0, 1]
    #[arg(long)]
    min_support: Option<f64>,

    /// Minimum confidence, in [0, 1]
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Worker threads for mining (defaults to the number of CPUs)
    #[arg(long)]
    workers: Option<usize>,
}

impl InputArgs {
    fn into_config(self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_path(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(orders) = self.orders {
            config.input.orders = Some(orders);
        }
        if let Some(products) = self.products {
            config.input.products = Some(products);
        }
        if let Some(min_support) = self.min_support {
            config.mining.min_support = min_support;
        }
        if let Some(min_confidence) = self.min_confidence {
            config.mining.min_confidence = min_confidence;
        }
        if let Some(workers) = self.workers {
            config.engine.workers = Some(workers);
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write rules, graphs and communities
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Directory for rules.csv, graph.svg, graph.html and communities.svg
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Also write report.json
        #[arg(long)]
        report: bool,
    },
    /// Mine and print association rules
    Rules {
        #[command(flatten)]
        input: InputArgs,

        /// Print at most this many rules
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print basket statistics
    Baskets {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Recommend products for a basket
    Recommend {
        #[command(flatten)]
        input: InputArgs,

        /// Product ids already in the basket
        #[arg(long, value_delimiter = ',', required = true)]
        items: Vec<u64>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { input, out_dir, report } => run_pipeline(input, out_dir, report, &cli.format),
        Commands::Rules { input, limit } => run_rules(input, limit, &cli.format),
        Commands::Baskets { input } => run_baskets(input, &cli.format),
        Commands::Recommend { input, items } => run_recommend(input, &items, &cli.format),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Orders plus an optional catalog; rules print without names when no catalog is given
fn mine_rules(config: &PipelineConfig) -> anyhow::Result<(RuleSet, Catalog)> {
    let Some(orders) = config.input.orders.as_deref() else {
        bail!("--orders is required");
    };
    let items = read_order_items(orders, &config.input.columns)
        .with_context(|| format!("reading {}", orders.display()))?;
    let catalog = match config.input.products.as_deref() {
        Some(path) => Catalog::from_path(path, &config.input.columns)
            .with_context(|| format!("reading {}", path.display()))?,
        None => Catalog::new(),
    };

    let outcome = Pipeline::new(config.clone()).mine(&items).context("rule mining failed")?;
    Ok((outcome.rules, catalog))
}

fn run_pipeline(
    input: InputArgs,
    out_dir: Option<PathBuf>,
    report: bool,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let mut config = input.into_config()?;
    if out_dir.is_some() {
        config.output.dir = out_dir;
    }
    config.output.report |= report;

    let report = Pipeline::new(config).run().context("pipeline failed")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary_json(&report))?),
        OutputFormat::Csv => {
            println!("metric,value");
            for (name, value) in summary_rows(&report) {
                println!("{},{}", name, csv_cell(&value));
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Metric", "Value"]);
            for (name, value) in summary_rows(&report) {
                table.add_row(vec![name.to_string(), value]);
            }
            println!("{}", table);
            for path in &report.written {
                println!("wrote {}", path.display());
            }
        }
    }

    Ok(())
}

fn summary_rows(report: &PipelineReport) -> Vec<(&'static str, String)> {
    let communities = &report.presentation.communities;
    vec![
        ("order items", report.order_items.to_string()),
        ("baskets", report.baskets.to_string()),
        ("frequent itemsets", report.frequent_itemsets.to_string()),
        ("rules", report.rules.len().to_string()),
        ("graph nodes", report.presentation.graph.node_count().to_string()),
        ("graph edges", report.presentation.graph.edge_count().to_string()),
        ("communities", communities.len().to_string()),
        ("modularity", format!("{:.4}", communities.modularity)),
        ("mining ms", report.timings.mining_ms.to_string()),
    ]
}

fn summary_json(report: &PipelineReport) -> serde_json::Value {
    serde_json::json!({
        "generated_at": report.generated_at,
        "order_items": report.order_items,
        "baskets": report.baskets,
        "frequent_itemsets": report.frequent_itemsets,
        "rules": report.rules.len(),
        "nodes": report.presentation.graph.node_count(),
        "edges": report.presentation.graph.edge_count(),
        "communities": report.presentation.communities.clusters,
        "modularity": report.presentation.communities.modularity,
        "timings": report.timings,
        "written": report.written,
    })
}

fn run_rules(input: InputArgs, limit: Option<usize>, format: &OutputFormat) -> anyhow::Result<()> {
    let config = input.into_config()?;
    let (rules, catalog) = mine_rules(&config)?;
    let shown = &rules.rules[..limit.unwrap_or(rules.len()).min(rules.len())];

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(shown)?),
        OutputFormat::Csv => write_rules_csv(std::io::stdout().lock(), shown, &catalog)?,
        OutputFormat::Table => {
            if shown.is_empty() {
                println!("(no rules)");
                return Ok(());
            }
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(RULE_COLUMNS.to_vec());
            for rule in shown {
                table.add_row(rule_row(rule, &catalog).to_vec());
            }
            println!("{}", table);
            println!("{} of {} rule(s)", shown.len(), rules.len());
        }
    }

    Ok(())
}

fn run_baskets(input: InputArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = input.into_config()?;
    let Some(orders) = config.input.orders.as_deref() else {
        bail!("--orders is required");
    };
    let items = read_order_items(orders, &config.input.columns)
        .with_context(|| format!("reading {}", orders.display()))?;
    let stats = BasketStats::from_baskets(&aggregate_baskets(&items));

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Csv => {
            println!("baskets,order_items,distinct_products,mean_basket_size,max_basket_size");
            println!(
                "{},{},{},{:.4},{}",
                stats.baskets, stats.order_items, stats.distinct_products, stats.mean_basket_size, stats.max_basket_size
            );
        }
        OutputFormat::Table => {
            println!("Baskets:            {}", stats.baskets);
            println!("Order items:        {}", stats.order_items);
            println!("Distinct products:  {}", stats.distinct_products);
            println!("Mean basket size:   {:.2}", stats.mean_basket_size);
            println!("Max basket size:    {}", stats.max_basket_size);
        }
    }

    Ok(())
}

fn run_recommend(input: InputArgs, items: &[u64], format: &OutputFormat) -> anyhow::Result<()> {
    let config = input.into_config()?;
    let (rules, catalog) = mine_rules(&config)?;
    let basket: Vec<ProductId> = items.iter().copied().map(ProductId::from).collect();
    let picks = rules.recommend(&basket);

    match format {
        OutputFormat::Json => {
            let out: Vec<_> = picks
                .iter()
                .map(|id| serde_json::json!({ "product_id": id, "name": catalog.name(*id) }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Csv => {
            println!("product_id,name");
            for id in &picks {
                println!("{},{}", id, csv_cell(catalog.name(*id).unwrap_or("")));
            }
        }
        OutputFormat::Table => {
            if picks.is_empty() {
                println!("(no recommendations)");
                return Ok(());
            }
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Product", "Name"]);
            for id in &picks {
                table.add_row(vec![id.to_string(), catalog.name(*id).unwrap_or("").to_string()]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}

fn csv_cell(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
