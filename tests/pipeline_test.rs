use basketgraph::{Pipeline, PipelineConfig, PipelineError, ProductId};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_orders(dir: &Path, baskets: &[(u64, &[u64])]) -> PathBuf {
    let mut csv = String::from("order_id,product_id,add_to_cart_order\n");
    for (order, items) in baskets {
        for (pos, item) in items.iter().enumerate() {
            writeln!(csv, "{order},{item},{}", pos + 1).unwrap();
        }
    }
    let path = dir.join("order_products.csv");
    fs::write(&path, csv).unwrap();
    path
}

fn write_products(dir: &Path, products: &[(u64, &str)]) -> PathBuf {
    let mut csv = String::from("product_id,product_name,aisle_id\n");
    for (id, name) in products {
        writeln!(csv, "{id},{name},1").unwrap();
    }
    let path = dir.join("products.csv");
    fs::write(&path, csv).unwrap();
    path
}

fn config(orders: PathBuf, products: PathBuf, min_support: f64, min_confidence: f64) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.input.orders = Some(orders);
    config.input.products = Some(products);
    config.mining.min_support = min_support;
    config.mining.min_confidence = min_confidence;
    config.engine.workers = Some(2);
    config
}

/// Two tight product groups, {1,2,3} and {4,5,6}, joined by a couple of {3,4} orders
fn clustered_orders() -> Vec<(u64, Vec<u64>)> {
    let mut baskets = Vec::new();
    for order in 0..10 {
        baskets.push((order, vec![1, 2, 3]));
        baskets.push((100 + order, vec![4, 5, 6]));
    }
    baskets.push((200, vec![3, 4]));
    baskets.push((201, vec![3, 4]));
    baskets
}

fn as_refs(baskets: &[(u64, Vec<u64>)]) -> Vec<(u64, &[u64])> {
    baskets.iter().map(|(o, items)| (*o, items.as_slice())).collect()
}

#[test]
fn test_milk_bread_scenario() {
    let dir = TempDir::new().unwrap();
    let orders = write_orders(dir.path(), &[(1, &[1, 2]), (2, &[1, 2])]);
    let products = write_products(dir.path(), &[(1, "milk"), (2, "bread")]);

    let report = Pipeline::new(config(orders, products, 0.5, 0.5)).run().unwrap();

    assert_eq!(report.baskets, 2);
    assert_eq!(report.rules.len(), 2);
    for rule in report.rules.iter() {
        assert!((rule.confidence - 1.0).abs() < 1e-12);
        assert!((rule.lift - 1.0).abs() < 1e-12);
        assert!((rule.support - 1.0).abs() < 1e-12);
    }

    let graph = &report.presentation.graph;
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.node(ProductId(1)).unwrap().label.as_deref(), Some("milk"));
    assert_eq!(graph.node(ProductId(2)).unwrap().label.as_deref(), Some("bread"));
}

#[test]
fn test_high_support_yields_empty_graph() {
    let dir = TempDir::new().unwrap();
    let orders = write_orders(dir.path(), &[(1, &[1, 2]), (2, &[3])]);
    let products = write_products(dir.path(), &[(1, "milk"), (2, "bread"), (3, "eggs")]);

    let mut config = config(orders, products, 0.99, 0.1);
    config.output.dir = Some(dir.path().join("out"));

    let report = Pipeline::new(config).run().unwrap();

    assert_eq!(report.frequent_itemsets, 0);
    assert!(report.rules.is_empty());
    assert_eq!(report.presentation.graph.node_count(), 0);
    assert_eq!(report.presentation.graph.edge_count(), 0);
    assert!(report.presentation.communities.is_empty());
    // Renders of an empty graph are still produced
    assert!(dir.path().join("out/graph.svg").exists());
}

#[test]
fn test_basket_count_matches_distinct_orders() {
    let dir = TempDir::new().unwrap();
    // Order 7 is split across non-adjacent rows and repeats a product
    let orders = write_orders(dir.path(), &[(7, &[1, 2]), (8, &[2]), (7, &[2, 3]), (9, &[1])]);
    let products = write_products(dir.path(), &[(1, "a"), (2, "b"), (3, "c")]);

    let report = Pipeline::new(config(orders, products, 0.3, 0.1)).run().unwrap();

    assert_eq!(report.order_items, 6);
    assert_eq!(report.baskets, 3);
}

#[test]
fn test_rules_respect_thresholds() {
    let dir = TempDir::new().unwrap();
    let baskets = clustered_orders();
    let orders = write_orders(dir.path(), &as_refs(&baskets));
    let products = write_products(dir.path(), &[]);

    let report = Pipeline::new(config(orders, products, 0.05, 0.5)).run().unwrap();

    assert!(!report.rules.is_empty());
    for rule in report.rules.iter() {
        assert!(rule.confidence >= 0.5 && rule.confidence <= 1.0);
        assert!(rule.support >= 0.05);
        assert_eq!(rule.consequent.len(), 1);
    }
    // 3 → 4 holds in only 2 of 12 baskets with 3
    assert!(!report
        .rules
        .iter()
        .any(|r| r.antecedent == [ProductId(3)] && r.consequent == [ProductId(4)]));
}

#[test]
fn test_nodes_come_only_from_rules_and_unmatched_labels_are_none() {
    let dir = TempDir::new().unwrap();
    // Product 9 is bought once and never reaches a rule
    let orders = write_orders(dir.path(), &[(1, &[1, 2]), (2, &[1, 2]), (3, &[9])]);
    // Product 2 has no catalog entry, product 5 is never ordered
    let products = write_products(dir.path(), &[(1, "milk"), (5, "flour")]);

    let report = Pipeline::new(config(orders, products, 0.5, 0.1)).run().unwrap();
    let graph = &report.presentation.graph;

    let ids: HashSet<ProductId> = graph.nodes().map(|n| n.id).collect();
    assert_eq!(ids, HashSet::from([ProductId(1), ProductId(2)]));
    assert_eq!(graph.node(ProductId(1)).unwrap().label.as_deref(), Some("milk"));
    assert_eq!(graph.node(ProductId(2)).unwrap().label, None);
}

#[test]
fn test_communities_partition_rule_graph() {
    let dir = TempDir::new().unwrap();
    let baskets = clustered_orders();
    let orders = write_orders(dir.path(), &as_refs(&baskets));
    let products = write_products(dir.path(), &[(1, "a"), (2, "b"), (3, "c"), (4, "d"), (5, "e"), (6, "f")]);

    let report = Pipeline::new(config(orders, products, 0.05, 0.1)).run().unwrap();
    let communities = &report.presentation.communities;

    let mut seen = HashSet::new();
    for cluster in &communities.clusters {
        assert!(!cluster.is_empty());
        for id in cluster {
            assert!(seen.insert(*id), "product {id} in two communities");
        }
    }
    let nodes: HashSet<ProductId> = report.presentation.graph.nodes().map(|n| n.id).collect();
    assert_eq!(seen, nodes);

    let of = |id: u64| communities.community_of(ProductId(id)).unwrap();
    assert_eq!(of(1), of(2));
    assert_eq!(of(5), of(6));
    assert_ne!(of(1), of(5));
    assert!(communities.modularity > 0.0);
}

#[test]
fn test_recommend_from_mined_rules() {
    let dir = TempDir::new().unwrap();
    let baskets = clustered_orders();
    let orders = write_orders(dir.path(), &as_refs(&baskets));
    let products = write_products(dir.path(), &[]);

    let pipeline = Pipeline::new(config(orders, products, 0.05, 0.5));
    let (items, _) = pipeline.ingest().unwrap();
    let outcome = pipeline.mine(&items).unwrap();

    let picks = outcome.rules.recommend(&[ProductId(1)]);
    assert_eq!(picks, vec![ProductId(2), ProductId(3)]);
    assert!(outcome.rules.recommend(&[ProductId(42)]).is_empty());
}

#[test]
fn test_outputs_written() {
    let dir = TempDir::new().unwrap();
    let orders = write_orders(dir.path(), &[(1, &[1, 2]), (2, &[1, 2]), (3, &[2, 3])]);
    let products = write_products(dir.path(), &[(1, "milk"), (2, "bread"), (3, "jam & butter")]);
    let out = dir.path().join("out");

    let mut config = config(orders, products, 0.3, 0.1);
    config.output.dir = Some(out.clone());
    config.output.report = true;

    let report = Pipeline::new(config).run().unwrap();
    assert_eq!(report.written.len(), 5);

    let rules = fs::read_to_string(out.join("rules.csv")).unwrap();
    assert!(rules.starts_with("antecedent,consequent,antecedent_name"));
    assert_eq!(rules.lines().count(), report.rules.len() + 1);

    let svg = fs::read_to_string(out.join("graph.svg")).unwrap();
    assert!(svg.contains("jam &amp; butter"));

    let html = fs::read_to_string(out.join("graph.html")).unwrap();
    assert!(html.contains("vis-network"));

    assert!(out.join("communities.svg").exists());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(out.join("report.json")).unwrap()).unwrap();
    assert_eq!(json["baskets"], 3);
}

#[test]
fn test_missing_column_is_reported() {
    let dir = TempDir::new().unwrap();
    let orders = dir.path().join("orders.csv");
    fs::write(&orders, "order_id,sku\n1,2\n").unwrap();
    let products = write_products(dir.path(), &[(2, "bread")]);

    let err = Pipeline::new(config(orders, products, 0.5, 0.5)).run().unwrap_err();
    match err {
        PipelineError::MissingColumn { column, .. } => assert_eq!(column, "product_id"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_config_file_round_trip_drives_run() {
    let dir = TempDir::new().unwrap();
    let orders = write_orders(dir.path(), &[(1, &[1, 2]), (2, &[1, 2])]);
    let products = write_products(dir.path(), &[(1, "milk"), (2, "bread")]);

    let yaml = config(orders, products, 0.5, 0.5).to_yaml().unwrap();
    let path = dir.path().join("basketgraph.yaml");
    fs::write(&path, yaml).unwrap();

    let loaded = PipelineConfig::from_path(&path).unwrap();
    let report = Pipeline::new(loaded).run().unwrap();
    assert_eq!(report.rules.len(), 2);
}
