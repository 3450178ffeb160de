use basketgraph::{aggregate_baskets, Basket, FpGrowth, MiningConfig, OrderItem, RuleSet};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Synthetic orders: a few popular products plus a long tail
fn synthetic_baskets(orders: u64, products: u64) -> Vec<Basket> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut items = Vec::new();
    for order in 0..orders {
        let size = rng.gen_range(2..12);
        for _ in 0..size {
            let product = if rng.gen_bool(0.4) {
                rng.gen_range(0..20)
            } else {
                rng.gen_range(0..products)
            };
            items.push(OrderItem::new(order, product));
        }
    }
    aggregate_baskets(&items)
}

/// Benchmark frequent itemset mining
fn bench_fp_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("fp_growth");
    group.sample_size(20);

    for orders in [1_000u64, 10_000, 50_000].iter() {
        let baskets = synthetic_baskets(*orders, 2_000);
        let miner = FpGrowth::new(MiningConfig::new(0.01, 0.1));

        group.bench_with_input(BenchmarkId::from_parameter(orders), &baskets, |b, baskets| {
            b.iter(|| miner.mine(baskets).unwrap());
        });
    }
    group.finish();
}

/// Benchmark rule generation from already-mined itemsets
fn bench_rule_generation(c: &mut Criterion) {
    let baskets = synthetic_baskets(10_000, 2_000);
    let itemsets = FpGrowth::new(MiningConfig::new(0.005, 0.1)).mine(&baskets).unwrap();

    c.bench_function("rule_generation", |b| {
        b.iter(|| RuleSet::from_itemsets(&itemsets, 0.1));
    });
}

/// Benchmark basket aggregation
fn bench_aggregation(c: &mut Criterion) {
    let items: Vec<OrderItem> = (0..200_000u64).map(|i| OrderItem::new(i / 8, i % 997)).collect();

    c.bench_function("aggregate_baskets", |b| {
        b.iter(|| aggregate_baskets(&items));
    });
}

criterion_group!(benches, bench_fp_growth, bench_rule_generation, bench_aggregation);
criterion_main!(benches);
