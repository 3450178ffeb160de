//! FP-Growth frequent itemset mining
//!
//! Baskets are compressed into a prefix tree ordered by descending item
//! frequency, then mined recursively through conditional trees. The
//! conditional pattern base of each frequent item is independent of the
//! others, so the top level fans out across the current rayon pool.
//!
//! Reference: Han, Pei, Yin (2000). "Mining frequent patterns without
//! candidate generation".

use super::MiningConfig;
use crate::basket::Basket;
use crate::error::PipelineResult;
use crate::types::ProductId;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// An itemset together with the number of baskets containing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequentItemset {
    /// Items sorted by id
    pub items: Vec<ProductId>,
    pub count: u64,
}

impl FrequentItemset {
    /// Fraction of `basket_count` baskets containing the itemset
    pub fn support(&self, basket_count: usize) -> f64 {
        if basket_count == 0 {
            0.0
        } else {
            self.count as f64 / basket_count as f64
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// All frequent itemsets of one mining run, with count lookup by itemset
#[derive(Debug, Clone, Default)]
pub struct FrequentItemsets {
    itemsets: Vec<FrequentItemset>,
    counts: FxHashMap<Vec<ProductId>, u64>,
    basket_count: usize,
}

impl FrequentItemsets {
    /// Collect itemsets; they are re-sorted by length, then items.
    pub fn new(mut itemsets: Vec<FrequentItemset>, basket_count: usize) -> Self {
        for set in &mut itemsets {
            set.items.sort_unstable();
        }
        itemsets.sort_by(|a, b| a.items.len().cmp(&b.items.len()).then_with(|| a.items.cmp(&b.items)));

        let counts = itemsets
            .iter()
            .map(|set| (set.items.clone(), set.count))
            .collect();

        FrequentItemsets {
            itemsets,
            counts,
            basket_count,
        }
    }

    /// Count of a sorted itemset, if frequent
    pub fn count_of(&self, items: &[ProductId]) -> Option<u64> {
        self.counts.get(items).copied()
    }

    pub fn basket_count(&self) -> usize {
        self.basket_count
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrequentItemset> {
        self.itemsets.iter()
    }

    pub fn as_slice(&self) -> &[FrequentItemset] {
        &self.itemsets
    }

    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }
}

const ROOT: usize = 0;

struct FpNode {
    item: usize,
    count: u64,
    parent: usize,
    children: FxHashMap<usize, usize>,
}

/// Prefix tree over dense item ranks (0 = most frequent item).
///
/// Paths are inserted in ascending rank order, so every root-to-node path
/// is sorted.
struct FpTree {
    nodes: Vec<FpNode>,
    /// Item rank -> nodes carrying that item
    header: FxHashMap<usize, Vec<usize>>,
    /// Item rank -> total count in this tree
    item_counts: FxHashMap<usize, u64>,
}

impl FpTree {
    fn new() -> Self {
        FpTree {
            nodes: vec![FpNode {
                item: usize::MAX,
                count: 0,
                parent: ROOT,
                children: FxHashMap::default(),
            }],
            header: FxHashMap::default(),
            item_counts: FxHashMap::default(),
        }
    }

    fn insert(&mut self, items: &[usize], count: u64) {
        let mut current = ROOT;
        for &item in items {
            let next = match self.nodes[current].children.get(&item) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(FpNode {
                        item,
                        count: 0,
                        parent: current,
                        children: FxHashMap::default(),
                    });
                    self.nodes[current].children.insert(item, child);
                    self.header.entry(item).or_default().push(child);
                    child
                }
            };
            self.nodes[next].count += count;
            *self.item_counts.entry(item).or_insert(0) += count;
            current = next;
        }
    }

    /// Conditional tree from a pattern base, keeping only items that reach `min_count`.
    fn from_paths(paths: &[(Vec<usize>, u64)], min_count: u64) -> Self {
        let mut counts: FxHashMap<usize, u64> = FxHashMap::default();
        for (path, count) in paths {
            for &item in path {
                *counts.entry(item).or_insert(0) += count;
            }
        }

        let mut tree = FpTree::new();
        let mut filtered = Vec::new();
        for (path, count) in paths {
            filtered.clear();
            filtered.extend(path.iter().copied().filter(|item| counts[item] >= min_count));
            if !filtered.is_empty() {
                tree.insert(&filtered, *count);
            }
        }
        tree
    }

    /// Items present in the tree, ascending rank
    fn items(&self) -> Vec<usize> {
        let mut items: Vec<usize> = self.item_counts.keys().copied().collect();
        items.sort_unstable();
        items
    }

    /// Conditional pattern base of `item`: each ancestor path with the node's count.
    fn prefix_paths(&self, item: usize) -> Vec<(Vec<usize>, u64)> {
        let Some(nodes) = self.header.get(&item) else {
            return Vec::new();
        };

        let mut paths = Vec::with_capacity(nodes.len());
        for &node in nodes {
            let mut path = Vec::new();
            let mut current = self.nodes[node].parent;
            while current != ROOT {
                path.push(self.nodes[current].item);
                current = self.nodes[current].parent;
            }
            if !path.is_empty() {
                path.reverse();
                paths.push((path, self.nodes[node].count));
            }
        }
        paths
    }
}

/// Emit `suffix ∪ {item}` and recurse into its conditional tree.
fn mine_item(
    tree: &FpTree,
    item: usize,
    suffix: &[usize],
    min_count: u64,
    max_len: Option<usize>,
    out: &mut Vec<(Vec<usize>, u64)>,
) {
    let count = tree.item_counts[&item];
    let mut itemset = Vec::with_capacity(suffix.len() + 1);
    itemset.extend_from_slice(suffix);
    itemset.push(item);

    let at_limit = max_len.is_some_and(|max| itemset.len() >= max);
    if !at_limit {
        let conditional = FpTree::from_paths(&tree.prefix_paths(item), min_count);
        for next in conditional.items() {
            mine_item(&conditional, next, &itemset, min_count, max_len, out);
        }
    }

    out.push((itemset, count));
}

/// FP-Growth miner
#[derive(Debug, Clone)]
pub struct FpGrowth {
    config: MiningConfig,
}

impl FpGrowth {
    pub fn new(config: MiningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    /// Find every itemset contained in at least `ceil(min_support × n)` baskets.
    ///
    /// Duplicate items within a basket count once. Parallel work runs on
    /// whichever rayon pool is current; wrap the call in
    /// [`EngineSession::install`](crate::session::EngineSession::install) to
    /// choose the pool.
    pub fn mine(&self, baskets: &[Basket]) -> PipelineResult<FrequentItemsets> {
        self.config.validate()?;

        let n = baskets.len();
        if n == 0 {
            return Ok(FrequentItemsets::new(Vec::new(), 0));
        }
        let min_count = self.config.min_count(n);

        let transactions: Vec<Vec<ProductId>> = baskets.par_iter().map(Basket::distinct_items).collect();

        let item_counts = transactions
            .par_iter()
            .fold(FxHashMap::default, |mut acc: FxHashMap<ProductId, u64>, items| {
                for &item in items {
                    *acc.entry(item).or_insert(0) += 1;
                }
                acc
            })
            .reduce(FxHashMap::default, |mut left, right| {
                for (item, count) in right {
                    *left.entry(item).or_insert(0) += count;
                }
                left
            });

        let mut frequent: Vec<(ProductId, u64)> = item_counts
            .into_iter()
            .filter(|&(_, count)| count >= min_count)
            .collect();
        frequent.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        debug!(baskets = n, min_count, frequent_items = frequent.len(), "counted items");
        if frequent.is_empty() {
            return Ok(FrequentItemsets::new(Vec::new(), n));
        }

        let rank: FxHashMap<ProductId, usize> = frequent
            .iter()
            .enumerate()
            .map(|(r, &(item, _))| (item, r))
            .collect();

        let mut tree = FpTree::new();
        let mut ranks = Vec::new();
        for items in &transactions {
            ranks.clear();
            ranks.extend(items.iter().filter_map(|item| rank.get(item).copied()));
            if !ranks.is_empty() {
                ranks.sort_unstable();
                tree.insert(&ranks, 1);
            }
        }
        debug!(nodes = tree.nodes.len(), "built FP-tree");

        let max_len = self.config.max_itemset_len;
        let raw: Vec<(Vec<usize>, u64)> = (0..frequent.len())
            .into_par_iter()
            .flat_map_iter(|item| {
                let mut out = Vec::new();
                mine_item(&tree, item, &[], min_count, max_len, &mut out);
                out
            })
            .collect();

        let itemsets = raw
            .into_iter()
            .map(|(ranks, count)| FrequentItemset {
                items: ranks.into_iter().map(|r| frequent[r].0).collect(),
                count,
            })
            .collect();

        let result = FrequentItemsets::new(itemsets, n);
        info!(
            baskets = n,
            min_count,
            itemsets = result.len(),
            "mined frequent itemsets"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    fn baskets(sets: &[&[u64]]) -> Vec<Basket> {
        sets.iter()
            .enumerate()
            .map(|(i, items)| Basket::new(i as u64, items.iter().map(|&p| ProductId(p)).collect()))
            .collect()
    }

    fn ids(items: &[u64]) -> Vec<ProductId> {
        items.iter().map(|&p| ProductId(p)).collect()
    }

    /// Brute-force support count for cross-checking
    fn brute_count(baskets: &[Basket], items: &[ProductId]) -> u64 {
        baskets
            .iter()
            .filter(|b| items.iter().all(|i| b.items.contains(i)))
            .count() as u64
    }

    #[test]
    fn test_classic_dataset() {
        // Han et al. style toy data
        let data = baskets(&[
            &[1, 2, 5],
            &[2, 4],
            &[2, 3],
            &[1, 2, 4],
            &[1, 3],
            &[2, 3],
            &[1, 3],
            &[1, 2, 3, 5],
            &[1, 2, 3],
        ]);
        // min_count = ceil(2/9 * 9) = 2
        let miner = FpGrowth::new(MiningConfig::new(2.0 / 9.0, 0.5));
        let result = miner.mine(&data).unwrap();

        assert_eq!(result.count_of(&ids(&[2])), Some(7));
        assert_eq!(result.count_of(&ids(&[1, 2])), Some(4));
        assert_eq!(result.count_of(&ids(&[1, 2, 3])), Some(2));
        assert_eq!(result.count_of(&ids(&[1, 2, 5])), Some(2));
        assert_eq!(result.count_of(&ids(&[3, 5])), None);
        assert_eq!(result.len(), 13);

        for set in result.iter() {
            assert_eq!(set.count, brute_count(&data, &set.items));
            assert!(set.count >= 2);
        }
    }

    #[test]
    fn test_duplicates_in_basket_count_once() {
        let data = baskets(&[&[1, 1, 2], &[3]]);
        let result = FpGrowth::new(MiningConfig::new(0.5, 0.5)).mine(&data).unwrap();
        assert_eq!(result.count_of(&ids(&[1])), Some(1));
        assert_eq!(result.count_of(&ids(&[1, 2])), Some(1));
    }

    #[test]
    fn test_max_itemset_len() {
        let data = baskets(&[&[1, 2, 3], &[1, 2, 3]]);
        let mut config = MiningConfig::new(0.5, 0.5);
        config.max_itemset_len = Some(2);
        let result = FpGrowth::new(config).mine(&data).unwrap();
        assert!(result.iter().all(|s| s.len() <= 2));
        assert_eq!(result.len(), 6);
    }

    #[test]
    fn test_unreachable_support_is_empty_not_error() {
        let data = baskets(&[&[1, 2], &[3, 4], &[5, 6]]);
        let result = FpGrowth::new(MiningConfig::new(0.99, 0.5)).mine(&data).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.basket_count(), 3);

        let none = FpGrowth::new(MiningConfig::new(0.5, 0.5)).mine(&[]).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = FpGrowth::new(MiningConfig::new(0.0, 0.5)).mine(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidThreshold { name: "min_support", .. }));
    }
}
