//! Association rule generation

use super::FrequentItemsets;
use crate::types::ProductId;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::info;

/// `antecedent → consequent` with its quality measures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    /// Sorted by id
    pub antecedent: Vec<ProductId>,
    /// Always a single item
    pub consequent: Vec<ProductId>,
    /// P(consequent | antecedent), in [0, 1]
    pub confidence: f64,
    /// confidence / support(consequent)
    pub lift: f64,
    /// Fraction of baskets containing antecedent ∪ consequent
    pub support: f64,
}

impl AssociationRule {
    /// Both sides hold exactly one product
    pub fn is_pairwise(&self) -> bool {
        self.antecedent.len() == 1 && self.consequent.len() == 1
    }
}

/// Derive rules `X∖{c} → {c}` from every frequent itemset `X` with at least two items.
///
/// A rule is kept when its confidence reaches `min_confidence`. Output is
/// sorted by confidence (descending), then antecedent, then consequent.
pub fn generate_rules(itemsets: &FrequentItemsets, min_confidence: f64) -> Vec<AssociationRule> {
    let n = itemsets.basket_count();
    let mut rules = Vec::new();

    for set in itemsets.iter().filter(|s| s.len() >= 2) {
        for (i, &consequent) in set.items.iter().enumerate() {
            let mut antecedent = set.items.clone();
            antecedent.remove(i);

            // Subsets of a frequent itemset are frequent, so both lookups succeed
            let (Some(antecedent_count), Some(consequent_count)) = (
                itemsets.count_of(&antecedent),
                itemsets.count_of(&[consequent]),
            ) else {
                continue;
            };

            let confidence = set.count as f64 / antecedent_count as f64;
            if confidence < min_confidence {
                continue;
            }

            let consequent_support = consequent_count as f64 / n as f64;
            rules.push(AssociationRule {
                antecedent,
                consequent: vec![consequent],
                confidence,
                lift: confidence / consequent_support,
                support: set.count as f64 / n as f64,
            });
        }
    }

    rules.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.antecedent.cmp(&b.antecedent))
            .then_with(|| a.consequent.cmp(&b.consequent))
    });

    info!(rules = rules.len(), min_confidence, "generated association rules");
    rules
}

/// The rules of one run, tied to the basket count they were mined from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<AssociationRule>,
    pub basket_count: usize,
}

impl RuleSet {
    pub fn from_itemsets(itemsets: &FrequentItemsets, min_confidence: f64) -> Self {
        RuleSet {
            rules: generate_rules(itemsets, min_confidence),
            basket_count: itemsets.basket_count(),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssociationRule> {
        self.rules.iter()
    }

    /// Products suggested for a basket.
    ///
    /// Collects the consequents of every rule whose antecedent is contained
    /// in `basket`, skipping products already in it. Each product appears
    /// once, in the order its first rule is met (highest confidence first).
    pub fn recommend(&self, basket: &[ProductId]) -> Vec<ProductId> {
        let present: FxHashSet<ProductId> = basket.iter().copied().collect();
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();

        for rule in &self.rules {
            if !rule.antecedent.iter().all(|item| present.contains(item)) {
                continue;
            }
            for &item in &rule.consequent {
                if !present.contains(&item) && seen.insert(item) {
                    out.push(item);
                }
            }
        }
        out
    }
}
