//! Frequent-itemset mining and association rules
//!
//! [`FpGrowth`] finds every itemset whose support reaches `min_support`;
//! [`generate_rules`] derives single-consequent rules from them that reach
//! `min_confidence`. Thresholds too strict for the data give empty results,
//! never errors.

pub mod fpgrowth;
pub mod rules;

pub use fpgrowth::{FpGrowth, FrequentItemset, FrequentItemsets};
pub use rules::{generate_rules, AssociationRule, RuleSet};

use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};

/// Mining thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Minimum fraction of baskets containing an itemset, in (0, 1]
    pub min_support: f64,
    /// Minimum confidence of an emitted rule, in [0, 1]
    pub min_confidence: f64,
    /// Longest itemset to mine; `None` for no limit
    pub max_itemset_len: Option<usize>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: 0.01,
            min_confidence: 0.1,
            max_itemset_len: None,
        }
    }
}

impl MiningConfig {
    pub fn new(min_support: f64, min_confidence: f64) -> Self {
        Self {
            min_support,
            min_confidence,
            max_itemset_len: None,
        }
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(PipelineError::InvalidThreshold {
                name: "min_support",
                value: self.min_support,
                expected: "0 < min_support <= 1",
            });
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(PipelineError::InvalidThreshold {
                name: "min_confidence",
                value: self.min_confidence,
                expected: "0 <= min_confidence <= 1",
            });
        }
        if self.max_itemset_len == Some(0) {
            return Err(PipelineError::Config("mining.max_itemset_len must be at least 1".into()));
        }
        Ok(())
    }

    /// Smallest basket count an itemset needs to be frequent
    pub fn min_count(&self, basket_count: usize) -> u64 {
        let raw = self.min_support * basket_count as f64;
        // Snap float noise such as 0.1 * 30 = 3.0000000000000004, relative to the product
        let nearest = raw.round();
        let threshold = if (raw - nearest).abs() <= raw * 1e-12 { nearest } else { raw };
        (threshold.ceil() as u64).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ranges() {
        assert!(MiningConfig::new(0.5, 1.0).validate().is_ok());
        assert!(MiningConfig::new(1.0, 0.0).validate().is_ok());
        assert!(MiningConfig::new(0.0, 0.5).validate().is_err());
        assert!(MiningConfig::new(1.5, 0.5).validate().is_err());
        assert!(MiningConfig::new(f64::NAN, 0.5).validate().is_err());
        assert!(MiningConfig::new(0.5, -0.1).validate().is_err());
        assert!(MiningConfig::new(0.5, 1.01).validate().is_err());
    }

    #[test]
    fn test_min_count_rounds_up() {
        let config = MiningConfig::new(0.5, 0.5);
        assert_eq!(config.min_count(2), 1);
        assert_eq!(config.min_count(3), 2);
        assert_eq!(MiningConfig::new(0.001, 0.5).min_count(10), 1);
        assert_eq!(MiningConfig::new(0.1, 0.5).min_count(30), 3);
    }

    #[test]
    fn test_min_count_keeps_thresholds_just_above_an_integer() {
        // 0.2000000001 × 10 needs strictly more than 2 baskets
        assert_eq!(MiningConfig::new(0.2000000001, 0.5).min_count(10), 3);
        assert_eq!(MiningConfig::new(0.2, 0.5).min_count(10), 2);
        assert_eq!(MiningConfig::new(0.7, 0.5).min_count(10), 7);
        assert_eq!(MiningConfig::new(0.3, 0.5).min_count(1_000_000), 300_000);
    }
}
