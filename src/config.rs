//! Pipeline configuration
//!
//! Every section has defaults, so a YAML file only needs the keys it
//! changes:
//!
//! ```yaml
//! input:
//!   orders: data/order_products__train.csv
//!   products: data/products.csv
//! mining:
//!   min_support: 0.01
//!   min_confidence: 0.1
//! output:
//!   dir: out
//! ```

use crate::error::{PipelineError, PipelineResult};
use crate::ingest::ColumnNames;
use crate::mining::MiningConfig;
use crate::render::LayoutConfig;
use crate::session::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Input files and their column names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub orders: Option<PathBuf>,
    pub products: Option<PathBuf>,
    pub columns: ColumnNames,
}

/// Cosmetic edge scaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Multiplier from confidence to stroke width in static drawings
    pub static_weight_scale: f64,
    /// Multiplier from confidence to edge width in the interactive page
    pub interactive_weight_scale: f64,
    pub title: String,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            static_weight_scale: 10.0,
            interactive_weight_scale: 20.0,
            title: "Product association rules".to_string(),
        }
    }
}

/// Which artifacts to write, and where
///
/// Nothing is written unless `dir` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
    /// `rules.csv`
    pub rules: bool,
    /// `graph.svg`
    pub static_graph: bool,
    /// `graph.html`
    pub interactive_graph: bool,
    /// `communities.svg`
    pub communities: bool,
    /// `report.json`
    pub report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            rules: true,
            static_graph: true,
            interactive_graph: true,
            communities: true,
            report: false,
        }
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input: InputConfig,
    pub mining: MiningConfig,
    pub engine: EngineConfig,
    pub presentation: PresentationConfig,
    pub layout: LayoutConfig,
    pub output: OutputConfig,
}

impl PipelineConfig {
    pub fn from_yaml_str(yaml: &str) -> PipelineResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: &Path) -> PipelineResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml(&self) -> PipelineResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check thresholds and cosmetic settings; input paths are checked when read.
    pub fn validate(&self) -> PipelineResult<()> {
        self.mining.validate()?;

        let scales = [
            ("presentation.static_weight_scale", self.presentation.static_weight_scale),
            ("presentation.interactive_weight_scale", self.presentation.interactive_weight_scale),
        ];
        for (name, value) in scales {
            if !(value.is_finite() && value > 0.0) {
                return Err(PipelineError::Config(format!("{name} must be positive, got {value}")));
            }
        }

        let size_ok = |v: f64| v.is_finite() && v > 0.0;
        if !(size_ok(self.layout.width) && size_ok(self.layout.height)) {
            return Err(PipelineError::Config(format!(
                "layout size must be positive, got {}x{}",
                self.layout.width, self.layout.height
            )));
        }

        if self.engine.workers == Some(0) {
            return Err(PipelineError::Config("engine.workers must be at least 1".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = PipelineConfig::from_yaml_str(
            "mining:\n  min_support: 0.02\ninput:\n  orders: orders.csv\n  columns:\n    product_name: name\n",
        )
        .unwrap();

        assert_eq!(config.mining.min_support, 0.02);
        assert_eq!(config.mining.min_confidence, 0.1);
        assert_eq!(config.input.orders, Some(PathBuf::from("orders.csv")));
        assert_eq!(config.input.columns.product_name, "name");
        assert_eq!(config.input.columns.order_id, "order_id");
        assert_eq!(config.presentation.static_weight_scale, 10.0);
        assert_eq!(config.presentation.interactive_weight_scale, 20.0);
        assert!(config.output.rules);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = PipelineConfig::default();
        let parsed = PipelineConfig::from_yaml_str(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PipelineConfig::default();
        config.mining.min_support = 0.0;
        assert!(matches!(config.validate(), Err(PipelineError::InvalidThreshold { .. })));

        let mut config = PipelineConfig::default();
        config.presentation.static_weight_scale = -1.0;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));

        let mut config = PipelineConfig::default();
        config.layout.width = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unbounded_layout() {
        let config = PipelineConfig::from_yaml_str("layout:\n  width: .inf\n").unwrap();
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));

        let config = PipelineConfig::from_yaml_str("layout:\n  height: .nan\n").unwrap();
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_unparsable_yaml() {
        assert!(matches!(
            PipelineConfig::from_yaml_str("mining: [1, 2"),
            Err(PipelineError::Yaml(_))
        ));
    }
}
