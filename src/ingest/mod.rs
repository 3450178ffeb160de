//! CSV ingestion
//!
//! Reads the order-item table and the product catalog. Columns are located
//! by header name, so extra columns in the input are ignored.

pub mod catalog;
pub mod orders;

pub use catalog::Catalog;
pub use orders::{read_order_items, read_order_items_from};

use crate::error::{PipelineError, PipelineResult};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Header names of the input columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            order_id: "order_id".to_string(),
            product_id: "product_id".to_string(),
            product_name: "product_name".to_string(),
        }
    }
}

pub(crate) fn open(path: &Path) -> PipelineResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| PipelineError::io(path, e))
}

/// Position of `column` in the header row.
pub(crate) fn column_index(headers: &StringRecord, column: &str, origin: &str) -> PipelineResult<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
        .ok_or_else(|| PipelineError::MissingColumn {
            origin: origin.to_string(),
            column: column.to_string(),
        })
}

/// Parse an integer id field, reporting the CSV line on failure.
pub(crate) fn parse_id(
    record: &StringRecord,
    idx: usize,
    column: &str,
    origin: &str,
) -> PipelineResult<u64> {
    let raw = record.get(idx).unwrap_or("");
    raw.trim().parse::<u64>().map_err(|_| PipelineError::InvalidField {
        origin: origin.to_string(),
        line: record.position().map_or(0, |p| p.line()),
        column: column.to_string(),
        value: raw.to_string(),
    })
}
