//! Order-item table loader

use super::{column_index, open, parse_id, ColumnNames};
use crate::error::PipelineResult;
use crate::types::OrderItem;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read `(order_id, product_id)` rows from a headered CSV file.
pub fn read_order_items(path: &Path, columns: &ColumnNames) -> PipelineResult<Vec<OrderItem>> {
    let reader = open(path)?;
    read_order_items_from(reader, &path.display().to_string(), columns)
}

/// Read `(order_id, product_id)` rows from any reader.
///
/// `origin` names the input in error messages.
pub fn read_order_items_from<R: Read>(
    reader: R,
    origin: &str,
    columns: &ColumnNames,
) -> PipelineResult<Vec<OrderItem>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let order_idx = column_index(&headers, &columns.order_id, origin)?;
    let product_idx = column_index(&headers, &columns.product_id, origin)?;

    let mut items = Vec::new();
    for result in reader.records() {
        let record = result?;
        let order_id = parse_id(&record, order_idx, &columns.order_id, origin)?;
        let product_id = parse_id(&record, product_idx, &columns.product_id, origin)?;
        items.push(OrderItem::new(order_id, product_id));
    }

    debug!(origin, rows = items.len(), "read order items");
    Ok(items)
}
