//! Order aggregation
//!
//! Groups order-item rows into one basket per order.

use crate::types::{OrderId, OrderItem, ProductId};
use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::{FxBuildHasher, FxHashSet};
use serde::{Deserialize, Serialize};

/// The products purchased together in one order.
///
/// Item order follows the input rows and carries no meaning; duplicates are
/// kept. Mining treats the basket as a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    pub order_id: OrderId,
    pub items: Vec<ProductId>,
}

impl Basket {
    pub fn new(order_id: impl Into<OrderId>, items: Vec<ProductId>) -> Self {
        Basket {
            order_id: order_id.into(),
            items,
        }
    }

    /// Items with duplicates removed, sorted by id
    pub fn distinct_items(&self) -> Vec<ProductId> {
        let mut items = self.items.clone();
        items.sort_unstable();
        items.dedup();
        items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

type OrderGroups = IndexMap<OrderId, Vec<ProductId>, FxBuildHasher>;

/// Rows grouped per parallel task
const CHUNK_ROWS: usize = 64 * 1024;

/// Group rows by order id.
///
/// Returns one basket per distinct order id, in order of first appearance.
/// Rows are grouped in chunks on the current rayon pool and the partial
/// groups are merged left to right, so the result does not depend on the
/// number of workers.
pub fn aggregate_baskets(items: &[OrderItem]) -> Vec<Basket> {
    aggregate_in_chunks(items, CHUNK_ROWS)
}

fn aggregate_in_chunks(items: &[OrderItem], chunk_rows: usize) -> Vec<Basket> {
    let grouped = items
        .par_chunks(chunk_rows.max(1))
        .map(group_rows)
        .reduce(OrderGroups::default, merge_groups);

    grouped
        .into_iter()
        .map(|(order_id, items)| Basket { order_id, items })
        .collect()
}

fn group_rows(rows: &[OrderItem]) -> OrderGroups {
    let mut grouped = OrderGroups::default();
    for row in rows {
        grouped.entry(row.order_id).or_default().push(row.product_id);
    }
    grouped
}

/// `right` holds later rows than `left`
fn merge_groups(mut left: OrderGroups, right: OrderGroups) -> OrderGroups {
    if left.is_empty() {
        return right;
    }
    for (order_id, items) in right {
        left.entry(order_id).or_default().extend(items);
    }
    left
}

/// Summary figures over a set of baskets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasketStats {
    pub baskets: usize,
    pub order_items: usize,
    pub distinct_products: usize,
    pub mean_basket_size: f64,
    pub max_basket_size: usize,
}

impl BasketStats {
    pub fn from_baskets(baskets: &[Basket]) -> Self {
        if baskets.is_empty() {
            return Self::default();
        }

        let order_items: usize = baskets.iter().map(Basket::len).sum();
        let distinct: FxHashSet<ProductId> = baskets
            .iter()
            .flat_map(|b| b.items.iter().copied())
            .collect();

        BasketStats {
            baskets: baskets.len(),
            order_items,
            distinct_products: distinct.len(),
            mean_basket_size: order_items as f64 / baskets.len() as f64,
            max_basket_size: baskets.iter().map(Basket::len).max().unwrap_or(0),
        }
    }
}
