//! Product catalog: product id -> display name

use super::{column_index, open, parse_id, ColumnNames};
use crate::error::PipelineResult;
use crate::types::ProductId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Static product reference data, loaded once per run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    names: IndexMap<ProductId, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a headered CSV file with product id and name columns.
    pub fn from_path(path: &Path, columns: &ColumnNames) -> PipelineResult<Self> {
        let reader = open(path)?;
        Self::from_reader(reader, &path.display().to_string(), columns)
    }

    /// Load from any reader. `origin` names the input in error messages.
    ///
    /// A product listed twice keeps the last name seen.
    pub fn from_reader<R: Read>(reader: R, origin: &str, columns: &ColumnNames) -> PipelineResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let id_idx = column_index(&headers, &columns.product_id, origin)?;
        let name_idx = column_index(&headers, &columns.product_name, origin)?;

        let mut names = IndexMap::new();
        for result in reader.records() {
            let record = result?;
            let id = parse_id(&record, id_idx, &columns.product_id, origin)?;
            let name = record.get(name_idx).unwrap_or("").trim().to_string();
            if names.insert(ProductId(id), name).is_some() {
                debug!(origin, product_id = id, "duplicate catalog entry, keeping last");
            }
        }

        debug!(origin, products = names.len(), "read product catalog");
        Ok(Catalog { names })
    }

    /// Display name of a product, if catalogued
    pub fn name(&self, id: ProductId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn insert(&mut self, id: impl Into<ProductId>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.names.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProductId, &str)> {
        self.names.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

impl<I, S> FromIterator<(I, S)> for Catalog
where
    I: Into<ProductId>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (I, S)>>(iter: T) -> Self {
        let mut catalog = Catalog::new();
        for (id, name) in iter {
            catalog.insert(id, name);
        }
        catalog
    }
}
