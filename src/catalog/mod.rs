//! Catalog normalization: heterogeneous dataset records in, a uniform table and
//! the latest `modified` date out.
//!
//! Everything here is pure. A catalog that lacks a usable `dataset` collection,
//! records with disjoint keys, unparseable dates and nested values are all
//! resolved structurally; nothing in this module returns an error.

pub mod dates;
pub mod flatten;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

pub use dates::parse_modified;
pub use flatten::{flatten_value, Cell};

pub const DATASET_KEY: &str = "dataset";
pub const MODIFIED_KEY: &str = "modified";

/// Union of keys across all datasets, in lexicographic order.
pub type UnifiedKeySet = BTreeSet<String>;

/// One row per dataset; every row carries exactly the unified key set.
pub type NormalizedRow = BTreeMap<String, Cell>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub columns: Vec<String>,
    pub rows: Vec<NormalizedRow>,
    pub summary_date: Option<NaiveDate>,
    pub dataset_count: usize,
}

impl CatalogView {
    pub fn status(&self) -> CatalogStatus {
        match (self.dataset_count, self.summary_date) {
            (0, _) => CatalogStatus::NoDatasets,
            (_, None) => CatalogStatus::NoModifiedDates,
            (_, Some(date)) => CatalogStatus::LastUpdated(date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStatus {
    NoDatasets,
    NoModifiedDates,
    LastUpdated(NaiveDate),
}

impl CatalogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoDatasets => "no_datasets",
            Self::NoModifiedDates => "no_modified_dates",
            Self::LastUpdated(_) => "last_updated",
        }
    }

    pub fn is_warning(&self) -> bool {
        !matches!(self, Self::LastUpdated(_))
    }
}

impl fmt::Display for CatalogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The `dataset` array of a catalog; absent or non-array yields an empty slice.
pub fn extract_datasets(catalog: &Value) -> &[Value] {
    catalog
        .get(DATASET_KEY)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn unified_key_set(datasets: &[Value]) -> UnifiedKeySet {
    datasets
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|record| record.keys().cloned())
        .collect()
}

/// Normalize one dataset against the unified key set.
///
/// Returns the row plus the parsed `modified` date, if there was one. A
/// non-object dataset produces a row of nulls.
pub fn normalize_dataset(
    dataset: &Value,
    unified_keys: &UnifiedKeySet,
) -> (NormalizedRow, Option<NaiveDate>) {
    let mut modified = None;
    let mut row = NormalizedRow::new();

    for key in unified_keys {
        let value = dataset.get(key.as_str()).unwrap_or(&Value::Null);
        let cell = match value {
            Value::String(raw) if key == MODIFIED_KEY && !raw.is_empty() => {
                match parse_modified(raw) {
                    Some(date) => {
                        modified = Some(date);
                        Cell::Text(date.format("%Y-%m-%d").to_string())
                    }
                    None => Cell::Text(raw.clone()),
                }
            }
            other => flatten_value(other),
        };
        row.insert(key.clone(), cell);
    }

    (row, modified)
}

pub fn aggregate_summary_date<I>(dates: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = NaiveDate>,
{
    dates.into_iter().max()
}

pub fn normalize_catalog(catalog: &Value) -> CatalogView {
    let datasets = extract_datasets(catalog);
    let unified_keys = unified_key_set(datasets);

    let mut rows = Vec::with_capacity(datasets.len());
    let mut modified_dates = Vec::new();
    for dataset in datasets {
        let (row, modified) = normalize_dataset(dataset, &unified_keys);
        rows.push(row);
        modified_dates.extend(modified);
    }

    let summary_date = aggregate_summary_date(modified_dates.iter().copied());
    debug!(
        datasets = datasets.len(),
        columns = unified_keys.len(),
        dated = modified_dates.len(),
        summary_date = ?summary_date,
        "catalog normalized"
    );

    CatalogView {
        columns: unified_keys.into_iter().collect(),
        rows,
        summary_date,
        dataset_count: datasets.len(),
    }
}
