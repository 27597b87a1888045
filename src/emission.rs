//! Conversion of the global table into summary rows.

use serde::Serialize;

use crate::reducer::GlobalTable;
use crate::types::{Channel, GroupKeyRef};

/// Final statistics of one (device, month, sensor) group.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryRow {
    pub device: String,
    pub month: String,
    pub sensor: Channel,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: u64,
}

impl SummaryRow {
    /// Returns the group key of the row.
    pub fn key(&self) -> GroupKeyRef<'_> {
        GroupKeyRef::new(&self.device, &self.month, self.sensor)
    }
}

/// Ordering of emitted rows
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum RowOrder {
    /// Device, then month, then sensor name, all ascending
    #[default]
    Canonical,
    /// Table iteration order
    Unordered,
}

/// Converts the global table into summary rows, computing the mean of each group.
///
/// # Arguments
///
/// * `table`: The merged table. It is consumed.
/// * `order`: Ordering of the returned rows
pub fn emit(table: GlobalTable, order: RowOrder) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = table
        .into_iter()
        .map(|(key, aggregate)| SummaryRow {
            device: key.device,
            month: key.month,
            sensor: key.channel,
            min: aggregate.min(),
            max: aggregate.max(),
            mean: aggregate.mean(),
            count: aggregate.count(),
        })
        .collect();
    if order == RowOrder::Canonical {
        rows.sort_unstable_by(|a, b| a.key().canonical_cmp(&b.key()));
    }
    rows
}
