//! Per-partition aggregation.
//!
//! Each worker owns one [LocalAggregator] for the lifetime of its partition scan. The resulting
//! [LocalTable] is private to the worker until it is moved to the reducer at the join barrier.

use crate::error::SensorStatsError;
use crate::types::{Channel, GroupKeyRef, GroupTable, SensorRecord};

/// A worker-private table of partial aggregates.
pub type LocalTable = GroupTable;

/// Builds a [LocalTable] from a sequence of records.
#[derive(Debug)]
pub struct LocalAggregator {
    table: LocalTable,
}

impl LocalAggregator {
    /// Returns an aggregator with an empty table.
    ///
    /// # Arguments
    ///
    /// * `max_groups`: Optional maximum number of distinct groups in the table
    pub fn new(max_groups: Option<usize>) -> Self {
        Self {
            table: LocalTable::new(max_groups),
        }
    }

    /// Folds one record into the table: one update per channel.
    pub fn add(&mut self, record: &SensorRecord) -> Result<(), SensorStatsError> {
        let month = record.month();
        for channel in Channel::ALL {
            let key = GroupKeyRef::new(&record.device, month, channel);
            self.table.update(key, record.reading(channel))?;
        }
        Ok(())
    }

    /// Consumes the aggregator, returning its table.
    pub fn finish(self) -> LocalTable {
        self.table
    }
}

/// Aggregates a contiguous range of records into a new [LocalTable].
///
/// # Arguments
///
/// * `partition`: Index of the partition, used for diagnostics
/// * `records`: The records of the partition
/// * `max_groups`: Optional maximum number of distinct groups in the table
#[tracing::instrument(level = "DEBUG", skip(records), fields(num_records = records.len()))]
pub fn aggregate_partition(
    partition: usize,
    records: &[SensorRecord],
    max_groups: Option<usize>,
) -> Result<LocalTable, SensorStatsError> {
    let mut aggregator = LocalAggregator::new(max_groups);
    for record in records {
        aggregator.add(record)?;
    }
    let table = aggregator.finish();
    tracing::debug!(groups = table.len(), "partition aggregated");
    Ok(table)
}
