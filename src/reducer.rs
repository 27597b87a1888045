//! Merging of local tables into the global table.
//!
//! The merge operator is [Aggregate::merge](crate::types::Aggregate::merge), applied pairwise per
//! group key. It is commutative and associative (up to floating point rounding of sums), so the
//! result does not depend on how records were partitioned or in which order tables are merged.

use rayon::prelude::*;

use crate::config::MergeStrategy;
use crate::error::SensorStatsError;
use crate::local_aggregator::LocalTable;
use crate::types::GroupTable;

/// The merged table of all partitions.
pub type GlobalTable = GroupTable;

/// Sequentially folds local tables into a single [GlobalTable].
#[derive(Debug)]
pub struct Reducer {
    global: GlobalTable,
    merged: usize,
}

impl Reducer {
    /// Returns a reducer with an empty global table.
    ///
    /// # Arguments
    ///
    /// * `max_groups`: Optional maximum number of distinct groups in the global table
    pub fn new(max_groups: Option<usize>) -> Self {
        Self {
            global: GlobalTable::new(max_groups),
            merged: 0,
        }
    }

    /// Merges one local table into the global table, consuming it.
    pub fn absorb(&mut self, local: LocalTable) -> Result<(), SensorStatsError> {
        self.global.merge(local)?;
        self.merged += 1;
        Ok(())
    }

    /// Number of local tables merged so far.
    pub fn merged(&self) -> usize {
        self.merged
    }

    /// Consumes the reducer, returning the final global table.
    pub fn finish(self) -> GlobalTable {
        self.global
    }
}

/// Merges two tables, consuming both.
///
/// The larger table is used as the destination to minimise the number of insertions. The result
/// is limited to `max_groups` distinct groups, whatever limits the inputs had.
pub fn merge_tables(
    left: GroupTable,
    right: GroupTable,
    max_groups: Option<usize>,
) -> Result<GroupTable, SensorStatsError> {
    let (into, from) = if left.len() >= right.len() {
        (left, right)
    } else {
        (right, left)
    };
    let mut into = into.with_max_groups(max_groups)?;
    into.merge(from)?;
    Ok(into)
}

/// Reduces local tables into a [GlobalTable].
///
/// Must only be called once every worker has completed.
///
/// # Arguments
///
/// * `tables`: Local tables, one per partition
/// * `strategy`: Merge strategy
/// * `max_groups`: Optional maximum number of distinct groups in the global table
#[tracing::instrument(level = "DEBUG", skip(tables), fields(num_tables = tables.len()))]
pub fn reduce(
    tables: Vec<LocalTable>,
    strategy: MergeStrategy,
    max_groups: Option<usize>,
) -> Result<GlobalTable, SensorStatsError> {
    let global = match strategy {
        MergeStrategy::Sequential => {
            let mut reducer = Reducer::new(max_groups);
            for table in tables {
                reducer.absorb(table)?;
            }
            reducer.finish()
        }
        MergeStrategy::Tree => tables
            .into_par_iter()
            .map(Ok)
            .try_reduce(
                || GlobalTable::new(max_groups),
                |left, right| merge_tables(left, right, max_groups),
            )?
            // A lone table may be returned without passing through merge_tables.
            .with_max_groups(max_groups)?,
    };
    tracing::debug!(groups = global.len(), "local tables merged");
    Ok(global)
}
