//! Fork-join execution of an aggregation run.
//!
//! The record set is split into one contiguous partition per worker. Each worker aggregates its
//! partition into a private [LocalTable] without any shared mutable state. Once every worker has
//! been joined, the local tables are moved to the reducer and merged into the [GlobalTable].

use std::num::NonZeroUsize;
use std::ops::Range;
use std::thread;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::Span;

use crate::config::{AggregationConfig, Backend};
use crate::error::SensorStatsError;
use crate::local_aggregator::{aggregate_partition, LocalTable};
use crate::metrics;
use crate::partition::partition;
use crate::reducer::{reduce, GlobalTable};
use crate::types::SensorRecord;

/// Statistics of a single partition scan.
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionStats {
    /// Index of the partition
    pub index: usize,
    /// Range of record indices scanned
    pub range: Range<usize>,
    /// Number of distinct groups in the local table
    pub groups: usize,
    /// Time taken to scan the partition
    pub elapsed: Duration,
}

/// Statistics of an aggregation run.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregationStats {
    /// Number of records aggregated
    pub records: usize,
    /// Per-partition statistics, in partition order
    pub partitions: Vec<PartitionStats>,
    /// Number of distinct groups in the global table
    pub groups: usize,
    /// Time between starting the first worker and joining the last
    pub scan_elapsed: Duration,
    /// Time taken to merge the local tables
    pub reduce_elapsed: Duration,
}

/// Result of an aggregation run.
#[derive(Debug)]
pub struct Aggregation {
    /// The merged table, read-only from here on
    pub table: GlobalTable,
    pub stats: AggregationStats,
}

type Scanned = (LocalTable, PartitionStats);

/// Aggregates a record set using the given configuration.
///
/// # Arguments
///
/// * `records`: The records to aggregate. They are only read.
/// * `config`: Aggregation configuration
#[tracing::instrument(
    level = "DEBUG",
    skip(records, config),
    fields(
        num_records = records.len(),
        workers = config.workers,
        backend = %config.backend,
        merge = %config.merge
    )
)]
pub fn aggregate(
    records: &[SensorRecord],
    config: &AggregationConfig,
) -> Result<Aggregation, SensorStatsError> {
    let workers = NonZeroUsize::new(config.workers).ok_or_else(|| {
        SensorStatsError::Configuration {
            reason: "worker count must be at least 1".to_string(),
        }
    })?;
    let ranges = partition(records.len(), workers);

    let pool = match config.backend {
        Backend::Threads => None,
        Backend::Rayon => Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(workers.get())
                .thread_name(|index| format!("sensorstats-worker-{}", index))
                .build()?,
        ),
    };

    let scan_start = Instant::now();
    let scanned = match &pool {
        None => scan_threads(records, ranges, config.max_groups)?,
        Some(pool) => scan_rayon(pool, records, ranges, config.max_groups)?,
    };
    // Every worker has been joined at this point.
    let scan_elapsed = scan_start.elapsed();
    metrics::PHASE_TIME
        .with_label_values(&["scan"])
        .observe(scan_elapsed.as_secs_f64());

    let (tables, partitions): (Vec<LocalTable>, Vec<PartitionStats>) =
        scanned.into_iter().unzip();

    let reduce_start = Instant::now();
    let table = match &pool {
        None => reduce(tables, config.merge, config.max_groups)?,
        Some(pool) => {
            let span = Span::current();
            pool.install(|| span.in_scope(|| reduce(tables, config.merge, config.max_groups)))?
        }
    };
    let reduce_elapsed = reduce_start.elapsed();
    metrics::PHASE_TIME
        .with_label_values(&["reduce"])
        .observe(reduce_elapsed.as_secs_f64());

    let stats = AggregationStats {
        records: records.len(),
        partitions,
        groups: table.len(),
        scan_elapsed,
        reduce_elapsed,
    };
    tracing::info!(
        records = stats.records,
        partitions = stats.partitions.len(),
        groups = stats.groups,
        scan_ms = scan_elapsed.as_millis() as u64,
        reduce_ms = reduce_elapsed.as_millis() as u64,
        "aggregation complete"
    );
    Ok(Aggregation { table, stats })
}

/// Aggregates a record set with `workers` workers and otherwise default configuration.
pub fn aggregate_with_workers(
    records: &[SensorRecord],
    workers: usize,
) -> Result<Aggregation, SensorStatsError> {
    aggregate(records, &AggregationConfig::with_workers(workers))
}

/// Scan one partition into a local table.
fn scan_partition(
    index: usize,
    records: &[SensorRecord],
    range: Range<usize>,
    max_groups: Option<usize>,
) -> Result<Scanned, SensorStatsError> {
    let start = Instant::now();
    let table = aggregate_partition(index, &records[range.clone()], max_groups)?;
    let elapsed = start.elapsed();
    metrics::PARTITION_SCAN_TIME.observe(elapsed.as_secs_f64());
    let stats = PartitionStats {
        index,
        range,
        groups: table.len(),
        elapsed,
    };
    Ok((table, stats))
}

/// Scan partitions on one scoped OS thread each, joining all of them before returning.
fn scan_threads(
    records: &[SensorRecord],
    ranges: Vec<Range<usize>>,
    max_groups: Option<usize>,
) -> Result<Vec<Scanned>, SensorStatsError> {
    let span = Span::current();
    let joined = thread::scope(|scope| -> Result<Vec<_>, SensorStatsError> {
        let mut handles = Vec::with_capacity(ranges.len());
        for (index, range) in ranges.into_iter().enumerate() {
            let span = span.clone();
            let handle = thread::Builder::new()
                .name(format!("sensorstats-worker-{}", index))
                .spawn_scoped(scope, move || {
                    span.in_scope(|| scan_partition(index, records, range, max_groups))
                })?;
            handles.push(handle);
        }
        // Join every worker before looking at any result.
        Ok(handles.into_iter().map(|handle| handle.join()).collect())
    })?;
    joined
        .into_iter()
        .enumerate()
        .map(|(partition, result)| {
            result
                .map_err(|_| SensorStatsError::WorkerPanicked { partition })
                .and_then(|scanned| scanned)
        })
        .collect()
}

/// Scan partitions as tasks on a Rayon pool, collecting all results before returning.
fn scan_rayon(
    pool: &rayon::ThreadPool,
    records: &[SensorRecord],
    ranges: Vec<Range<usize>>,
    max_groups: Option<usize>,
) -> Result<Vec<Scanned>, SensorStatsError> {
    let span = Span::current();
    pool.install(|| {
        ranges
            .into_par_iter()
            .enumerate()
            .map(|(index, range)| {
                span.in_scope(|| scan_partition(index, records, range, max_groups))
            })
            .collect()
    })
}
