//! End-to-end run of the sensorstats pipeline.
//!
//! Reads records, aggregates them across the configured workers, emits the summary rows in
//! canonical order and writes them to the output file.

use validator::Validate;

use crate::cli::CommandLineArgs;
use crate::emission::{emit, RowOrder};
use crate::error::SensorStatsError;
use crate::executor::{aggregate, AggregationStats};
use crate::metrics;
use crate::sink;
use crate::source::{self, ReadSummary};

/// Outcome of a successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub read: ReadSummary,
    pub aggregation: AggregationStats,
    /// Number of rows written
    pub rows: usize,
}

/// Runs the pipeline described by the command line arguments.
///
/// Configuration is validated before the input is opened. An input without any valid record is
/// an error and no output is written.
#[tracing::instrument(level = "DEBUG", skip(args), fields(input = %args.input.display()))]
pub fn run(args: &CommandLineArgs) -> Result<RunSummary, SensorStatsError> {
    let source_config = args.source_config();
    source_config.validate()?;
    let aggregation_config = args.aggregation_config();
    aggregation_config.validate()?;

    let (records, read) = source::read_path(&args.input, &source_config)?;
    if records.is_empty() {
        return Err(SensorStatsError::NoRecords {
            path: args.input.display().to_string(),
        });
    }

    let aggregation = aggregate(&records, &aggregation_config)?;
    drop(records);
    let rows = emit(aggregation.table, RowOrder::Canonical);
    sink::write_path(&args.output, &rows, args.format)?;
    metrics::GROUPS_EMITTED.inc_by(rows.len() as u64);

    Ok(RunSummary {
        read,
        aggregation: aggregation.stats,
        rows: rows.len(),
    })
}
