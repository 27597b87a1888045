//! Command Line Interface (CLI) arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{AggregationConfig, Backend, MergeStrategy, SourceConfig};
use crate::sink::OutputFormat;

/// Per-device monthly sensor statistics
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct CommandLineArgs {
    /// Path to the delimited input file
    #[arg(env = "SENSORSTATS_INPUT")]
    pub input: PathBuf,
    /// Path to the output file
    #[arg(long, default_value = "results.csv", env = "SENSORSTATS_OUTPUT")]
    pub output: PathBuf,
    /// Format of the output file
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv, env = "SENSORSTATS_FORMAT")]
    pub format: OutputFormat,
    /// Single-byte field delimiter of the input
    #[arg(long, default_value = "|", value_parser = parse_delimiter, env = "SENSORSTATS_DELIMITER")]
    pub delimiter: u8,
    /// Treat the first input line as a record rather than a header
    #[arg(long, default_value_t = false, env = "SENSORSTATS_NO_HEADER")]
    pub no_header: bool,
    /// Skip records dated before this month (`YYYY-MM`)
    #[arg(long, env = "SENSORSTATS_SINCE")]
    pub since: Option<String>,
    /// Stop reading after this many records have been accepted
    #[arg(long, env = "SENSORSTATS_MAX_RECORDS")]
    pub max_records: Option<usize>,
    /// Number of aggregation workers
    #[arg(long, default_value_t = num_cpus::get(), env = "SENSORSTATS_WORKERS")]
    pub workers: usize,
    /// Abort if more than this many distinct groups are seen
    #[arg(long, env = "SENSORSTATS_MAX_GROUPS")]
    pub max_groups: Option<usize>,
    /// Execution backend for the aggregation workers
    #[arg(long, value_enum, default_value_t = Backend::Threads, env = "SENSORSTATS_BACKEND")]
    pub backend: Backend,
    /// Strategy used to merge worker tables
    #[arg(long, value_enum, default_value_t = MergeStrategy::Sequential, env = "SENSORSTATS_MERGE")]
    pub merge: MergeStrategy,
    /// Number of accepted records to log as a sample
    #[arg(long, default_value_t = 0, env = "SENSORSTATS_SAMPLE")]
    pub sample: usize,
    /// Print metrics in the Prometheus text format when done
    #[arg(long, default_value_t = false, env = "SENSORSTATS_PRINT_METRICS")]
    pub print_metrics: bool,
}

impl CommandLineArgs {
    /// Returns the record source configuration.
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            delimiter: self.delimiter,
            has_header: !self.no_header,
            since: self.since.clone(),
            max_records: self.max_records,
            sample: self.sample,
        }
    }

    /// Returns the aggregation configuration.
    pub fn aggregation_config(&self) -> AggregationConfig {
        AggregationConfig {
            workers: self.workers,
            max_groups: self.max_groups,
            backend: self.backend,
            merge: self.merge,
        }
    }
}

/// Parse a delimiter consisting of a single ASCII character.
fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!(
            "delimiter must be a single ASCII character, got {:?}",
            value
        )),
    }
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}
