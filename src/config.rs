//! Run configuration
//!
//! Configuration for the record source and the aggregation engine. Both are validated with the
//! [validator] crate before any work begins.

use clap::ValueEnum;
use strum_macros::Display;
use validator::{Validate, ValidationError};

/// Execution backend for the aggregation workers
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum Backend {
    /// One scoped OS thread per partition
    #[default]
    Threads,
    /// A dedicated Rayon thread pool with one thread per partition
    Rayon,
}

/// Strategy used to merge local tables after the join barrier
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum MergeStrategy {
    /// Fold local tables in partition order on the calling thread
    #[default]
    Sequential,
    /// Parallel pairwise reduction of local tables
    Tree,
}

/// Configuration of the aggregation engine
#[derive(Clone, Debug, PartialEq, Validate)]
pub struct AggregationConfig {
    /// Number of workers (and partitions)
    #[validate(range(min = 1, message = "workers must be greater than 0"))]
    pub workers: usize,
    /// Optional maximum number of distinct groups per table
    #[validate(range(min = 1, message = "max_groups must be greater than 0"))]
    pub max_groups: Option<usize>,
    /// Execution backend
    pub backend: Backend,
    /// Merge strategy
    pub merge: MergeStrategy,
}

impl AggregationConfig {
    /// Returns a configuration with the given worker count and defaults for everything else.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            max_groups: None,
            backend: Backend::default(),
            merge: MergeStrategy::default(),
        }
    }
}

/// Configuration of the delimited-text record source
#[derive(Clone, Debug, PartialEq, Validate)]
pub struct SourceConfig {
    /// Field delimiter
    pub delimiter: u8,
    /// Whether the first line is a header to be skipped
    pub has_header: bool,
    /// Optional cutoff month (`YYYY-MM`); earlier records are skipped
    #[validate(custom = "validate_month")]
    pub since: Option<String>,
    /// Optional maximum number of records to accept
    #[validate(range(min = 1, message = "max_records must be greater than 0"))]
    pub max_records: Option<usize>,
    /// Number of accepted records to log as a sample
    pub sample: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            delimiter: b'|',
            has_header: true,
            since: None,
            max_records: None,
            sample: 0,
        }
    }
}

/// Validate a calendar month of the form `YYYY-MM`
fn validate_month(month: &str) -> Result<(), ValidationError> {
    let bytes = month.as_bytes();
    let well_formed = bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit);
    let month_number = if well_formed {
        month[5..].parse::<u8>().ok()
    } else {
        None
    };
    match month_number {
        Some(1..=12) => Ok(()),
        _ => {
            let mut error = ValidationError::new("Month must be of the form YYYY-MM");
            error.add_param("month".into(), &month);
            Err(error)
        }
    }
}
