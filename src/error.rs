//! Error handling.

use std::error::Error;
use thiserror::Error;
use tracing::{event, Level};

/// Sensor statistics error type
///
/// This type encapsulates the various errors that may occur while reading records, aggregating
/// them and writing results. None of them are retried: aggregation is a pure computation over
/// in-memory data, so any error aborts the run before output is written.
#[derive(Debug, Error)]
pub enum SensorStatsError {
    /// Caller-correctable configuration error, detected before any work begins
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    /// Error validating configuration
    #[error("configuration is not valid")]
    ConfigValidation(#[from] validator::ValidationErrors),

    /// Error reading delimited input or writing delimited results
    #[error("failed to process delimited text")]
    Csv(#[from] csv::Error),

    /// A table reached its configured maximum number of distinct groups
    #[error("number of distinct groups exceeds the configured maximum of {capacity}")]
    GroupCapacityExceeded { capacity: usize },

    /// Error reading input or writing output
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Error serialising results as JSON
    #[error("failed to serialise results as JSON")]
    Json(#[from] serde_json::Error),

    /// Error encoding metrics
    #[error("failed to encode metrics")]
    Metrics(#[from] prometheus::Error),

    /// The input contained no usable records
    #[error("no valid records found in {path}")]
    NoRecords { path: String },

    /// Allocation failure while growing a table
    #[error("insufficient memory while {context}")]
    ResourceExhaustion { context: &'static str },

    /// Error creating the worker thread pool
    #[error("failed to create worker thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// An aggregation worker panicked before completing its partition
    #[error("aggregation worker for partition {partition} panicked")]
    WorkerPanicked { partition: usize },
}

/// Returns the messages of the chain of errors that caused `error`, without duplicates.
pub fn causes<E>(error: &E) -> Vec<String>
where
    E: std::error::Error,
{
    let mut caused_by = Vec::new();
    let mut current = error.source();
    while let Some(source) = current {
        caused_by.push(source.to_string());
        current = source.source();
    }
    // Remove duplicate entries.
    caused_by.dedup();
    caused_by
}

/// Log an error and its causes.
pub fn log_error(error: &SensorStatsError) {
    event!(Level::ERROR, "{}", error.to_string());
    for cause in causes(error) {
        event!(Level::ERROR, "Caused by: {}", cause);
    }
}
