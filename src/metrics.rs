//! Prometheus metrics for a run.
//!
//! A batch run has nothing to scrape it, so metrics are rendered in the text exposition format at
//! the end of the run (suitable for a node exporter textfile collector).

use lazy_static::lazy_static;
use prometheus::{
    self, Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts,
    Registry,
};
use std::sync::Once;

use crate::error::SensorStatsError;

lazy_static! {
    // Registry for holding metric state
    pub static ref REGISTRY: Registry = Registry::new();
    // Records accepted by the record source
    pub static ref RECORDS_READ: IntCounter = IntCounter::new(
        "records_read", "The number of records accepted from the input"
    ).unwrap();
    // Lines skipped by the record source, by reason
    pub static ref RECORDS_SKIPPED: IntCounterVec = IntCounterVec::new(
        Opts::new("records_skipped", "The number of input lines skipped"),
        &["reason"]
    ).unwrap();
    // Summary rows written
    pub static ref GROUPS_EMITTED: IntCounter = IntCounter::new(
        "groups_emitted", "The number of (device, month, sensor) groups written"
    ).unwrap();
    // Time taken by each worker to scan its partition
    pub static ref PARTITION_SCAN_TIME: Histogram = Histogram::with_opts(
        HistogramOpts::new("partition_scan_seconds", "The time taken to aggregate one partition")
    ).unwrap();
    // Time taken by each phase of the aggregation
    pub static ref PHASE_TIME: HistogramVec = HistogramVec::new(
        HistogramOpts::new("phase_seconds", "The time taken by each aggregation phase"),
        &["phase"]
    ).unwrap();
}

static REGISTER: Once = Once::new();

/// Register all metrics with the crate registry. Subsequent calls have no effect.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        REGISTRY.register(Box::new(RECORDS_READ.clone())).unwrap();
        REGISTRY
            .register(Box::new(RECORDS_SKIPPED.clone()))
            .unwrap();
        REGISTRY.register(Box::new(GROUPS_EMITTED.clone())).unwrap();
        REGISTRY
            .register(Box::new(PARTITION_SCAN_TIME.clone()))
            .unwrap();
        REGISTRY.register(Box::new(PHASE_TIME.clone())).unwrap();
    });
}

/// Render all registered metrics in the Prometheus text format.
pub fn render_metrics() -> Result<String, SensorStatsError> {
    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
