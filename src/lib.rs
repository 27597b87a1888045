//! This crate computes monthly statistics of environmental sensor readings. For every device,
//! calendar month and sensor channel it reports the minimum, maximum and mean of the readings,
//! along with the number of readings.
//!
//! Records are split into contiguous partitions, one per worker. Each worker aggregates its
//! partition into a private hash table, so the hot loop takes no locks. After every worker has
//! been joined, the private tables are merged into a single global table, which is then emitted
//! in a canonical order.
//!
//! The crate is built on top of a number of open source components.
//!
//! * [Rayon](rayon) provides an optional work-stealing thread pool and the parallel tree merge.
//! * [hashbrown] provides the group tables, with borrowed-key lookups and fallible growth.
//! * [csv] reads the delimited input.
//! * [Serde](serde) performs serialisation of JSON output.
//! * [clap] parses the command line, and [validator] checks the resulting configuration.
//! * [tracing] and [prometheus] provide logging and metrics.

pub mod app;
pub mod cli;
pub mod config;
pub mod emission;
pub mod error;
pub mod executor;
pub mod local_aggregator;
pub mod metrics;
pub mod partition;
pub mod reducer;
pub mod sink;
pub mod source;
#[cfg(test)]
pub mod test_utils;
pub mod tracing;
pub mod types;
