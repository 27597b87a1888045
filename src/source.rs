//! Delimited-text record source.
//!
//! Reads sensor records, one per line, with [FIELD_COUNT] fields separated by a single byte
//! delimiter (`|` by default). Every field is trimmed. Empty numeric fields default to zero and
//! empty text fields to the empty string. Lines that cannot be turned into a record are skipped
//! with a diagnostic, so only valid records reach the aggregation engine.

use std::fs::File;
use std::io;
use std::mem;
use std::path::Path;
use std::str::FromStr;

use crate::config::SourceConfig;
use crate::error::SensorStatsError;
use crate::metrics;
use crate::types::record::MONTH_PREFIX_LEN;
use crate::types::SensorRecord;

/// Number of fields in an input line.
pub const FIELD_COUNT: usize = 12;

/// Names of the input fields, in order.
pub const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "id",
    "device",
    "count",
    "date",
    "temperature",
    "humidity",
    "luminosity",
    "noise",
    "eco2",
    "etvoc",
    "latitude",
    "longitude",
];

/// Log progress after this many accepted records.
const PROGRESS_INTERVAL: usize = 1000;

/// Counts of what happened to the input lines.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadSummary {
    /// Records accepted
    pub accepted: usize,
    /// Lines containing only whitespace and delimiters
    pub blank: usize,
    /// Records dated before the cutoff month
    pub below_cutoff: usize,
    /// Lines without exactly [FIELD_COUNT] fields
    pub wrong_field_count: usize,
    /// Lines with a numeric field that could not be parsed
    pub malformed: usize,
    /// Whether a further acceptable record was left unread once the record limit was reached
    pub truncated: bool,
}

/// Reads records from a file.
///
/// # Arguments
///
/// * `path`: Path of the input file
/// * `config`: Source configuration
#[tracing::instrument(level = "DEBUG", skip(config))]
pub fn read_path(
    path: &Path,
    config: &SourceConfig,
) -> Result<(Vec<SensorRecord>, ReadSummary), SensorStatsError> {
    let file = File::open(path)?;
    read_records(file, config)
}

/// Reads records from any reader.
///
/// # Arguments
///
/// * `reader`: Source of delimited text
/// * `config`: Source configuration
pub fn read_records<R: io::Read>(
    reader: R,
    config: &SourceConfig,
) -> Result<(Vec<SensorRecord>, ReadSummary), SensorStatsError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(config.has_header)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut summary = ReadSummary::default();
    let mut raw = csv::ByteRecord::new();
    while reader.read_byte_record(&mut raw)? {
        let line = raw.position().map_or(0, |position| position.line());
        let mut row = match csv::StringRecord::from_byte_record(mem::take(&mut raw)) {
            Ok(row) => row,
            Err(err) => {
                tracing::warn!(
                    line,
                    field = err.utf8_error().field(),
                    "skipping line with invalid UTF-8"
                );
                summary.malformed += 1;
                continue;
            }
        };
        row.trim();
        if row.iter().all(str::is_empty) {
            summary.blank += 1;
            continue;
        }
        if row.len() != FIELD_COUNT {
            tracing::debug!(line, fields = row.len(), "skipping line with wrong field count");
            summary.wrong_field_count += 1;
            continue;
        }
        let record = match parse_record(&row) {
            Ok(record) => record,
            Err(field) => {
                tracing::warn!(line, field, "skipping line with malformed field");
                summary.malformed += 1;
                continue;
            }
        };
        if let Some(since) = &config.since {
            if !on_or_after(&record.date, since) {
                summary.below_cutoff += 1;
                continue;
            }
        }
        if Some(summary.accepted) == config.max_records {
            tracing::warn!(
                max_records = summary.accepted,
                "record limit reached, remaining input ignored"
            );
            summary.truncated = true;
            break;
        }
        if summary.accepted < config.sample {
            tracing::info!(?record, "sample record");
        }
        records
            .try_reserve(1)
            .map_err(|_| SensorStatsError::ResourceExhaustion {
                context: "reading records",
            })?;
        records.push(record);
        summary.accepted += 1;
        if summary.accepted % PROGRESS_INTERVAL == 0 {
            tracing::debug!(accepted = summary.accepted, "reading records");
        }
    }

    metrics::RECORDS_READ.inc_by(summary.accepted as u64);
    for (reason, count) in [
        ("below_cutoff", summary.below_cutoff),
        ("field_count", summary.wrong_field_count),
        ("malformed", summary.malformed),
    ] {
        metrics::RECORDS_SKIPPED
            .with_label_values(&[reason])
            .inc_by(count as u64);
    }
    tracing::info!(
        accepted = summary.accepted,
        below_cutoff = summary.below_cutoff,
        wrong_field_count = summary.wrong_field_count,
        malformed = summary.malformed,
        truncated = summary.truncated,
        "records read"
    );
    Ok((records, summary))
}

/// Whether the calendar month of `date` is on or after `since`.
///
/// Dates shorter than a full month prefix are never on or after the cutoff.
fn on_or_after(date: &str, since: &str) -> bool {
    date.as_bytes()
        .get(..MONTH_PREFIX_LEN)
        .map_or(false, |month| month >= since.as_bytes())
}

/// Parse a row with exactly [FIELD_COUNT] trimmed fields.
///
/// Returns the name of the first field that could not be parsed on failure.
fn parse_record(row: &csv::StringRecord) -> Result<SensorRecord, &'static str> {
    Ok(SensorRecord {
        id: parse_field(row, 0)?,
        device: row[1].to_string(),
        count: parse_field(row, 2)?,
        date: row[3].to_string(),
        temperature: parse_reading(row, 4)?,
        humidity: parse_reading(row, 5)?,
        luminosity: parse_reading(row, 6)?,
        noise: parse_reading(row, 7)?,
        eco2: parse_reading(row, 8)?,
        etvoc: parse_reading(row, 9)?,
        latitude: parse_reading(row, 10)?,
        longitude: parse_reading(row, 11)?,
    })
}

/// Parse a numeric field, defaulting an empty field.
fn parse_field<T: FromStr + Default>(
    row: &csv::StringRecord,
    index: usize,
) -> Result<T, &'static str> {
    let field = &row[index];
    if field.is_empty() {
        return Ok(T::default());
    }
    field.parse().map_err(|_| FIELD_NAMES[index])
}

/// Parse a floating point field, rejecting NaN and infinities.
fn parse_reading(row: &csv::StringRecord, index: usize) -> Result<f64, &'static str> {
    let value: f64 = parse_field(row, index)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FIELD_NAMES[index])
    }
}
