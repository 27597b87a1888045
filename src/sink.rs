//! Output of summary rows.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use strum_macros::Display;

use crate::emission::SummaryRow;
use crate::error::SensorStatsError;

/// Header of the delimited output format.
pub const CSV_HEADER: &str = "device;month;sensor;max;mean;min";

/// Output file format
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// `;`-separated text with two decimal places, quoted where needed
    #[default]
    Csv,
    /// Pretty-printed JSON array of rows
    Json,
}

/// Writes rows to a file, replacing any existing content.
///
/// # Arguments
///
/// * `path`: Path of the output file
/// * `rows`: Rows to write, in order
/// * `format`: Output format
#[tracing::instrument(level = "DEBUG", skip(rows), fields(num_rows = rows.len()))]
pub fn write_path(
    path: &Path,
    rows: &[SummaryRow],
    format: OutputFormat,
) -> Result<(), SensorStatsError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_rows(&mut writer, rows, format)?;
    writer.flush()?;
    tracing::info!(path = %path.display(), rows = rows.len(), "results written");
    Ok(())
}

/// Writes rows to any writer.
pub fn write_rows<W: Write>(
    writer: &mut W,
    rows: &[SummaryRow],
    format: OutputFormat,
) -> Result<(), SensorStatsError> {
    match format {
        OutputFormat::Csv => write_csv(writer, rows)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, rows)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Write `;`-separated rows. Fields containing the delimiter or a quote are quoted.
fn write_csv<W: Write>(writer: &mut W, rows: &[SummaryRow]) -> Result<(), SensorStatsError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    writer.write_record(CSV_HEADER.split(';'))?;
    for row in rows {
        let (max, mean, min) = (
            format!("{:.2}", row.max),
            format!("{:.2}", row.mean),
            format!("{:.2}", row.min),
        );
        writer.write_record([
            row.device.as_str(),
            row.month.as_str(),
            row.sensor.name(),
            max.as_str(),
            mean.as_str(),
            min.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
