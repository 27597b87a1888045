//! This file defines the sensorstats binary entry point.

use std::process::ExitCode;

use sensorstats::app;
use sensorstats::cli;
use sensorstats::error;
use sensorstats::metrics;
use sensorstats::tracing;

/// Application entry point
fn main() -> ExitCode {
    let args = cli::parse();
    tracing::init_tracing();
    metrics::register_metrics();
    let status = match app::run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error::log_error(&err);
            ExitCode::FAILURE
        }
    };
    if args.print_metrics {
        match metrics::render_metrics() {
            Ok(output) => print!("{}", output),
            Err(err) => {
                error::log_error(&err);
                return ExitCode::FAILURE;
            }
        }
    }
    status
}
