//! Logging setup from the CLI's global flags.

use std::fs::OpenOptions;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::cli::{LogFormat, LogOptions};
use crate::CliError;

/// Initializes the global tracing subscriber.
///
/// Must run before anything logs; called once from `main`.
pub fn init(options: &LogOptions) -> Result<(), CliError> {
    let filter = EnvFilter::try_new(&options.filter)
        .map_err(|e| CliError::Logging(format!("invalid filter '{}': {e}", options.filter)))?;

    let (writer, ansi) = match options.destination.as_str() {
        "stderr" => (BoxMakeWriter::new(std::io::stderr), true),
        "stdout" => (BoxMakeWriter::new(std::io::stdout), true),
        path => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| CliError::Logging(format!("cannot open log file '{path}': {e}")))?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi);

    match options.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }

    Ok(())
}
