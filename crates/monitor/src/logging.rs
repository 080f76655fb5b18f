//! Tracing subscriber setup

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::{LogFormat, LoggingConfig};
use crate::MonitorError;

/// Initialize logging. Call once, before the frame loop starts.
pub fn init_logging(config: &LoggingConfig) -> Result<(), MonitorError> {
    let level = Level::from_str(&config.level)
        .map_err(|_| MonitorError::Logging(format!("unknown log level '{}'", config.level)))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = match config.format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };
    result.map_err(|e| MonitorError::Logging(e.to_string()))
}
