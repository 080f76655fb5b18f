//! Drowsiness & Lane Monitor
//!
//! Wires the driver-facing and road-facing pipelines into one frame loop and
//! shows both side by side.

pub mod compositor;
pub mod config;
pub mod display;
pub mod driver;
pub mod logging;

pub use crate::config::{AppConfig, Args, ConfigError};
pub use display::{DisplayError, FrameSink, HeadlessSink};
#[cfg(feature = "window")]
pub use display::WindowSink;
pub use driver::{FrameLoop, LoopStats, TickOutcome};
pub use logging::init_logging;

use thiserror::Error;

/// Monitor error types
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Capture error: {0}")]
    Capture(#[from] camera_capture::CaptureError),

    #[error("Drowsiness detector error: {0}")]
    Dms(#[from] dms::DmsError),

    #[error("Lane pipeline error: {0}")]
    Adas(#[from] adas::AdasError),

    #[error("Alarm error: {0}")]
    Alarm(#[from] alerting::AlarmError),

    #[error("Display error: {0}")]
    Display(#[from] DisplayError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
