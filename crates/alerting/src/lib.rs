//! Alerting System
//!
//! Drives the audible drowsiness alarm. Playback runs on a background tokio
//! task so the frame loop never waits on audio.

mod backend;
mod config;
mod controller;

pub use backend::{AudioBackend, CommandPlayer, PlaybackFuture};
pub use config::AlarmConfig;
pub use controller::AlarmController;

use std::path::PathBuf;
use thiserror::Error;

/// Alarm error types
#[derive(Error, Debug)]
pub enum AlarmError {
    #[error("Alarm sound not found: {0}")]
    AssetMissing(PathBuf),

    #[error("Audio backend error: {0}")]
    Backend(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}
