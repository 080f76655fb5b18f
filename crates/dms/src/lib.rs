//! Driver Monitoring System (DMS)
//!
//! Per-frame driver drowsiness analysis from eye landmarks:
//! - Eye Aspect Ratio (EAR) per face
//! - Debounced low-EAR counter with an edge-triggered alarm
//! - Overlay annotations (eye contours, EAR readout, alert label)

pub mod analysis;
pub mod config;
pub mod detector;
pub mod landmarks;
pub mod overlay;
pub mod state;

pub use analysis::{FaceAssessment, FrameAssessment};
pub use config::{DrowsinessConfig, MissingFacePolicy, MultiFacePolicy};
pub use detector::DrowsinessDetector;
pub use landmarks::{EyeLandmarks, FaceLandmarks, LandmarkProvider, LandmarkReplay};
pub use state::{AlarmTransition, DrowsinessPhase, DrowsinessState};

use thiserror::Error;

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    #[error("Landmark data invalid: {0}")]
    Landmarks(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
