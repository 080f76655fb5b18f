//! Advanced Driver Assistance System (ADAS)
//!
//! Lane line extraction for a road-facing frame:
//! - Luminance, Gaussian smoothing and Canny edges
//! - Region-of-interest masking
//! - Probabilistic Hough segment search and slope filtering
//! - Overlay drawing blended back onto the frame

pub mod analysis;
pub mod config;
pub mod hough;
pub mod lane;
pub mod overlay;
pub mod preprocess;

pub use analysis::LaneAnalysis;
pub use config::LaneConfig;
pub use hough::{detect_segments, HoughParams};
pub use lane::{filter_segments, LanePipeline};

use thiserror::Error;

/// ADAS error types
#[derive(Error, Debug)]
pub enum AdasError {
    #[error("Invalid frame: expected {expected} bytes, got {actual}")]
    InvalidFrame { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),
}
