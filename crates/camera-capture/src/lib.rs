//! Camera Capture Library for the Drowsiness & Lane Monitor
//!
//! Provides the frame type shared by both pipelines and the sources that
//! feed the frame loop:
//! - Driver-facing webcam (320x240) via nokhwa, behind the `camera` feature
//! - Pre-recorded road clip, either a video file (OpenCV, behind the `video`
//!   feature) or a directory of decoded frames
//! - In-memory frame scripts for tests and replays

#[cfg(feature = "camera")]
pub mod camera;
pub mod frame;
pub mod memory;
pub mod recording;
pub mod sequence;
pub mod source;
#[cfg(feature = "video")]
pub mod video;

#[cfg(feature = "camera")]
pub use camera::CameraSource;
pub use frame::VideoFrame;
pub use memory::MemorySource;
pub use recording::open_recording;
pub use sequence::ImageSequenceSource;
pub use source::FrameSource;
#[cfg(feature = "video")]
pub use video::VideoFileSource;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to open source: {0}")]
    Open(String),

    #[error("Invalid frame: expected {expected} bytes, got {actual}")]
    InvalidFrame { expected: usize, actual: usize },

    #[error("Failed to decode frame {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Streaming error: {0}")]
    Stream(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Live camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera index as enumerated by the OS backend
    pub index: u32,
    /// Requested capture width
    pub width: u32,
    /// Requested capture height
    pub height: u32,
    /// Requested FPS
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: 320,
            height: 240,
            fps: 30,
        }
    }
}
