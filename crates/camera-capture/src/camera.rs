//! Live webcam capture through nokhwa

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;
use tracing::{info, warn};

use crate::{CameraConfig, CaptureError, FrameSource, VideoFrame};

/// Driver-facing webcam
pub struct CameraSource {
    name: String,
    camera: Option<Camera>,
    sequence: u32,
    started: std::time::Instant,
}

impl CameraSource {
    /// Open the camera and start streaming at the closest supported format
    pub fn open(config: &CameraConfig) -> Result<Self, CaptureError> {
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(
                Resolution::new(config.width, config.height),
                FrameFormat::MJPEG,
                config.fps,
            ),
        ));

        let mut camera = Camera::new(CameraIndex::Index(config.index), requested)
            .map_err(|e| CaptureError::Open(e.to_string()))?;
        camera
            .open_stream()
            .map_err(|e| CaptureError::Open(e.to_string()))?;

        let format = camera.camera_format();
        info!(
            "Opened camera {} at {}x{} @ {}fps",
            config.index,
            format.resolution().width(),
            format.resolution().height(),
            format.frame_rate()
        );

        Ok(Self {
            name: format!("camera:{}", config.index),
            camera: Some(camera),
            sequence: 0,
            started: std::time::Instant::now(),
        })
    }
}

impl FrameSource for CameraSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError> {
        let Some(camera) = self.camera.as_mut() else {
            return Ok(None);
        };

        let buffer = camera
            .frame()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;
        let (width, height) = (decoded.width(), decoded.height());

        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);

        VideoFrame::new(
            decoded.into_raw(),
            width,
            height,
            self.started.elapsed().as_nanos() as u64,
            sequence,
        )
        .map(Some)
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                warn!("Failed to stop {}: {}", self.name, e);
            }
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.release();
    }
}
