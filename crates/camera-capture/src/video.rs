//! Encoded video file playback through OpenCV

use std::path::Path;

use opencv::core::Mat;
use opencv::imgproc;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use tracing::info;

use crate::{CaptureError, FrameSource, VideoFrame};

/// Plays back a pre-recorded clip such as an `.mp4`
///
/// Timestamps come from the container's frame rate, falling back to
/// `fallback_fps` when the file does not report one.
pub struct VideoFileSource {
    name: String,
    capture: Option<VideoCapture>,
    frame_interval_ns: u64,
    sequence: u32,
}

impl VideoFileSource {
    pub fn open(path: impl AsRef<Path>, fallback_fps: u32) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let open_error = |e: opencv::Error| CaptureError::Open(format!("{}: {}", name, e));

        let capture = VideoCapture::from_file(&name, videoio::CAP_ANY).map_err(open_error)?;
        if !capture.is_opened().map_err(open_error)? {
            return Err(CaptureError::Open(format!("{}: not a readable video", name)));
        }

        let fps = capture.get(videoio::CAP_PROP_FPS).map_err(open_error)?;
        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            f64::from(fallback_fps.max(1))
        };
        let frames = capture
            .get(videoio::CAP_PROP_FRAME_COUNT)
            .map_err(open_error)?;
        info!("Opened video {} ({:.0} frames @ {:.1} fps)", name, frames, fps);

        Ok(Self {
            name,
            capture: Some(capture),
            frame_interval_ns: (1e9 / fps).round() as u64,
            sequence: 0,
        })
    }
}

impl FrameSource for VideoFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError> {
        let Some(capture) = self.capture.as_mut() else {
            return Ok(None);
        };
        let stream_error = |e: opencv::Error| CaptureError::Stream(e.to_string());

        let mut bgr = Mat::default();
        if !capture.read(&mut bgr).map_err(stream_error)? || bgr.empty() {
            return Ok(None);
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color_def(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB).map_err(stream_error)?;
        let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
        let data = rgb.data_bytes().map_err(stream_error)?.to_vec();

        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        VideoFrame::new(
            data,
            width,
            height,
            u64::from(sequence) * self.frame_interval_ns,
            sequence,
        )
        .map(Some)
    }

    fn release(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            // Best effort; the handle is dropped either way
            let _ = capture.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            VideoFileSource::open(dir.path().join("missing.mp4"), 30),
            Err(CaptureError::Open(_))
        ));
    }
}
