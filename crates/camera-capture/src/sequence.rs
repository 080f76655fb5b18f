//! Directory-of-frames source for pre-recorded clips

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use crate::{CaptureError, FrameSource, VideoFrame};

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Plays back a clip that was exported as one image per frame
///
/// Files are visited in lexicographic order of their names, so exports named
/// `frame_00001.png`, `frame_00002.png`, ... play in capture order.
pub struct ImageSequenceSource {
    name: String,
    frames: Vec<PathBuf>,
    cursor: usize,
    frame_interval_ns: u64,
}

impl ImageSequenceSource {
    /// Index the frames in `dir`. `fps` only drives the synthetic timestamps.
    pub fn open(dir: impl AsRef<Path>, fps: u32) -> Result<Self, CaptureError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir)
            .map_err(|e| CaptureError::Open(format!("{}: {}", dir.display(), e)))?;

        let mut frames = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_frame = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if is_frame {
                frames.push(path);
            }
        }
        frames.sort();

        if frames.is_empty() {
            return Err(CaptureError::Open(format!(
                "{}: no frame images found",
                dir.display()
            )));
        }

        info!("Opened frame sequence {} ({} frames)", dir.display(), frames.len());

        Ok(Self {
            name: dir.display().to_string(),
            frames,
            cursor: 0,
            frame_interval_ns: 1_000_000_000 / u64::from(fps.max(1)),
        })
    }

    /// Total frames in the clip
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for ImageSequenceSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError> {
        let Some(path) = self.frames.get(self.cursor) else {
            return Ok(None);
        };
        let sequence = self.cursor as u32;
        self.cursor += 1;

        debug!("Decoding {}", path.display());
        let image = image::open(path)
            .map_err(|source| CaptureError::Decode {
                path: path.display().to_string(),
                source,
            })?
            .to_rgb8();

        Ok(Some(VideoFrame::from_rgb_image(
            image,
            u64::from(sequence) * self.frame_interval_ns,
            sequence,
        )))
    }

    fn release(&mut self) {
        self.cursor = self.frames.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_frame(dir: &Path, name: &str, value: u8) {
        RgbImage::from_pixel(8, 6, Rgb([value, value, value]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_plays_frames_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "frame_002.png", 20);
        write_frame(dir.path(), "frame_001.png", 10);
        std::fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();

        let mut source = ImageSequenceSource::open(dir.path(), 25).unwrap();
        assert_eq!(source.len(), 2);

        let first = source.read_frame().unwrap().unwrap();
        assert_eq!(first.get_pixel(0, 0), Some([10, 10, 10]));
        assert_eq!(first.sequence, 0);

        let second = source.read_frame().unwrap().unwrap();
        assert_eq!(second.get_pixel(0, 0), Some([20, 20, 20]));
        assert_eq!(second.timestamp_ns, 40_000_000);

        assert!(source.read_frame().unwrap().is_none());
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ImageSequenceSource::open(dir.path(), 25),
            Err(CaptureError::Open(_))
        ));
    }

    #[test]
    fn test_release_ends_stream() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "a.png", 1);
        let mut source = ImageSequenceSource::open(dir.path(), 25).unwrap();
        source.release();
        assert!(source.read_frame().unwrap().is_none());
    }
}
