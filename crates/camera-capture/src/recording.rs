//! Opening a pre-recorded clip from a path

use std::path::Path;

use crate::{CaptureError, FrameSource, ImageSequenceSource};

/// Open the clip at `path`
///
/// A directory is played as an image sequence; a file is decoded as video,
/// which needs the `video` feature.
pub fn open_recording(path: impl AsRef<Path>, fps: u32) -> Result<Box<dyn FrameSource>, CaptureError> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(Box::new(ImageSequenceSource::open(path, fps)?));
    }
    if !path.exists() {
        return Err(CaptureError::Open(format!("{}: no such file or directory", path.display())));
    }

    #[cfg(feature = "video")]
    {
        Ok(Box::new(crate::VideoFileSource::open(path, fps)?))
    }

    #[cfg(not(feature = "video"))]
    {
        Err(CaptureError::Open(format!(
            "{}: video files require the `video` feature",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_directory_opens_as_sequence() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]))
            .save(dir.path().join("frame_001.png"))
            .unwrap();

        let mut source = open_recording(dir.path(), 30).unwrap();
        let frame = source.read_frame().unwrap().unwrap();
        assert_eq!(frame.get_pixel(0, 0), Some([9, 9, 9]));
        assert!(source.read_frame().unwrap().is_none());
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            open_recording(dir.path().join("spv.mp4"), 30),
            Err(CaptureError::Open(_))
        ));
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spv.mp4");
        std::fs::write(&path, b"not a video").unwrap();

        // Without the feature the file is refused; with it OpenCV cannot decode it
        assert!(matches!(open_recording(&path, 30), Err(CaptureError::Open(_))));
    }
}
