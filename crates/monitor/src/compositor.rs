//! Side-by-side composition of the driver and road views

use camera_capture::{CaptureError, VideoFrame};
use image::{imageops, RgbImage};

/// All-black frame with the same dimensions (and timing) as `frame`
pub fn blank_like(frame: &VideoFrame) -> VideoFrame {
    VideoFrame {
        timestamp_ns: frame.timestamp_ns,
        sequence: frame.sequence,
        ..VideoFrame::blank(frame.width, frame.height)
    }
}

/// Place `right` next to `left`, resizing it to `left`'s dimensions first
pub fn compose(left: &VideoFrame, right: &VideoFrame) -> Result<VideoFrame, CaptureError> {
    let left_img = left.to_rgb_image()?;
    let right_img = right.resize(left.width, left.height)?.to_rgb_image()?;

    let mut canvas = RgbImage::new(left.width * 2, left.height);
    imageops::replace(&mut canvas, &left_img, 0, 0);
    imageops::replace(&mut canvas, &right_img, i64::from(left.width), 0);

    Ok(VideoFrame::from_rgb_image(canvas, left.timestamp_ns, left.sequence))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, value: u8) -> VideoFrame {
        VideoFrame::new(vec![value; (width * height * 3) as usize], width, height, 11, 4).unwrap()
    }

    #[test]
    fn test_blank_like_keeps_shape() {
        let frame = solid(32, 24, 200);
        let blank = blank_like(&frame);
        assert_eq!((blank.width, blank.height), (32, 24));
        assert_eq!(blank.sequence, 4);
        assert!(blank.is_blank());
    }

    #[test]
    fn test_compose_same_size() {
        let composed = compose(&solid(4, 3, 10), &solid(4, 3, 20)).unwrap();
        assert_eq!((composed.width, composed.height), (8, 3));
        assert_eq!(composed.get_pixel(3, 2), Some([10, 10, 10]));
        assert_eq!(composed.get_pixel(4, 0), Some([20, 20, 20]));
        assert_eq!(composed.sequence, 4);
    }

    #[test]
    fn test_compose_resizes_right() {
        let composed = compose(&solid(32, 24, 50), &solid(128, 96, 90)).unwrap();
        assert_eq!((composed.width, composed.height), (64, 24));
        assert_eq!(composed.get_pixel(40, 12), Some([90, 90, 90]));
    }

    #[test]
    fn test_blank_right_half() {
        let left = solid(20, 10, 77);
        let composed = compose(&left, &blank_like(&left)).unwrap();
        for y in 0..10 {
            for x in 0..20 {
                assert_eq!(composed.get_pixel(x, y), Some([77, 77, 77]));
                assert_eq!(composed.get_pixel(x + 20, y), Some([0, 0, 0]));
            }
        }
    }

    #[test]
    fn test_rejects_malformed_frame() {
        let mut bad = solid(4, 4, 1);
        bad.data.truncate(5);
        assert!(compose(&bad, &solid(4, 4, 1)).is_err());
    }
}
