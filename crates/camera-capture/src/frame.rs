//! Video frame types and processing

use image::{imageops, GrayImage, ImageBuffer, Luma, RgbImage};
use crate::CaptureError;

/// Decoded RGB video frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        timestamp_ns: u64,
        sequence: u32,
    ) -> Result<Self, CaptureError> {
        let expected = (width as usize) * (height as usize) * 3;
        if data.len() != expected {
            return Err(CaptureError::InvalidFrame {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        })
    }

    /// All-black frame
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; (width as usize) * (height as usize) * 3],
            width,
            height,
            timestamp_ns: 0,
            sequence: 0,
        }
    }

    /// Wrap a decoded RGB image
    pub fn from_rgb_image(image: RgbImage, timestamp_ns: u64, sequence: u32) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.into_raw(),
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Copy the frame into an `RgbImage`
    pub fn to_rgb_image(&self) -> Result<RgbImage, CaptureError> {
        ImageBuffer::from_raw(self.width, self.height, self.data.clone()).ok_or(
            CaptureError::InvalidFrame {
                expected: self.expected_len(),
                actual: self.data.len(),
            },
        )
    }

    /// Edit the frame in place through an `RgbImage` view
    pub fn with_image_mut<F>(&mut self, f: F) -> Result<(), CaptureError>
    where
        F: FnOnce(&mut RgbImage),
    {
        let expected = self.expected_len();
        let actual = self.data.len();
        if actual != expected {
            return Err(CaptureError::InvalidFrame { expected, actual });
        }
        let data = std::mem::take(&mut self.data);
        let mut img: RgbImage = match ImageBuffer::from_raw(self.width, self.height, data) {
            Some(img) => img,
            None => return Err(CaptureError::InvalidFrame { expected, actual }),
        };
        f(&mut img);
        self.data = img.into_raw();
        Ok(())
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        self.data.get(idx..idx + 3).map(|p| [p[0], p[1], p[2]])
    }

    /// Convert to a single luminance channel
    pub fn to_grayscale(&self) -> GrayImage {
        let mut gray = GrayImage::new(self.width, self.height);
        for (dst, pixel) in gray.pixels_mut().zip(self.data.chunks_exact(3)) {
            // Luminance formula: 0.299*R + 0.587*G + 0.114*B
            let y = pixel[0] as f32 * 0.299
                + pixel[1] as f32 * 0.587
                + pixel[2] as f32 * 0.114;
            *dst = Luma([y.round().min(255.0) as u8]);
        }
        gray
    }

    /// Resize frame using bilinear interpolation
    pub fn resize(&self, new_width: u32, new_height: u32) -> Result<VideoFrame, CaptureError> {
        if new_width == self.width && new_height == self.height {
            return Ok(self.clone());
        }
        let img = self.to_rgb_image()?;
        let resized = imageops::resize(&img, new_width, new_height, imageops::FilterType::Triangle);
        Ok(VideoFrame::from_rgb_image(resized, self.timestamp_ns, self.sequence))
    }

    /// True when every byte is zero
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    fn expected_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 3
    }
}
