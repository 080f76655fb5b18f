//! Edge map preparation: smoothing, Canny, sharpening and region masking

use geometry::RegionOfInterest;
use image::{GrayImage, Luma};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;

const SHARPEN_KERNEL: [i32; 9] = [0, -1, 0, -1, 5, -1, 0, -1, 0];

/// Gaussian sigma implied by a kernel size when no sigma is given
/// (same rule as OpenCV's `getGaussianKernel` with `sigma <= 0`)
pub fn sigma_for_kernel(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Smooth then extract a binary edge map
///
/// `kernel_size` only selects the sigma; `gaussian_blur_f32` derives its own
/// kernel extent from that sigma, so the window is not literally
/// `kernel_size x kernel_size`.
pub fn edge_map(gray: &GrayImage, kernel_size: u32, low: f32, high: f32) -> GrayImage {
    let blurred = gaussian_blur_f32(gray, sigma_for_kernel(kernel_size));
    canny(&blurred, low, high)
}

/// 3x3 center-weighted sharpen with replicated borders, saturating to u8
pub fn sharpen(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut out = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }

    let sample = |x: i64, y: i64| -> i32 {
        let x = x.clamp(0, width as i64 - 1) as u32;
        let y = y.clamp(0, height as i64 - 1) as u32;
        img.get_pixel(x, y)[0] as i32
    };

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let mut acc = 0;
            for (k, weight) in SHARPEN_KERNEL.iter().enumerate() {
                if *weight == 0 {
                    continue;
                }
                let dx = (k % 3) as i64 - 1;
                let dy = (k / 3) as i64 - 1;
                acc += weight * sample(x + dx, y + dy);
            }
            out.put_pixel(x as u32, y as u32, Luma([acc.clamp(0, 255) as u8]));
        }
    }
    out
}

/// Zero every pixel outside the region
pub fn mask_region(img: &mut GrayImage, roi: &RegionOfInterest) {
    let (width, height) = img.dimensions();
    let mask = roi.mask(width, height);
    for (pixel, inside) in img.pixels_mut().zip(mask) {
        if !inside {
            *pixel = Luma([0]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigma_for_default_kernel() {
        assert!((sigma_for_kernel(5) - 1.1).abs() < 1e-6);
        assert!((sigma_for_kernel(3) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_flat_image_has_no_edges() {
        let gray = GrayImage::from_pixel(64, 48, Luma([128]));
        let edges = edge_map(&gray, 5, 50.0, 150.0);
        assert!(edges.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_sharpen_boosts_isolated_pixel() {
        let mut img = GrayImage::from_pixel(5, 5, Luma([10]));
        img.put_pixel(2, 2, Luma([40]));
        let out = sharpen(&img);

        // 5 * 40 - 4 * 10
        assert_eq!(out.get_pixel(2, 2)[0], 160);
        // 5 * 10 - 3 * 10 - 40 clamps at zero
        assert_eq!(out.get_pixel(2, 1)[0], 0);
        // Corner with replicated border: 5 * 10 - 4 * 10
        assert_eq!(out.get_pixel(0, 0)[0], 10);
    }

    #[test]
    fn test_sharpen_saturates() {
        let mut img = GrayImage::new(3, 3);
        img.put_pixel(1, 1, Luma([255]));
        assert_eq!(sharpen(&img).get_pixel(1, 1)[0], 255);
    }

    #[test]
    fn test_mask_region_zeroes_outside() {
        let mut img = GrayImage::from_pixel(40, 20, Luma([255]));
        let roi = RegionOfInterest::lane_trapezoid(40, 20, 0.2, 0.6);
        mask_region(&mut img, &roi);

        assert_eq!(img.get_pixel(0, 0)[0], 0);
        assert_eq!(img.get_pixel(39, 0)[0], 0);
        assert_eq!(img.get_pixel(20, 19)[0], 255);
    }
}
