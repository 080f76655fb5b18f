//! Lane overlay drawing and weighted blend

use geometry::LineSegment;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, BresenhamLineIter};

/// Draw a segment with round caps by stamping discs along its pixels
pub fn draw_thick_segment(img: &mut RgbImage, segment: &LineSegment, thickness: u32, color: Rgb<u8>) {
    let radius = (thickness / 2) as i32;
    let start = (segment.x1 as f32, segment.y1 as f32);
    let end = (segment.x2 as f32, segment.y2 as f32);

    for (x, y) in BresenhamLineIter::new(start, end) {
        if radius == 0 {
            if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                img.put_pixel(x as u32, y as u32, color);
            }
        } else {
            draw_filled_circle_mut(img, (x, y), radius, color);
        }
    }
}

/// Per-channel `round(base * base_weight + overlay * overlay_weight)`, saturated
pub fn blend(base: &RgbImage, overlay: &RgbImage, base_weight: f32, overlay_weight: f32) -> RgbImage {
    let mut out = base.clone();
    for (dst, src) in out.pixels_mut().zip(overlay.pixels()) {
        for c in 0..3 {
            let value = dst[c] as f32 * base_weight + src[c] as f32 * overlay_weight;
            dst[c] = value.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

    #[test]
    fn test_thick_segment_covers_width() {
        let mut img = RgbImage::new(40, 40);
        draw_thick_segment(&mut img, &LineSegment::new(5, 20, 35, 20), 5, GREEN);

        for y in 18..=22 {
            assert_eq!(*img.get_pixel(20, y), GREEN, "row {}", y);
        }
        assert_eq!(img.get_pixel(20, 24).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(20, 16).0, [0, 0, 0]);
    }

    #[test]
    fn test_thin_segment_clips() {
        let mut img = RgbImage::new(10, 10);
        draw_thick_segment(&mut img, &LineSegment::new(-5, 5, 20, 5), 1, GREEN);
        assert_eq!(*img.get_pixel(0, 5), GREEN);
        assert_eq!(*img.get_pixel(9, 5), GREEN);
    }

    #[test]
    fn test_blend_weights_and_saturation() {
        let base = RgbImage::from_pixel(2, 1, Rgb([100, 200, 255]));
        let mut overlay = RgbImage::new(2, 1);
        overlay.put_pixel(1, 0, GREEN);

        let out = blend(&base, &overlay, 0.8, 1.0);
        assert_eq!(out.get_pixel(0, 0).0, [80, 160, 204]);
        assert_eq!(out.get_pixel(1, 0).0, [80, 255, 204]);
    }
}
