//! Overlay drawing: eye contours and a small bitmap font for readouts

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::landmarks::EyeLandmarks;

const GLYPH_WIDTH: i32 = 5;
const GLYPH_HEIGHT: i32 = 7;

/// 5x7 glyph rows, most significant of the low 5 bits is the leftmost column
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        ' ' => [0x00; 7],
        _ => return None,
    };
    Some(rows)
}

/// Draw `text` with its baseline-left corner at `origin`
///
/// Lowercase letters are drawn as uppercase; characters without a glyph
/// leave a blank cell.
pub fn draw_text(img: &mut RgbImage, text: &str, origin: (i32, i32), scale: u32, color: Rgb<u8>) {
    let scale = scale.max(1) as i32;
    let top = origin.1 - GLYPH_HEIGHT * scale;
    let mut left = origin.0;

    for c in text.chars().map(|c| c.to_ascii_uppercase()) {
        if let Some(rows) = glyph(c) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                        let rect = Rect::at(left + col * scale, top + row as i32 * scale)
                            .of_size(scale as u32, scale as u32);
                        draw_filled_rect_mut(img, rect, color);
                    }
                }
            }
        }
        left += (GLYPH_WIDTH + 1) * scale;
    }
}

/// Draw an eye contour as a closed polyline
pub fn draw_eye_contour(img: &mut RgbImage, eye: &EyeLandmarks, color: Rgb<u8>) {
    let points = eye.points();
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        draw_line_segment_mut(img, (a.x as f32, a.y as f32), (b.x as f32, b.y as f32), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry::Point;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    #[test]
    fn test_text_draws_inside_cell() {
        let mut img = RgbImage::new(40, 20);
        draw_text(&mut img, "1", (2, 10), 1, RED);

        // Top of the '1' stem: column 2 of row 0 in the glyph
        assert_eq!(*img.get_pixel(4, 3), RED);
        // Nothing below the baseline
        assert!((0..40).all(|x| img.get_pixel(x, 12).0 == [0, 0, 0]));
    }

    #[test]
    fn test_text_is_clipped_at_borders() {
        let mut img = RgbImage::new(10, 10);
        draw_text(&mut img, "EAR: 0.25", (-3, 5), 2, RED);
        draw_text(&mut img, "alert!", (8, 30), 2, RED);
    }

    #[test]
    fn test_contour_closes() {
        let eye = EyeLandmarks([
            Point::new(1.0, 5.0),
            Point::new(3.0, 3.0),
            Point::new(6.0, 3.0),
            Point::new(8.0, 5.0),
            Point::new(6.0, 7.0),
            Point::new(3.0, 7.0),
        ]);
        let cyan = Rgb([0, 255, 255]);
        let mut img = RgbImage::new(10, 10);
        draw_eye_contour(&mut img, &eye, cyan);

        assert_eq!(*img.get_pixel(1, 5), cyan);
        assert_eq!(*img.get_pixel(4, 7), cyan);
        assert_eq!(img.get_pixel(5, 5).0, [0, 0, 0]);
    }
}
