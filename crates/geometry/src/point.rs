//! Points, distances and the eye aspect ratio

use serde::{Deserialize, Serialize};
use crate::GeometryError;

/// Planar point in image-pixel coordinates
///
/// Serialized as a two-element array `[x, y]`, which is how landmark tools
/// usually dump contours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Uniformly scale both coordinates
    pub fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Euclidean distance between two points
pub fn distance(p: Point, q: Point) -> f64 {
    (p.x - q.x).hypot(p.y - q.y)
}

/// Eye Aspect Ratio of a 6-point eye contour
///
/// Points are in anatomical order: corner p1, upper lid p2 and p3, corner p4,
/// lower lid p5 and p6. EAR = (|p2-p6| + |p3-p5|) / (2 * |p1-p4|).
pub fn eye_aspect_ratio(eye: &[Point; 6]) -> Result<f64, GeometryError> {
    let horizontal = distance(eye[0], eye[3]);
    if horizontal == 0.0 {
        return Err(GeometryError::DegenerateEye);
    }

    let vertical_a = distance(eye[1], eye[5]);
    let vertical_b = distance(eye[2], eye[4]);

    Ok((vertical_a + vertical_b) / (2.0 * horizontal))
}
