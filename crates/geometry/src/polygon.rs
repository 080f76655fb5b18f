//! Polygonal regions of interest

use serde::{Deserialize, Serialize};
use crate::point::Point;
use crate::GeometryError;

/// Distance (pixels) from an edge within which a pixel counts as inside.
/// Matches a filled rasterization that paints the boundary itself.
const EDGE_TOLERANCE: f64 = 0.5;

/// Closed polygon restricting where lane lines are searched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    vertices: Vec<Point>,
}

impl RegionOfInterest {
    /// Create a region from an ordered vertex list (at least 3 vertices)
    pub fn new(vertices: Vec<Point>) -> Result<Self, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }
        Ok(Self { vertices })
    }

    /// Trapezoid anchored on the bottom corners of a `width x height` frame.
    ///
    /// The top edge is centered horizontally, spans `top_width_fraction` of the
    /// width and sits at `top_height_fraction` of the height (measured from
    /// the top of the frame). Fractions are resolved to whole percent and the
    /// offsets from the frame center are floored separately, so `(0.2, 0.6)`
    /// gives a top edge at `h/2 + h/10` spanning `w/2 -+ w/10`.
    pub fn lane_trapezoid(
        width: u32,
        height: u32,
        top_width_fraction: f64,
        top_height_fraction: f64,
    ) -> Self {
        let percent = |f: f64| (f * 100.0).round() as i64;
        let (w, h) = (i64::from(width), i64::from(height));
        let half_top = (w * percent(top_width_fraction)).div_euclid(200);
        let center = w / 2;
        let top_y = h / 2 + (h * (percent(top_height_fraction) - 50)).div_euclid(100);

        Self {
            vertices: vec![
                Point::new(0.0, h as f64),
                Point::new((center - half_top) as f64, top_y as f64),
                Point::new((center + half_top) as f64, top_y as f64),
                Point::new(w as f64, h as f64),
            ],
        }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Whether pixel `(x, y)` falls inside the polygon or on its boundary
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let p = Point::new(x, y);
        let n = self.vertices.len();
        let mut inside = false;

        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + n - 1) % n];

            if distance_to_segment(p, a, b) <= EDGE_TOLERANCE {
                return true;
            }

            if (a.y > y) != (b.y > y) {
                let x_cross = a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y);
                if x < x_cross {
                    inside = !inside;
                }
            }
        }

        inside
    }

    /// Row-major inclusion mask for a `width x height` raster
    pub fn mask(&self, width: u32, height: u32) -> Vec<bool> {
        let mut mask = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                mask.push(self.contains(x as f64, y as f64));
            }
        }
        mask
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return crate::distance(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    crate::distance(p, Point::new(a.x + t * dx, a.y + t * dy))
}
