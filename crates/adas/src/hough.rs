//! Progressive probabilistic Hough transform
//!
//! Finds line segments in a binary edge map. Edge points are visited in a
//! random (seeded) order; each point votes in the (theta, rho) accumulator and
//! as soon as a bin reaches the vote threshold the line through the point is
//! walked in both directions, bridging gaps up to `max_line_gap`. Points on an
//! accepted segment are removed from the map and their votes withdrawn, so
//! each edge pixel contributes to at most one segment.

use std::f64::consts::PI;

use geometry::LineSegment;
use image::GrayImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed-point shift used while walking along a line
const SHIFT: i32 = 16;

/// Hough search parameters
#[derive(Debug, Clone, PartialEq)]
pub struct HoughParams {
    /// Distance resolution (pixels)
    pub rho: f64,
    /// Angle resolution (radians)
    pub theta: f64,
    /// Minimum votes for a line
    pub threshold: u32,
    /// Minimum segment extent along x or y
    pub min_line_length: u32,
    /// Maximum gap bridged along a segment
    pub max_line_gap: u32,
    /// Stop after this many segments
    pub max_lines: usize,
    /// Seed for the point visiting order
    pub seed: u64,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            rho: 2.0,
            theta: PI / 180.0,
            threshold: 100,
            min_line_length: 80,
            max_line_gap: 50,
            max_lines: usize::MAX,
            seed: 0xFFFF_FFFF,
        }
    }
}

struct Accumulator {
    /// (cos, sin) / rho per angle bin
    trig: Vec<(f64, f64)>,
    num_rho: usize,
    offset: i32,
    votes: Vec<i32>,
}

impl Accumulator {
    fn new(width: i32, height: i32, params: &HoughParams) -> Self {
        let irho = 1.0 / params.rho;
        let num_angle = ((PI / params.theta).round() as usize).max(1);
        // A coarse rho still needs one bin
        let num_rho = (((((width + height) * 2 + 1) as f64) / params.rho).round() as usize).max(1);
        let trig = (0..num_angle)
            .map(|n| {
                let angle = n as f64 * params.theta;
                (angle.cos() * irho, angle.sin() * irho)
            })
            .collect();

        Self {
            trig,
            num_rho,
            offset: (num_rho as i32 - 1) / 2,
            votes: vec![0; num_angle * num_rho],
        }
    }

    fn cell(&self, n: usize, x: i32, y: i32) -> usize {
        let (c, s) = self.trig[n];
        let r = (x as f64 * c + y as f64 * s).round() as i32 + self.offset;
        n * self.num_rho + r.clamp(0, self.num_rho as i32 - 1) as usize
    }

    /// Vote for every angle; returns the strongest (votes, angle bin)
    fn vote(&mut self, x: i32, y: i32) -> (i32, usize) {
        let mut best = (i32::MIN, 0);
        for n in 0..self.trig.len() {
            let cell = self.cell(n, x, y);
            self.votes[cell] += 1;
            if self.votes[cell] > best.0 {
                best = (self.votes[cell], n);
            }
        }
        best
    }

    fn withdraw(&mut self, x: i32, y: i32) {
        for n in 0..self.trig.len() {
            let cell = self.cell(n, x, y);
            self.votes[cell] -= 1;
        }
    }
}

/// Fixed-point walker along the line with normal angle bin `n`
struct LineWalk {
    x0: i32,
    y0: i32,
    dx0: i32,
    dy0: i32,
    x_major: bool,
}

impl LineWalk {
    fn new(px: i32, py: i32, (cos, sin): (f64, f64)) -> Self {
        let a = -sin;
        let b = cos;
        if a.abs() > b.abs() {
            Self {
                x0: px,
                y0: (py << SHIFT) + (1 << (SHIFT - 1)),
                dx0: if a > 0.0 { 1 } else { -1 },
                dy0: (b * f64::from(1 << SHIFT) / a.abs()).round() as i32,
                x_major: true,
            }
        } else {
            Self {
                x0: (px << SHIFT) + (1 << (SHIFT - 1)),
                y0: py,
                dx0: (a * f64::from(1 << SHIFT) / b.abs()).round() as i32,
                dy0: if b > 0.0 { 1 } else { -1 },
                x_major: false,
            }
        }
    }

    fn step(&self, direction: usize) -> (i32, i32) {
        if direction == 0 {
            (self.dx0, self.dy0)
        } else {
            (-self.dx0, -self.dy0)
        }
    }

    fn pixel(&self, x: i32, y: i32) -> (i32, i32) {
        if self.x_major {
            (x, y >> SHIFT)
        } else {
            (x >> SHIFT, y)
        }
    }
}

/// Detect line segments in a binary edge map (non-zero pixels are edges)
pub fn detect_segments(edges: &GrayImage, params: &HoughParams) -> Vec<LineSegment> {
    let (width, height) = (edges.width() as i32, edges.height() as i32);
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let index = |x: i32, y: i32| (y * width + x) as usize;

    let mut mask = vec![false; (width * height) as usize];
    let mut points = Vec::new();
    for (x, y, pixel) in edges.enumerate_pixels() {
        if pixel[0] != 0 {
            mask[index(x as i32, y as i32)] = true;
            points.push((x as i32, y as i32));
        }
    }

    let mut accumulator = Accumulator::new(width, height, params);
    let mut rng = StdRng::seed_from_u64(params.seed);
    let threshold = params.threshold as i32;
    let line_gap = params.max_line_gap as i32;
    let line_length = params.min_line_length as i32;
    let mut lines = Vec::new();

    while !points.is_empty() {
        let (px, py) = points.swap_remove(rng.gen_range(0..points.len()));

        // Already consumed by an earlier segment
        if !mask[index(px, py)] {
            continue;
        }

        let (max_votes, max_n) = accumulator.vote(px, py);
        if max_votes < threshold {
            continue;
        }

        let walk = LineWalk::new(px, py, accumulator.trig[max_n]);
        let mut ends = [(px, py); 2];

        for (k, end) in ends.iter_mut().enumerate() {
            let (dx, dy) = walk.step(k);
            let (mut x, mut y) = (walk.x0, walk.y0);
            let mut gap = 0;
            loop {
                let (j, i) = walk.pixel(x, y);
                if j < 0 || j >= width || i < 0 || i >= height {
                    break;
                }
                if mask[index(j, i)] {
                    gap = 0;
                    *end = (j, i);
                } else {
                    gap += 1;
                    if gap > line_gap {
                        break;
                    }
                }
                x += dx;
                y += dy;
            }
        }

        let good_line = (ends[1].0 - ends[0].0).abs() >= line_length
            || (ends[1].1 - ends[0].1).abs() >= line_length;

        for (k, end) in ends.iter().enumerate() {
            let (dx, dy) = walk.step(k);
            let (mut x, mut y) = (walk.x0, walk.y0);
            loop {
                let (j, i) = walk.pixel(x, y);
                let cell = index(j, i);
                if mask[cell] {
                    if good_line {
                        accumulator.withdraw(j, i);
                    }
                    mask[cell] = false;
                }
                if (j, i) == *end {
                    break;
                }
                x += dx;
                y += dy;
            }
        }

        if good_line {
            lines.push(LineSegment::new(ends[0].0, ends[0].1, ends[1].0, ends[1].1));
            if lines.len() >= params.max_lines {
                break;
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn diagonal(size: u32, from: u32, to: u32) -> GrayImage {
        let mut img = GrayImage::new(size, size);
        for x in from..=to {
            img.put_pixel(x, size - x, Luma([255]));
        }
        img
    }

    #[test]
    fn test_empty_map_has_no_segments() {
        let img = GrayImage::new(50, 50);
        assert!(detect_segments(&img, &HoughParams::default()).is_empty());
    }

    #[test]
    fn test_finds_long_diagonal() {
        let img = diagonal(200, 20, 180);
        let lines = detect_segments(&img, &HoughParams::default());

        assert_eq!(lines.len(), 1);
        let line = lines[0];
        assert!((line.x2 - line.x1).abs() >= 150, "{:?}", line);
        assert_eq!(line.x1 + line.y1, 200);
        assert_eq!(line.x2 + line.y2, 200);
    }

    #[test]
    fn test_short_line_rejected() {
        let img = diagonal(200, 20, 70);
        let params = HoughParams {
            threshold: 20,
            ..Default::default()
        };
        assert!(detect_segments(&img, &params).is_empty());
    }

    #[test]
    fn test_gap_is_bridged() {
        let mut img = diagonal(200, 20, 180);
        for x in 90..110 {
            img.put_pixel(x, 200 - x, Luma([0]));
        }
        let lines = detect_segments(&img, &HoughParams::default());

        assert_eq!(lines.len(), 1);
        assert!((lines[0].x2 - lines[0].x1).abs() >= 150);
    }

    #[test]
    fn test_coarse_rho_does_not_overflow_accumulator() {
        let img = diagonal(200, 20, 180);
        let params = HoughParams {
            rho: 10_000.0,
            threshold: 1,
            ..Default::default()
        };
        // Everything lands in a single rho bin; the search must still finish
        let lines = detect_segments(&img, &params);
        assert!(lines.len() <= 160);
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let mut img = diagonal(200, 20, 180);
        for y in 30..170 {
            img.put_pixel(60, y, Luma([255]));
        }
        let params = HoughParams::default();
        assert_eq!(detect_segments(&img, &params), detect_segments(&img, &params));
    }
}
