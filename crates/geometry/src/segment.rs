//! Line segments and slopes

use serde::{Deserialize, Serialize};

/// Slope of a line segment
///
/// Vertical segments have no finite slope; callers match on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Slope {
    Finite(f64),
    Vertical,
}

impl Slope {
    /// True when `lo < |slope| < hi`. A vertical slope never qualifies.
    pub fn strictly_between(&self, lo: f64, hi: f64) -> bool {
        match self {
            Slope::Finite(m) => {
                let m = m.abs();
                lo < m && m < hi
            }
            Slope::Vertical => false,
        }
    }
}

/// Line segment with integer pixel endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn slope(&self) -> Slope {
        let dx = self.x2 - self.x1;
        if dx == 0 {
            return Slope::Vertical;
        }
        Slope::Finite((self.y2 - self.y1) as f64 / dx as f64)
    }

    /// Segment length in pixels
    pub fn length(&self) -> f64 {
        ((self.x2 - self.x1) as f64).hypot((self.y2 - self.y1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slope_values() {
        assert_eq!(LineSegment::new(0, 0, 10, 5).slope(), Slope::Finite(0.5));
        assert_eq!(LineSegment::new(0, 0, 10, -20).slope(), Slope::Finite(-2.0));
        assert_eq!(LineSegment::new(3, 0, 3, 9).slope(), Slope::Vertical);
    }

    #[test]
    fn test_lane_band_is_strict() {
        let band = |s: LineSegment| s.slope().strictly_between(0.5, 2.0);

        assert!(!band(LineSegment::new(0, 0, 10, 5)));
        assert!(!band(LineSegment::new(0, 0, 10, 20)));
        assert!(!band(LineSegment::new(0, 0, 0, 20)));
        assert!(band(LineSegment::new(0, 0, 10, 10)));
        assert!(band(LineSegment::new(0, 10, 10, 0)));
    }

    #[test]
    fn test_length() {
        assert_eq!(LineSegment::new(0, 0, 3, 4).length(), 5.0);
    }
}
