//! ADAS configuration

use serde::{Deserialize, Serialize};
use crate::AdasError;

/// Lane pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Gaussian smoothing kernel size (odd)
    pub blur_kernel_size: u32,

    /// Canny hysteresis thresholds
    pub low_edge_threshold: f32,
    pub high_edge_threshold: f32,

    /// Apply the 3x3 sharpening kernel to the edge map
    pub sharpen: bool,

    /// Hough distance resolution (pixels)
    pub hough_rho: f64,

    /// Hough angle resolution (degrees)
    pub hough_theta_degrees: f64,

    /// Minimum accumulator votes for a line
    pub hough_vote_threshold: u32,

    /// Minimum segment extent along x or y (pixels)
    pub min_segment_length: u32,

    /// Maximum gap bridged while walking a segment (pixels)
    pub max_segment_gap: u32,

    /// Seed for the Hough point visiting order
    pub hough_seed: u64,

    /// Exclusive slope band kept as lane candidates
    pub min_abs_slope: f64,
    pub max_abs_slope: f64,

    /// Region of interest: width of the top edge as a fraction of frame width
    pub roi_top_width_fraction: f64,

    /// Region of interest: y of the top edge as a fraction of frame height
    pub roi_top_height_fraction: f64,

    /// Overlay stroke
    pub line_color: [u8; 3],
    pub line_thickness: u32,

    /// Blend weights: out = base * base_weight + overlay * overlay_weight
    pub base_weight: f32,
    pub overlay_weight: f32,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            low_edge_threshold: 50.0,
            high_edge_threshold: 150.0,
            sharpen: true,
            hough_rho: 2.0,
            hough_theta_degrees: 1.0,
            hough_vote_threshold: 100,
            min_segment_length: 80,
            max_segment_gap: 50,
            hough_seed: 0xFFFF_FFFF,
            min_abs_slope: 0.5,
            max_abs_slope: 2.0,
            roi_top_width_fraction: 0.2,
            roi_top_height_fraction: 0.6,
            line_color: [0, 255, 0],
            line_thickness: 5,
            base_weight: 0.8,
            overlay_weight: 1.0,
        }
    }
}

impl LaneConfig {
    pub fn validate(&self) -> Result<(), AdasError> {
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(AdasError::Config(format!(
                "blur_kernel_size must be odd, got {}",
                self.blur_kernel_size
            )));
        }
        if !(self.low_edge_threshold >= 0.0 && self.low_edge_threshold <= self.high_edge_threshold) {
            return Err(AdasError::Config(format!(
                "edge thresholds out of order: low {} high {}",
                self.low_edge_threshold, self.high_edge_threshold
            )));
        }
        if !(self.hough_rho > 0.0 && self.hough_theta_degrees > 0.0 && self.hough_theta_degrees <= 180.0) {
            return Err(AdasError::Config("Hough resolutions must be positive".into()));
        }
        if self.hough_vote_threshold == 0 {
            return Err(AdasError::Config("hough_vote_threshold must be at least 1".into()));
        }
        if !(self.min_abs_slope >= 0.0 && self.min_abs_slope < self.max_abs_slope) {
            return Err(AdasError::Config(format!(
                "slope band out of order: {} .. {}",
                self.min_abs_slope, self.max_abs_slope
            )));
        }
        for (name, value) in [
            ("roi_top_width_fraction", self.roi_top_width_fraction),
            ("roi_top_height_fraction", self.roi_top_height_fraction),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(AdasError::Config(format!("{} must be in (0, 1], got {}", name, value)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = LaneConfig::default();
        assert_eq!(config.low_edge_threshold, 50.0);
        assert_eq!(config.high_edge_threshold, 150.0);
        assert_eq!(config.hough_vote_threshold, 100);
        assert_eq!(config.min_segment_length, 80);
        assert_eq!(config.max_segment_gap, 50);
        assert_eq!(config.roi_top_width_fraction, 0.2);
        assert_eq!(config.roi_top_height_fraction, 0.6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_even_kernel() {
        let config = LaneConfig {
            blur_kernel_size: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_band() {
        let config = LaneConfig {
            min_abs_slope: 2.0,
            max_abs_slope: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
