//! Lane detection pipeline

use camera_capture::{CaptureError, VideoFrame};
use geometry::{LineSegment, RegionOfInterest};
use image::{Rgb, RgbImage};
use tracing::trace;

use crate::analysis::LaneAnalysis;
use crate::hough::{detect_segments, HoughParams};
use crate::overlay::{blend, draw_thick_segment};
use crate::preprocess::{edge_map, mask_region, sharpen};
use crate::{AdasError, LaneConfig};

/// Keep segments whose absolute slope lies strictly inside `(lo, hi)`
pub fn filter_segments(segments: &[LineSegment], lo: f64, hi: f64) -> Vec<LineSegment> {
    segments
        .iter()
        .copied()
        .filter(|s| s.slope().strictly_between(lo, hi))
        .collect()
}

/// Stateless lane line extractor
pub struct LanePipeline {
    config: LaneConfig,
    hough: HoughParams,
}

impl LanePipeline {
    pub fn new(config: LaneConfig) -> Result<Self, AdasError> {
        config.validate()?;
        let hough = HoughParams {
            rho: config.hough_rho,
            theta: config.hough_theta_degrees.to_radians(),
            threshold: config.hough_vote_threshold,
            min_line_length: config.min_segment_length,
            max_line_gap: config.max_segment_gap,
            max_lines: usize::MAX,
            seed: config.hough_seed,
        };
        Ok(Self { config, hough })
    }

    pub fn config(&self) -> &LaneConfig {
        &self.config
    }

    /// Region searched for lane lines in a frame of the given size
    pub fn region_of_interest(&self, width: u32, height: u32) -> RegionOfInterest {
        RegionOfInterest::lane_trapezoid(
            width,
            height,
            self.config.roi_top_width_fraction,
            self.config.roi_top_height_fraction,
        )
    }

    /// Candidate segments for a frame, before slope filtering
    pub fn candidates(&self, frame: &VideoFrame) -> Result<Vec<LineSegment>, AdasError> {
        check_frame(frame)?;

        let gray = frame.to_grayscale();
        let mut edges = edge_map(
            &gray,
            self.config.blur_kernel_size,
            self.config.low_edge_threshold,
            self.config.high_edge_threshold,
        );
        if self.config.sharpen {
            edges = sharpen(&edges);
        }
        mask_region(&mut edges, &self.region_of_interest(frame.width, frame.height));

        Ok(detect_segments(&edges, &self.hough))
    }

    /// Detect lane lines and draw them onto a copy of the frame
    pub fn process(&self, frame: &VideoFrame) -> Result<LaneAnalysis, AdasError> {
        let candidates = self.candidates(frame)?;
        let segments = filter_segments(
            &candidates,
            self.config.min_abs_slope,
            self.config.max_abs_slope,
        );
        trace!(
            "Frame {}: {} Hough candidates, {} lane segments",
            frame.sequence,
            candidates.len(),
            segments.len()
        );

        if segments.is_empty() {
            return Ok(LaneAnalysis {
                frame: frame.clone(),
                segments,
                candidates: candidates.len(),
            });
        }

        let base = frame.to_rgb_image().map_err(invalid_frame)?;
        let mut overlay = RgbImage::new(frame.width, frame.height);
        let color = Rgb(self.config.line_color);
        for segment in &segments {
            draw_thick_segment(&mut overlay, segment, self.config.line_thickness, color);
        }
        let blended = blend(
            &base,
            &overlay,
            self.config.base_weight,
            self.config.overlay_weight,
        );

        Ok(LaneAnalysis {
            frame: VideoFrame::from_rgb_image(blended, frame.timestamp_ns, frame.sequence),
            segments,
            candidates: candidates.len(),
        })
    }
}

fn check_frame(frame: &VideoFrame) -> Result<(), AdasError> {
    let expected = (frame.width as usize) * (frame.height as usize) * 3;
    if frame.data.len() != expected {
        return Err(AdasError::InvalidFrame {
            expected,
            actual: frame.data.len(),
        });
    }
    Ok(())
}

fn invalid_frame(err: CaptureError) -> AdasError {
    match err {
        CaptureError::InvalidFrame { expected, actual } => AdasError::InvalidFrame { expected, actual },
        other => AdasError::ImageProcessing(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Dark road frame with a bright painted stripe
    fn road_with_stripe(width: u32, height: u32, stripe: LineSegment) -> VideoFrame {
        let mut img = RgbImage::from_pixel(width, height, Rgb([40, 40, 40]));
        draw_thick_segment(&mut img, &stripe, 9, Rgb([255, 255, 255]));
        VideoFrame::from_rgb_image(img, 0, 7)
    }

    #[test]
    fn test_slope_filter_is_strict() {
        let segments = [
            LineSegment::new(0, 0, 10, 5),  // 0.5
            LineSegment::new(0, 0, 10, 20), // 2.0
            LineSegment::new(4, 0, 4, 50),  // vertical
            LineSegment::new(0, 10, 10, 0), // -1.0
        ];
        let kept = filter_segments(&segments, 0.5, 2.0);
        assert_eq!(kept, vec![LineSegment::new(0, 10, 10, 0)]);
    }

    #[test]
    fn test_flat_frame_is_returned_unchanged() {
        let pipeline = LanePipeline::new(LaneConfig::default()).unwrap();
        let frame = VideoFrame::new(vec![90; 160 * 120 * 3], 160, 120, 5, 3).unwrap();

        let analysis = pipeline.process(&frame).unwrap();
        assert_eq!(analysis.frame, frame);
        assert!(!analysis.has_lanes());
        assert_eq!(analysis.candidates, 0);
    }

    #[test]
    fn test_rejects_short_buffer() {
        let pipeline = LanePipeline::new(LaneConfig::default()).unwrap();
        let frame = VideoFrame {
            data: vec![0; 10],
            width: 8,
            height: 8,
            timestamp_ns: 0,
            sequence: 0,
        };
        assert!(matches!(
            pipeline.process(&frame),
            Err(AdasError::InvalidFrame { expected: 192, actual: 10 })
        ));
    }

    #[test]
    fn test_painted_stripe_is_detected_and_drawn() {
        let pipeline = LanePipeline::new(LaneConfig {
            hough_vote_threshold: 60,
            ..Default::default()
        })
        .unwrap();
        let frame = road_with_stripe(640, 480, LineSegment::new(60, 470, 300, 295));

        let analysis = pipeline.process(&frame).unwrap();
        assert!(analysis.has_lanes(), "{} candidates", analysis.candidates);
        assert!(analysis
            .segments
            .iter()
            .all(|s| s.slope().strictly_between(0.5, 2.0)));
        assert_eq!(analysis.frame.sequence, 7);
        assert_ne!(analysis.frame, frame);

        // Far from the stripe only the base weight applies: round(40 * 0.8)
        assert_eq!(analysis.frame.get_pixel(600, 20), Some([32, 32, 32]));
    }

    #[test]
    fn test_coarse_rho_processes_without_error() {
        let config = LaneConfig {
            hough_rho: 10_000.0,
            hough_vote_threshold: 1,
            ..Default::default()
        };
        config.validate().unwrap();
        let pipeline = LanePipeline::new(config).unwrap();
        let frame = road_with_stripe(320, 240, LineSegment::new(30, 235, 150, 150));

        let analysis = pipeline.process(&frame).unwrap();
        assert_eq!(analysis.frame.sequence, frame.sequence);
    }

    #[test]
    fn test_stripe_outside_region_is_ignored() {
        let pipeline = LanePipeline::new(LaneConfig {
            hough_vote_threshold: 60,
            ..Default::default()
        })
        .unwrap();
        // Entirely above the trapezoid top edge
        let frame = road_with_stripe(640, 480, LineSegment::new(100, 200, 300, 40));

        let analysis = pipeline.process(&frame).unwrap();
        assert!(!analysis.has_lanes());
        assert_eq!(analysis.frame, frame);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_filtered_segments_are_in_band(
            coords in prop::collection::vec((-500i32..500, -500i32..500, -500i32..500, -500i32..500), 0..40)
        ) {
            let segments: Vec<_> = coords
                .into_iter()
                .map(|(x1, y1, x2, y2)| LineSegment::new(x1, y1, x2, y2))
                .collect();
            let kept = filter_segments(&segments, 0.5, 2.0);

            prop_assert!(kept.len() <= segments.len());
            for s in kept {
                match s.slope() {
                    geometry::Slope::Finite(m) => prop_assert!(m.abs() > 0.5 && m.abs() < 2.0),
                    geometry::Slope::Vertical => prop_assert!(false, "vertical kept"),
                }
            }
        }
    }
}
