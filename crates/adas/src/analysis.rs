//! Lane pipeline results

use camera_capture::VideoFrame;
use geometry::LineSegment;

/// Output of one lane pipeline pass
#[derive(Debug, Clone)]
pub struct LaneAnalysis {
    /// Annotated frame (input unchanged when no segment survived)
    pub frame: VideoFrame,

    /// Segments kept by the slope filter and drawn
    pub segments: Vec<LineSegment>,

    /// Raw Hough candidates before filtering
    pub candidates: usize,
}

impl LaneAnalysis {
    /// Whether any lane line was drawn
    pub fn has_lanes(&self) -> bool {
        !self.segments.is_empty()
    }
}
