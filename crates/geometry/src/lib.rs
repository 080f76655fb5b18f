//! Geometry Utilities
//!
//! Pure functions shared by the driver monitoring and lane pipelines:
//! - Point-to-point distance
//! - Eye Aspect Ratio (EAR) over a 6-point eye contour
//! - Line segment slopes with an explicit vertical case
//! - Polygonal regions of interest

pub mod point;
pub mod polygon;
pub mod segment;

pub use point::{distance, eye_aspect_ratio, Point};
pub use polygon::RegionOfInterest;
pub use segment::{LineSegment, Slope};

use thiserror::Error;

/// Geometry error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Degenerate eye contour: corner distance is zero")]
    DegenerateEye,

    #[error("Polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
}
