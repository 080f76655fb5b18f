//! DMS analysis results

use serde::{Deserialize, Serialize};
use crate::landmarks::FaceLandmarks;
use crate::state::{AlarmTransition, DrowsinessState};

/// Evaluation of a single face in a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceAssessment {
    pub landmarks: FaceLandmarks,

    /// Mean EAR of both eyes, absent when an eye contour is degenerate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ear: Option<f64>,

    /// EAR below threshold this frame
    pub low_ear: bool,
}

/// Complete DMS result for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameAssessment {
    /// Every detected face, in detection order
    pub faces: Vec<FaceAssessment>,

    /// Index of the face that drove the state update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driving_face: Option<usize>,

    /// Alarm edge produced this frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<AlarmTransition>,

    /// State after the update
    pub state: DrowsinessState,
}

impl FrameAssessment {
    pub fn face_detected(&self) -> bool {
        !self.faces.is_empty()
    }

    /// EAR of the face that drove the update
    pub fn driving_ear(&self) -> Option<f64> {
        self.driving_face
            .and_then(|i| self.faces.get(i))
            .and_then(|face| face.ear)
    }
}
