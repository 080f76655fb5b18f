//! Drowsiness detection over per-frame face landmarks

use camera_capture::VideoFrame;
use image::Rgb;
use tracing::{debug, info, warn};

use crate::analysis::{FaceAssessment, FrameAssessment};
use crate::config::{DrowsinessConfig, MultiFacePolicy};
use crate::landmarks::FaceLandmarks;
use crate::overlay::{draw_eye_contour, draw_text};
use crate::state::{AlarmTransition, DrowsinessState};
use crate::DmsError;

const CONTOUR_COLOR: Rgb<u8> = Rgb([0, 255, 255]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const TEXT_SCALE: u32 = 2;
const EAR_ORIGIN: (i32, i32) = (10, 30);
const ALERT_ORIGIN: (i32, i32) = (5, 30);

/// Eye-closure drowsiness detector
///
/// Stateless itself: the caller owns the `DrowsinessState` and passes it in
/// every frame.
pub struct DrowsinessDetector {
    config: DrowsinessConfig,
}

impl DrowsinessDetector {
    pub fn new(config: DrowsinessConfig) -> Result<Self, DmsError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DrowsinessConfig {
        &self.config
    }

    /// Evaluate all faces of one frame and update the shared state once
    pub fn evaluate(&self, state: &mut DrowsinessState, faces: &[FaceLandmarks]) -> FrameAssessment {
        let assessed: Vec<FaceAssessment> = faces
            .iter()
            .enumerate()
            .map(|(i, face)| {
                let ear = match face.aspect_ratio() {
                    Ok(ear) => Some(ear),
                    Err(e) => {
                        debug!("Face {}: {}", i, e);
                        None
                    }
                };
                FaceAssessment {
                    landmarks: *face,
                    ear,
                    low_ear: ear.map_or(false, |ear| ear < self.config.ear_threshold),
                }
            })
            .collect();

        let driving_face = self.select_driving_face(&assessed);

        let transition = match driving_face.and_then(|i| assessed[i].ear) {
            Some(ear) => state.step(ear, &self.config),
            None => state.miss(self.config.missing_face_policy),
        };

        match transition {
            Some(AlarmTransition::Activate) => warn!(
                "Drowsiness alarm raised after {} low-EAR frames",
                state.consecutive_low_ear_frames
            ),
            Some(AlarmTransition::Deactivate) => info!("Drowsiness alarm cleared"),
            None => {}
        }

        FrameAssessment {
            faces: assessed,
            driving_face,
            transition,
            state: *state,
        }
    }

    fn select_driving_face(&self, faces: &[FaceAssessment]) -> Option<usize> {
        let with_ear = faces
            .iter()
            .enumerate()
            .filter_map(|(i, face)| face.ear.map(|ear| (i, ear)));

        match self.config.multi_face_policy {
            MultiFacePolicy::MostDrowsy => with_ear
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| i),
            MultiFacePolicy::LastFace => with_ear.last().map(|(i, _)| i),
        }
    }

    /// Draw eye contours, the EAR readout and the alert label onto the frame
    pub fn annotate(&self, frame: &mut VideoFrame, assessment: &FrameAssessment) -> Result<(), DmsError> {
        if assessment.faces.is_empty() {
            return Ok(());
        }

        frame
            .with_image_mut(|img| {
                for face in &assessment.faces {
                    draw_eye_contour(img, &face.landmarks.left_eye, CONTOUR_COLOR);
                    draw_eye_contour(img, &face.landmarks.right_eye, CONTOUR_COLOR);

                    if face.low_ear {
                        draw_text(img, "Alert!", ALERT_ORIGIN, TEXT_SCALE, TEXT_COLOR);
                    }
                    if let Some(ear) = face.ear {
                        draw_text(img, &format!("EAR: {:.2}", ear), EAR_ORIGIN, TEXT_SCALE, TEXT_COLOR);
                    }
                }
            })
            .map_err(|e| DmsError::ImageProcessing(e.to_string()))
    }
}
