//! Eye landmarks and landmark providers

use std::collections::VecDeque;
use std::io::BufRead;
use std::path::Path;

use camera_capture::VideoFrame;
use geometry::{eye_aspect_ratio, GeometryError, Point};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::DmsError;

/// Six-point eye contour: corner, two upper lid points, corner, two lower lid points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EyeLandmarks(pub [Point; 6]);

impl EyeLandmarks {
    pub fn points(&self) -> &[Point; 6] {
        &self.0
    }

    pub fn aspect_ratio(&self) -> Result<f64, GeometryError> {
        eye_aspect_ratio(&self.0)
    }
}

impl TryFrom<Vec<Point>> for EyeLandmarks {
    type Error = DmsError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        let len = points.len();
        let points: [Point; 6] = points
            .try_into()
            .map_err(|_| DmsError::Landmarks(format!("eye contour needs 6 points, got {}", len)))?;
        Ok(Self(points))
    }
}

/// Landmarks of one detected face. Other landmark groups are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    pub left_eye: EyeLandmarks,
    pub right_eye: EyeLandmarks,
}

impl FaceLandmarks {
    /// Mean EAR of both eyes
    pub fn aspect_ratio(&self) -> Result<f64, GeometryError> {
        let left = self.left_eye.aspect_ratio()?;
        let right = self.right_eye.aspect_ratio()?;
        Ok((left + right) / 2.0)
    }
}

/// Facial landmark extraction
pub trait LandmarkProvider {
    /// Detect zero or more faces in the frame
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<FaceLandmarks>, DmsError>;
}

/// Replays landmarks recorded by an external landmark tool
///
/// The file holds one JSON array of faces per frame, one frame per line.
/// Blank lines are frames without faces. Once the recording is exhausted every
/// frame reports no faces.
#[derive(Debug, Default)]
pub struct LandmarkReplay {
    frames: VecDeque<Vec<FaceLandmarks>>,
}

impl LandmarkReplay {
    /// Replay that never reports a face
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_frames(frames: Vec<Vec<FaceLandmarks>>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    /// Parse a JSON-lines recording
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DmsError> {
        let mut frames = VecDeque::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                frames.push_back(Vec::new());
                continue;
            }
            let faces: Vec<FaceLandmarks> = serde_json::from_str(line)
                .map_err(|e| DmsError::Landmarks(format!("line {}: {}", index + 1, e)))?;
            frames.push_back(faces);
        }
        Ok(Self { frames })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, DmsError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let replay = Self::from_reader(std::io::BufReader::new(file))?;
        info!("Loaded {} landmark frames from {}", replay.remaining(), path.display());
        Ok(replay)
    }

    /// Frames left in the recording
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkProvider for LandmarkReplay {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<FaceLandmarks>, DmsError> {
        let faces = self.frames.pop_front().unwrap_or_default();
        debug!("Frame {}: {} face(s) replayed", frame.sequence, faces.len());
        Ok(faces)
    }
}
