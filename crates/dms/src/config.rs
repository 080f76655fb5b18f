//! DMS configuration

use serde::{Deserialize, Serialize};
use crate::DmsError;

/// What a frame without a usable face does to the drowsiness state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFacePolicy {
    /// Leave counter and alarm untouched; short tracking gaps keep progress
    #[default]
    Preserve,
    /// Reset the counter and clear an active alarm
    Reset,
}

/// Which face drives the shared state when several are visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiFacePolicy {
    /// Lowest EAR among the faces
    #[default]
    MostDrowsy,
    /// Last face in detection order
    LastFace,
}

/// DMS configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrowsinessConfig {
    /// EAR below this counts as a closed-eye frame
    pub ear_threshold: f64,

    /// Consecutive closed-eye frames before the alarm fires
    pub consecutive_frames: u32,

    pub missing_face_policy: MissingFacePolicy,

    pub multi_face_policy: MultiFacePolicy,
}

impl Default for DrowsinessConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.30,
            consecutive_frames: 10,
            missing_face_policy: MissingFacePolicy::Preserve,
            multi_face_policy: MultiFacePolicy::MostDrowsy,
        }
    }
}

impl DrowsinessConfig {
    /// Reject thresholds that would make the detector meaningless
    pub fn validate(&self) -> Result<(), DmsError> {
        if !(self.ear_threshold.is_finite() && self.ear_threshold > 0.0) {
            return Err(DmsError::Config(format!(
                "ear_threshold must be positive, got {}",
                self.ear_threshold
            )));
        }
        if self.consecutive_frames == 0 {
            return Err(DmsError::Config("consecutive_frames must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DrowsinessConfig::default();
        assert_eq!(config.ear_threshold, 0.30);
        assert_eq!(config.consecutive_frames, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_frames = DrowsinessConfig {
            consecutive_frames: 0,
            ..Default::default()
        };
        assert!(zero_frames.validate().is_err());

        let negative = DrowsinessConfig {
            ear_threshold: -0.1,
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }
}
