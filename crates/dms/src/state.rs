//! Driver drowsiness state tracking

use serde::{Deserialize, Serialize};
use crate::config::{DrowsinessConfig, MissingFacePolicy};

/// Alarm edge produced by a state update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmTransition {
    Activate,
    Deactivate,
}

/// Coarse phase of the drowsiness state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrowsinessPhase {
    #[default]
    Calm,
    Accumulating,
    Alarmed,
}

/// Driver state (tracked over time)
///
/// Owned by the frame loop and updated once per processed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrowsinessState {
    /// Consecutive frames with EAR below threshold
    pub consecutive_low_ear_frames: u32,

    /// Whether the alarm is currently raised
    pub alarm_active: bool,
}

impl DrowsinessState {
    pub fn phase(&self) -> DrowsinessPhase {
        if self.alarm_active {
            DrowsinessPhase::Alarmed
        } else if self.consecutive_low_ear_frames > 0 {
            DrowsinessPhase::Accumulating
        } else {
            DrowsinessPhase::Calm
        }
    }

    /// Apply one frame's EAR
    ///
    /// Activation is edge-triggered: it is returned once when the counter
    /// reaches the threshold, not on every sustained low frame.
    pub fn step(&mut self, ear: f64, config: &DrowsinessConfig) -> Option<AlarmTransition> {
        if ear < config.ear_threshold {
            self.consecutive_low_ear_frames = self.consecutive_low_ear_frames.saturating_add(1);
            if self.consecutive_low_ear_frames >= config.consecutive_frames && !self.alarm_active {
                self.alarm_active = true;
                return Some(AlarmTransition::Activate);
            }
            None
        } else {
            self.clear()
        }
    }

    /// Apply a frame without a usable face
    pub fn miss(&mut self, policy: MissingFacePolicy) -> Option<AlarmTransition> {
        match policy {
            MissingFacePolicy::Preserve => None,
            MissingFacePolicy::Reset => self.clear(),
        }
    }

    fn clear(&mut self) -> Option<AlarmTransition> {
        self.consecutive_low_ear_frames = 0;
        if self.alarm_active {
            self.alarm_active = false;
            Some(AlarmTransition::Deactivate)
        } else {
            None
        }
    }
}
