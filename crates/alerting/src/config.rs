//! Alarm configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Alarm configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Sound asset played when the alarm is raised
    pub sound_path: PathBuf,
    /// External player program
    pub player: String,
    /// Arguments passed before the asset path
    pub player_args: Vec<String>,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            sound_path: PathBuf::from("alarm.wav"),
            player: "aplay".to_string(),
            player_args: vec!["-q".to_string()],
        }
    }
}
