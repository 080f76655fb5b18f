//! Application configuration
//!
//! Layers, lowest priority first: built-in defaults, an optional TOML file,
//! `MONITOR__SECTION__KEY` environment variables, then command-line flags.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use adas::LaneConfig;
use alerting::AlarmConfig;
use camera_capture::CameraConfig;
use clap::Parser;
use dms::DrowsinessConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ENV_PREFIX: &str = "MONITOR";
const ENV_SEPARATOR: &str = "__";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Driver-facing source: the webcam unless a recording is given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimarySourceConfig {
    pub camera: CameraConfig,
    /// Video file or frame directory played instead of the webcam
    pub recording: Option<PathBuf>,
    pub fps: u32,
}

impl Default for PrimarySourceConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            recording: None,
            fps: 30,
        }
    }
}

/// Road-facing source: the pre-recorded clip, a video file or a frame directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneSourceConfig {
    pub path: PathBuf,
    pub fps: u32,
}

impl Default for LaneSourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("spv.mp4"),
            fps: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarksConfig {
    /// JSON-lines file of per-frame face landmarks
    pub replay: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Headless,
    Window,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    pub title: String,
    /// Initial window size; frames are scaled to fit
    pub window_width: usize,
    pub window_height: usize,
    /// Headless mode: write every Nth composited frame here as PNG
    pub snapshot_dir: Option<PathBuf>,
    pub snapshot_every: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Headless,
            title: "Drowsiness Detection and Lane Overlay".to_string(),
            window_width: 640,
            window_height: 240,
            snapshot_dir: None,
            snapshot_every: 30,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub primary: PrimarySourceConfig,
    pub lane: LaneSourceConfig,
    pub landmarks: LandmarksConfig,
    pub drowsiness: DrowsinessConfig,
    pub lanes: LaneConfig,
    pub alarm: AlarmConfig,
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Load defaults, then `path` if it exists, then the environment
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        tracing::Level::from_str(&self.logging.level)
            .map_err(|_| ConfigError::Invalid(format!("unknown log level '{}'", self.logging.level)))?;

        self.drowsiness
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.lanes
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.primary.fps == 0 || self.lane.fps == 0 {
            return Err(ConfigError::Invalid("source fps must be positive".into()));
        }
        if self.display.snapshot_every == 0 {
            return Err(ConfigError::Invalid("display.snapshot_every must be positive".into()));
        }
        if self.alarm.player.trim().is_empty() {
            return Err(ConfigError::Invalid("alarm.player must not be empty".into()));
        }
        Ok(())
    }
}

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "drowsy-lane-monitor", version, about = "Driver drowsiness detection with lane overlay")]
pub struct Args {
    /// Configuration file (TOML); missing file means defaults
    #[arg(short, long, default_value = "monitor.toml")]
    pub config: PathBuf,

    /// Read the driver view from a video file or frame directory instead of the webcam
    #[arg(long)]
    pub primary: Option<PathBuf>,

    /// Webcam index
    #[arg(long)]
    pub camera_index: Option<u32>,

    /// Road clip: video file or directory of frames
    #[arg(long)]
    pub lane: Option<PathBuf>,

    /// Landmark replay file (JSON lines)
    #[arg(long)]
    pub landmarks: Option<PathBuf>,

    /// Alarm sound file
    #[arg(long)]
    pub alarm_sound: Option<PathBuf>,

    /// Show a preview window
    #[arg(long, conflicts_with = "headless")]
    pub window: bool,

    /// Run without a window
    #[arg(long)]
    pub headless: bool,

    /// Write periodic PNG snapshots of the composited view
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,

    /// Log level override
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.primary {
            config.primary.recording = Some(path.clone());
        }
        if let Some(index) = self.camera_index {
            config.primary.camera.index = index;
        }
        if let Some(path) = &self.lane {
            config.lane.path = path.clone();
        }
        if let Some(path) = &self.landmarks {
            config.landmarks.replay = Some(path.clone());
        }
        if let Some(path) = &self.alarm_sound {
            config.alarm.sound_path = path.clone();
        }
        if self.window {
            config.display.mode = DisplayMode::Window;
        }
        if self.headless {
            config.display.mode = DisplayMode::Headless;
        }
        if let Some(dir) = &self.snapshot_dir {
            config.display.snapshot_dir = Some(dir.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.drowsiness.ear_threshold, 0.30);
        assert_eq!(config.drowsiness.consecutive_frames, 10);
        assert_eq!(config.alarm.sound_path, PathBuf::from("alarm.wav"));
        assert_eq!(config.primary.camera.width, 320);
        assert_eq!(config.primary.camera.height, 240);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[drowsiness]
ear_threshold = 0.25
missing_face_policy = "reset"

[lanes]
hough_vote_threshold = 80

[lane]
path = "clips/highway.mp4"

[display]
mode = "window"
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.drowsiness.ear_threshold, 0.25);
        assert_eq!(config.drowsiness.missing_face_policy, dms::MissingFacePolicy::Reset);
        assert_eq!(config.drowsiness.consecutive_frames, 10);
        assert_eq!(config.lanes.hough_vote_threshold, 80);
        assert_eq!(config.lanes.min_segment_length, 80);
        assert_eq!(config.lane.path, PathBuf::from("clips/highway.mp4"));
        assert_eq!(config.display.mode, DisplayMode::Window);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.drowsiness.ear_threshold = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.lanes.roi_top_height_fraction = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.level = "loud".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let args = Args::parse_from([
            "drowsy-lane-monitor",
            "--lane",
            "road",
            "--landmarks",
            "faces.jsonl",
            "--window",
            "--log-level",
            "debug",
        ]);
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(args.config, PathBuf::from("monitor.toml"));
        assert_eq!(config.lane.path, PathBuf::from("road"));
        assert_eq!(config.landmarks.replay, Some(PathBuf::from("faces.jsonl")));
        assert_eq!(config.display.mode, DisplayMode::Window);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.primary.recording, None);
    }
}
