//! Audio playback backends

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::{AlarmConfig, AlarmError};

/// One playback of an asset; dropping it stops the sound
pub type PlaybackFuture = Pin<Box<dyn Future<Output = Result<(), AlarmError>> + Send>>;

/// Something that can play a sound file
pub trait AudioBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Start playing `asset`. The returned future completes when playback ends.
    fn play(&self, asset: &Path) -> PlaybackFuture;
}

/// Plays sounds through an external player process (`aplay -q <asset>` by default)
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &AlarmConfig) -> Self {
        Self::new(config.player.clone(), config.player_args.clone())
    }
}

impl AudioBackend for CommandPlayer {
    fn name(&self) -> &str {
        &self.program
    }

    fn play(&self, asset: &Path) -> PlaybackFuture {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(asset)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        Box::pin(run_player(command, self.program.clone(), asset.to_path_buf()))
    }
}

async fn run_player(mut command: Command, program: String, asset: PathBuf) -> Result<(), AlarmError> {
    let mut child = command
        .spawn()
        .map_err(|e| AlarmError::Backend(format!("failed to start {}: {}", program, e)))?;
    debug!("Started {} for {}", program, asset.display());

    let status = child
        .wait()
        .await
        .map_err(|e| AlarmError::Backend(format!("{}: {}", program, e)))?;
    if status.success() {
        Ok(())
    } else {
        Err(AlarmError::PlaybackFailed(format!("{} exited with {}", program, status)))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_player() {
        let player = CommandPlayer::new("true", vec![]);
        assert!(player.play(Path::new("alarm.wav")).await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_player() {
        let player = CommandPlayer::new("false", vec![]);
        assert!(matches!(
            player.play(Path::new("alarm.wav")).await,
            Err(AlarmError::PlaybackFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_player_program() {
        let player = CommandPlayer::new("definitely-not-an-audio-player", vec![]);
        assert!(matches!(
            player.play(Path::new("alarm.wav")).await,
            Err(AlarmError::Backend(_))
        ));
    }
}
