//! Alarm controller

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::{AlarmConfig, AlarmError, AudioBackend};

/// Starts and stops the alarm sound
///
/// `activate` returns as soon as playback is scheduled; the sound plays on a
/// task spawned onto `runtime`. `deactivate` aborts that task, which drops
/// the playback future and with it any player process.
pub struct AlarmController {
    config: AlarmConfig,
    backend: Arc<dyn AudioBackend>,
    runtime: Handle,
    playback: Option<JoinHandle<()>>,
    active: bool,
}

impl AlarmController {
    pub fn new(config: AlarmConfig, backend: Arc<dyn AudioBackend>, runtime: Handle) -> Self {
        info!(
            "Alarm controller using {} with {}",
            backend.name(),
            config.sound_path.display()
        );
        Self {
            config,
            backend,
            runtime,
            playback: None,
            active: false,
        }
    }

    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Raise the alarm. `Ok(false)` when it is already active.
    pub fn activate(&mut self) -> Result<bool, AlarmError> {
        if self.active {
            return Ok(false);
        }

        let asset = &self.config.sound_path;
        if !asset.is_file() {
            return Err(AlarmError::AssetMissing(asset.clone()));
        }

        let playback = self.backend.play(asset);
        let backend = self.backend.name().to_string();
        self.playback = Some(self.runtime.spawn(async move {
            match playback.await {
                Ok(()) => debug!("Alarm playback via {} finished", backend),
                Err(e) => error!("Alarm playback via {} failed: {}", backend, e),
            }
        }));
        self.active = true;
        Ok(true)
    }

    /// Silence the alarm. Returns false when it was not active.
    pub fn deactivate(&mut self) -> bool {
        if !self.active {
            return false;
        }
        if let Some(playback) = self.playback.take() {
            playback.abort();
        }
        self.active = false;
        true
    }

    pub fn shutdown(&mut self) {
        if self.deactivate() {
            debug!("Alarm stopped on shutdown");
        }
    }
}

impl Drop for AlarmController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
