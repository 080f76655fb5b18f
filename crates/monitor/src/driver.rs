//! Frame loop: capture, analyze, compose and display one tick at a time

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use adas::LanePipeline;
use alerting::{AlarmController, CommandPlayer};
use camera_capture::{open_recording, FrameSource, VideoFrame};
use dms::{AlarmTransition, DrowsinessDetector, DrowsinessState, LandmarkProvider, LandmarkReplay};
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use crate::compositor::{blank_like, compose};
use crate::config::{AppConfig, DisplayMode};
use crate::display::{FrameSink, HeadlessSink};
use crate::MonitorError;

/// Result of one loop iteration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TickOutcome {
    #[default]
    Continue,
    /// The primary source has no more frames
    Exhausted,
    /// The sink or a shutdown signal asked to stop
    ExitRequested,
}

/// Counters reported when the loop ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Primary frames processed
    pub frames: u64,
    /// Ticks where the road view was replaced by a blank frame
    pub lane_gaps: u64,
    /// Alarm activations issued by the detector
    pub alarms_raised: u64,
    /// Why the loop stopped (`Continue` while still running)
    pub exit: TickOutcome,
}

/// Owns both sources, both pipelines, the alarm and the sink
pub struct FrameLoop {
    primary: Box<dyn FrameSource>,
    lane: Box<dyn FrameSource>,
    landmarks: Box<dyn LandmarkProvider>,
    detector: DrowsinessDetector,
    lanes: LanePipeline,
    alarm: AlarmController,
    sink: Box<dyn FrameSink>,
    state: DrowsinessState,
    shutdown: Arc<AtomicBool>,
    stats: LoopStats,
    released: bool,
}

impl FrameLoop {
    pub fn new(
        primary: Box<dyn FrameSource>,
        lane: Box<dyn FrameSource>,
        landmarks: Box<dyn LandmarkProvider>,
        detector: DrowsinessDetector,
        lanes: LanePipeline,
        alarm: AlarmController,
        sink: Box<dyn FrameSink>,
    ) -> Self {
        Self {
            primary,
            lane,
            landmarks,
            detector,
            lanes,
            alarm,
            sink,
            state: DrowsinessState::default(),
            shutdown: Arc::new(AtomicBool::new(false)),
            stats: LoopStats::default(),
            released: false,
        }
    }

    /// Open every source and collaborator named by `config`
    ///
    /// Alarm playback is spawned onto `runtime`.
    pub fn from_config(config: &AppConfig, runtime: Handle) -> Result<Self, MonitorError> {
        let primary = open_primary(config)?;
        let lane = open_recording(&config.lane.path, config.lane.fps)?;

        let landmarks = match &config.landmarks.replay {
            Some(path) => LandmarkReplay::open(path)?,
            None => {
                warn!("No landmark replay configured; no faces will be detected");
                LandmarkReplay::empty()
            }
        };

        let detector = DrowsinessDetector::new(config.drowsiness.clone())?;
        let lanes = LanePipeline::new(config.lanes.clone())?;
        let alarm = AlarmController::new(
            config.alarm.clone(),
            Arc::new(CommandPlayer::from_config(&config.alarm)),
            runtime,
        );
        if !config.alarm.sound_path.is_file() {
            warn!(
                "Alarm sound {} not found; alarms will be silent",
                config.alarm.sound_path.display()
            );
        }
        let sink = open_sink(config)?;

        Ok(Self::new(
            primary,
            lane,
            Box::new(landmarks),
            detector,
            lanes,
            alarm,
            sink,
        ))
    }

    /// Stop at the next tick once `flag` is set
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = flag;
        self
    }

    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    pub fn state(&self) -> &DrowsinessState {
        &self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn alarm(&self) -> &AlarmController {
        &self.alarm
    }

    /// Process one primary frame and its road counterpart
    pub fn tick(&mut self) -> TickOutcome {
        let frame = match self.primary.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                info!("Primary source {} exhausted", self.primary.name());
                return TickOutcome::Exhausted;
            }
            Err(e) => {
                error!("Primary source {} failed: {}", self.primary.name(), e);
                return TickOutcome::Exhausted;
            }
        };
        self.stats.frames += 1;

        let left = self.process_driver_view(frame);
        let right = self.process_road_view(&left);

        match compose(&left, &right) {
            Ok(composed) => {
                if let Err(e) = self.sink.render(&composed) {
                    warn!("Render failed: {}", e);
                }
            }
            Err(e) => warn!("Composition failed for frame {}: {}", left.sequence, e),
        }

        if self.sink.poll_exit() || self.shutdown.load(Ordering::SeqCst) {
            info!("Exit requested");
            return TickOutcome::ExitRequested;
        }
        TickOutcome::Continue
    }

    fn process_driver_view(&mut self, mut frame: VideoFrame) -> VideoFrame {
        let faces = match self.landmarks.detect(&frame) {
            Ok(faces) => faces,
            Err(e) => {
                warn!("Landmark detection failed on frame {}: {}", frame.sequence, e);
                Vec::new()
            }
        };

        let assessment = self.detector.evaluate(&mut self.state, &faces);
        match assessment.transition {
            Some(AlarmTransition::Activate) => {
                self.stats.alarms_raised += 1;
                if let Err(e) = self.alarm.activate() {
                    error!("Failed to sound alarm: {}", e);
                }
            }
            Some(AlarmTransition::Deactivate) => {
                self.alarm.deactivate();
            }
            None => {}
        }

        if let Err(e) = self.detector.annotate(&mut frame, &assessment) {
            warn!("Annotation failed on frame {}: {}", frame.sequence, e);
        }
        frame
    }

    fn process_road_view(&mut self, primary: &VideoFrame) -> VideoFrame {
        let analysis = match self.lane.read_frame() {
            Ok(Some(frame)) => self.lanes.process(&frame).map_err(|e| e.to_string()),
            Ok(None) => Err("no frame".to_string()),
            Err(e) => Err(e.to_string()),
        };

        match analysis {
            Ok(analysis) => analysis.frame,
            Err(reason) => {
                debug!("Road view gap at frame {}: {}", primary.sequence, reason);
                self.stats.lane_gaps += 1;
                blank_like(primary)
            }
        }
    }

    /// Tick until the primary source ends or exit is requested, then release
    pub fn run(&mut self) -> LoopStats {
        loop {
            match self.tick() {
                TickOutcome::Continue => {}
                outcome => {
                    self.stats.exit = outcome;
                    break;
                }
            }
        }
        self.release();

        info!(
            "Frame loop finished: {} frames, {} road gaps, {} alarms ({:?})",
            self.stats.frames, self.stats.lane_gaps, self.stats.alarms_raised, self.stats.exit
        );
        self.stats
    }

    /// Release sources, close the sink and silence the alarm. Idempotent.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.primary.release();
        self.lane.release();
        self.sink.close();
        self.alarm.shutdown();
        self.released = true;
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.release();
    }
}

fn open_primary(config: &AppConfig) -> Result<Box<dyn FrameSource>, MonitorError> {
    if let Some(path) = &config.primary.recording {
        return Ok(open_recording(path, config.primary.fps)?);
    }

    #[cfg(feature = "camera")]
    {
        Ok(Box::new(camera_capture::CameraSource::open(&config.primary.camera)?))
    }

    #[cfg(not(feature = "camera"))]
    {
        Err(crate::ConfigError::Invalid(
            "primary.recording is not set and camera support is not compiled in".into(),
        )
        .into())
    }
}

fn open_sink(config: &AppConfig) -> Result<Box<dyn FrameSink>, MonitorError> {
    match config.display.mode {
        DisplayMode::Headless => {
            let sink = match &config.display.snapshot_dir {
                Some(dir) => HeadlessSink::with_snapshots(dir, config.display.snapshot_every)?,
                None => HeadlessSink::new(),
            };
            Ok(Box::new(sink))
        }

        #[cfg(feature = "window")]
        DisplayMode::Window => Ok(Box::new(crate::display::WindowSink::open(
            &config.display.title,
            config.display.window_width,
            config.display.window_height,
        )?)),

        #[cfg(not(feature = "window"))]
        DisplayMode::Window => Err(crate::ConfigError::Invalid(
            "display.mode = window requires the `window` feature".into(),
        )
        .into()),
    }
}
