//! Display sinks for composited frames

use std::path::PathBuf;

use camera_capture::VideoFrame;
use thiserror::Error;
use tracing::{debug, info};

/// Display error types
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Failed to create display: {0}")]
    Create(String),

    #[error("Failed to render frame: {0}")]
    Render(String),

    #[error("Failed to write snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where composited frames go
pub trait FrameSink {
    fn render(&mut self, frame: &VideoFrame) -> Result<(), DisplayError>;

    /// Non-blocking check for a user exit request
    fn poll_exit(&mut self) -> bool;

    fn close(&mut self);
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn render(&mut self, frame: &VideoFrame) -> Result<(), DisplayError> {
        (**self).render(frame)
    }

    fn poll_exit(&mut self) -> bool {
        (**self).poll_exit()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Sink without a screen; optionally keeps periodic PNG snapshots
pub struct HeadlessSink {
    rendered: u64,
    snapshot_dir: Option<PathBuf>,
    snapshot_every: u64,
}

impl HeadlessSink {
    pub fn new() -> Self {
        Self {
            rendered: 0,
            snapshot_dir: None,
            snapshot_every: 1,
        }
    }

    /// Write every `every`-th frame into `dir` (created if needed)
    pub fn with_snapshots(dir: impl Into<PathBuf>, every: u32) -> Result<Self, DisplayError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        info!("Writing snapshots to {} every {} frames", dir.display(), every.max(1));
        Ok(Self {
            rendered: 0,
            snapshot_dir: Some(dir),
            snapshot_every: u64::from(every.max(1)),
        })
    }

    /// Frames rendered so far
    pub fn rendered(&self) -> u64 {
        self.rendered
    }
}

impl Default for HeadlessSink {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSink for HeadlessSink {
    fn render(&mut self, frame: &VideoFrame) -> Result<(), DisplayError> {
        self.rendered += 1;

        let Some(dir) = &self.snapshot_dir else {
            return Ok(());
        };
        if self.rendered % self.snapshot_every != 0 {
            return Ok(());
        }

        let path = dir.join(format!("frame_{:06}.png", self.rendered));
        let img = frame
            .to_rgb_image()
            .map_err(|e| DisplayError::Render(e.to_string()))?;
        img.save(&path)
            .map_err(|source| DisplayError::Snapshot { path: path.clone(), source })?;
        debug!("Snapshot {}", path.display());
        Ok(())
    }

    fn poll_exit(&mut self) -> bool {
        false
    }

    fn close(&mut self) {
        debug!("Headless sink closed after {} frames", self.rendered);
    }
}

#[cfg(feature = "window")]
pub use window::WindowSink;

#[cfg(feature = "window")]
mod window {
    use super::{DisplayError, FrameSink};
    use camera_capture::VideoFrame;
    use minifb::{Key, KeyRepeat, Window, WindowOptions};
    use tracing::info;

    /// Desktop preview window; `q`, Escape or closing the window exits
    pub struct WindowSink {
        window: Option<Window>,
        buffer: Vec<u32>,
    }

    impl WindowSink {
        pub fn open(title: &str, width: usize, height: usize) -> Result<Self, DisplayError> {
            let mut window = Window::new(
                title,
                width,
                height,
                WindowOptions {
                    resize: true,
                    ..WindowOptions::default()
                },
            )
            .map_err(|e| DisplayError::Create(e.to_string()))?;
            window.set_target_fps(60);
            info!("Opened window '{}' ({}x{})", title, width, height);

            Ok(Self {
                window: Some(window),
                buffer: Vec::new(),
            })
        }
    }

    impl FrameSink for WindowSink {
        fn render(&mut self, frame: &VideoFrame) -> Result<(), DisplayError> {
            let Some(window) = self.window.as_mut() else {
                return Err(DisplayError::Render("window closed".into()));
            };

            // minifb wants 0RGB packed into u32
            self.buffer.clear();
            self.buffer.extend(frame.data.chunks_exact(3).map(|p| {
                (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2])
            }));

            window
                .update_with_buffer(&self.buffer, frame.width as usize, frame.height as usize)
                .map_err(|e| DisplayError::Render(e.to_string()))
        }

        fn poll_exit(&mut self) -> bool {
            match &self.window {
                Some(window) => {
                    !window.is_open()
                        || window.is_key_pressed(Key::Q, KeyRepeat::No)
                        || window.is_key_pressed(Key::Escape, KeyRepeat::No)
                }
                None => true,
            }
        }

        fn close(&mut self) {
            self.window = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_counts_and_never_exits() {
        let mut sink = HeadlessSink::new();
        let frame = VideoFrame::blank(8, 4);
        for _ in 0..3 {
            sink.render(&frame).unwrap();
        }
        assert_eq!(sink.rendered(), 3);
        assert!(!sink.poll_exit());
    }

    #[test]
    fn test_headless_snapshots_every_nth_frame() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots = dir.path().join("shots");
        let mut sink = HeadlessSink::with_snapshots(&snapshots, 2).unwrap();
        let frame = VideoFrame::new(vec![128; 8 * 4 * 3], 8, 4, 0, 0).unwrap();

        for _ in 0..5 {
            sink.render(&frame).unwrap();
        }
        sink.close();

        let mut written: Vec<_> = std::fs::read_dir(&snapshots)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        written.sort();
        assert_eq!(written, vec!["frame_000002.png", "frame_000004.png"]);

        let saved = image::open(snapshots.join("frame_000002.png")).unwrap().to_rgb8();
        assert_eq!(saved.dimensions(), (8, 4));
        assert_eq!(saved.get_pixel(3, 2).0, [128, 128, 128]);
    }
}
