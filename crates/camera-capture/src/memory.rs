//! In-memory frame scripts

use std::collections::VecDeque;
use crate::{CaptureError, FrameSource, VideoFrame};

/// Source that plays back a fixed script of frames
///
/// `None` entries in the script are ticks where the source misses a frame.
/// After the script runs out every read yields `Ok(None)`.
pub struct MemorySource {
    name: String,
    script: VecDeque<Option<VideoFrame>>,
    released: bool,
}

impl MemorySource {
    /// Script with a frame on every tick
    pub fn new(name: impl Into<String>, frames: Vec<VideoFrame>) -> Self {
        Self::with_gaps(name, frames.into_iter().map(Some).collect())
    }

    /// Script where `None` marks a missed tick
    pub fn with_gaps(name: impl Into<String>, script: Vec<Option<VideoFrame>>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
            released: false,
        }
    }

    /// Frames (or gaps) not yet played
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl FrameSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError> {
        if self.released {
            return Err(CaptureError::Stream(format!("{} already released", self.name)));
        }
        Ok(self.script.pop_front().flatten())
    }

    fn release(&mut self) {
        self.released = true;
        self.script.clear();
    }
}
