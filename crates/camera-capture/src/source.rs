//! Frame source abstraction

use crate::{CaptureError, VideoFrame};

/// Anything that yields frames one tick at a time
///
/// `Ok(None)` means the source has no frame for this tick (end of stream for
/// files, a dropped frame for scripted sources). Callers decide whether that
/// is fatal.
pub trait FrameSource {
    /// Human-readable source name for logs
    fn name(&self) -> &str;

    /// Read the next frame
    fn read_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError>;

    /// Release the underlying device or files. Safe to call more than once.
    fn release(&mut self);
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError> {
        (**self).read_frame()
    }

    fn release(&mut self) {
        (**self).release()
    }
}
