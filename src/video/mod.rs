//! Video frame access
//!
//! Decoding and image encoding live behind two small traits so the sampling
//! pipeline can run against any decoder. The FFmpeg-backed implementation is
//! available with the `video` feature.

#[cfg(feature = "video")]
pub mod ffmpeg;

#[cfg(feature = "video")]
pub use ffmpeg::{FfmpegFrameSource, JpegFrameWriter};

use crate::Result;
use std::path::Path;

/// Sequential reader of decoded video frames
pub trait FrameSource {
    type Frame;

    /// Frames per second of the video stream
    fn frame_rate(&self) -> f64;

    /// Total number of frames if the container reports it
    fn frame_count(&self) -> Option<u64>;

    /// Next decoded frame, `None` at end of stream
    fn next_frame(&mut self) -> Result<Option<Self::Frame>>;
}

/// Persists selected frames as image files
pub trait FrameWriter<F> {
    fn write_frame(&mut self, frame: &F, path: &Path) -> Result<()>;
}

/// Elapsed seconds of a frame from its zero-based index
pub fn frame_offset_s(frame_index: u64, frame_rate: f64) -> f64 {
    frame_index as f64 / frame_rate
}
