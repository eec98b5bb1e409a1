//! Greedy distance-based frame selection
//!
//! Frames are offered in increasing time order. A frame is exported when its
//! interpolated position is more than the minimum distance away from the last
//! *exported* position; the first frame with a known position is always
//! exported.

use crate::geodesy::DistanceEstimator;
use crate::interpolation::interpolate_position;
use crate::types::{ExportedSample, NavigationTrack, Position};
use chrono::{Duration, NaiveDateTime};

/// Image file name of the n-th exported frame of a recording (1-based)
pub fn image_file_name(recording: &str, counter: usize) -> String {
    format!("{}_{:04}.jpg", recording, counter)
}

/// Sampler state for one recording
#[derive(Debug)]
pub struct FrameSampler<'a> {
    track: &'a NavigationTrack,
    estimator: &'a DistanceEstimator,
    recording: &'a str,
    wall_clock_start: NaiveDateTime,
    min_distance_m: f64,
    previous: Option<Position>,
    exported: usize,
}

impl<'a> FrameSampler<'a> {
    pub fn new(
        track: &'a NavigationTrack,
        estimator: &'a DistanceEstimator,
        recording: &'a str,
        wall_clock_start: NaiveDateTime,
        min_distance_m: f64,
    ) -> Self {
        Self {
            track,
            estimator,
            recording,
            wall_clock_start,
            min_distance_m,
            previous: None,
            exported: 0,
        }
    }

    /// Decide whether the frame at `frame_offset_s` is exported.
    ///
    /// Frames without an interpolated position and frames too close to the
    /// last exported one leave the state untouched.
    pub fn offer(&mut self, frame_offset_s: f64) -> Option<ExportedSample> {
        let position = interpolate_position(self.track, frame_offset_s)?;

        // Negative sentinel forces an export when nothing was exported yet
        let distance = match self.previous {
            Some(previous) => self.estimator.distance_m(previous, position),
            None => -1.0,
        };
        if !(distance > self.min_distance_m || distance < 0.0) {
            return None;
        }

        self.exported += 1;
        self.previous = Some(position);
        Some(ExportedSample {
            position,
            timestamp: self.wall_clock_start + offset_duration(frame_offset_s),
            file_name: image_file_name(self.recording, self.exported),
            frame_offset_s,
        })
    }

    pub fn exported_count(&self) -> usize {
        self.exported
    }

    pub fn last_exported_position(&self) -> Option<Position> {
        self.previous
    }
}

fn offset_duration(seconds: f64) -> Duration {
    Duration::microseconds((seconds * 1_000_000.0).round() as i64)
}
