//! Run configuration
//!
//! Defaults mirror the fixed constants the tool ships with; the CLI exposes
//! each of them as an override.

use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_INPUT_DIR: &str = "dvr";
pub const DEFAULT_OUTPUT_DIR: &str = "out";
pub const DEFAULT_CSV_FILE_NAME: &str = "out.csv";
pub const DEFAULT_LOG_EXTENSION: &str = ".nmea";
pub const DEFAULT_VIDEO_EXTENSION: &str = ".mp4";
pub const MIN_DISTANCE_BETWEEN_PICTURES_M: f64 = 4.0;

/// Where the wall-clock time of a recording's first frame comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimestampSource {
    /// Modification time of the video file
    #[default]
    ModifiedTime,
    /// Date and time embedded in the recording name
    FileName,
}

impl std::str::FromStr for TimestampSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mtime" | "modified" => Ok(TimestampSource::ModifiedTime),
            "filename" | "name" => Ok(TimestampSource::FileName),
            other => Err(format!(
                "unknown timestamp source '{other}' (expected 'mtime' or 'filename')"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExtractionConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub csv_file_name: String,
    /// Extension of positioning logs, with the leading dot
    pub log_extension: String,
    /// Extension of video files, with the leading dot
    pub video_extension: String,
    pub min_distance_m: f64,
    pub timestamp_source: TimestampSource,
    pub export_gpx: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            csv_file_name: DEFAULT_CSV_FILE_NAME.to_string(),
            log_extension: DEFAULT_LOG_EXTENSION.to_string(),
            video_extension: DEFAULT_VIDEO_EXTENSION.to_string(),
            min_distance_m: MIN_DISTANCE_BETWEEN_PICTURES_M,
            timestamp_source: TimestampSource::default(),
            export_gpx: false,
        }
    }
}

impl ExtractionConfig {
    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.csv_file_name)
    }
}

/// Normalize a user-supplied extension to carry a leading dot
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}
