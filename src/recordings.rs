//! Discovery and pairing of recordings in the input directory
//!
//! Every video file must have a positioning log with the same base name and
//! vice versa; any difference aborts the run before anything is processed.

use crate::config::TimestampSource;
use crate::error::GeotagError;
use crate::parser::recording::RecordingName;
use crate::Result;
use anyhow::{anyhow, Context};
use chrono::{DateTime, Local, NaiveDateTime};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A video file and its positioning log
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub name: RecordingName,
    pub video_path: PathBuf,
    pub log_path: PathBuf,
    /// Modification time of the video file
    pub modified: DateTime<Local>,
}

impl Recording {
    pub fn base_name(&self) -> &str {
        &self.name.base_name
    }

    /// Local wall-clock time of the first video frame
    pub fn wall_clock_start(&self, source: TimestampSource) -> Result<NaiveDateTime> {
        match source {
            TimestampSource::ModifiedTime => Ok(self.modified.naive_local()),
            TimestampSource::FileName => self.name.local_start_datetime().ok_or_else(|| {
                anyhow!(
                    "Recording '{}' has no date in its name; use the modification time instead",
                    self.base_name()
                )
            }),
        }
    }
}

/// Files with `extension` in `dir`, keyed by base name
fn files_by_base_name(dir: &Path, extension: &str) -> Result<BTreeMap<String, PathBuf>> {
    let pattern = format!(
        "{}/*{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        glob::Pattern::escape(extension)
    );
    let mut files = BTreeMap::new();
    for entry in glob::glob(&pattern).with_context(|| format!("Invalid glob pattern '{pattern}'"))? {
        let path = entry.with_context(|| format!("Error expanding glob pattern '{pattern}'"))?;
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(base) = file_name.strip_suffix(extension) {
            files.insert(base.to_string(), path.clone());
        }
    }
    Ok(files)
}

/// Pair video files with positioning logs and order them by modification time
pub fn discover_recordings(
    input_dir: &Path,
    log_extension: &str,
    video_extension: &str,
) -> Result<Vec<Recording>> {
    if !input_dir.is_dir() {
        return Err(anyhow!("Input directory not found: {:?}", input_dir));
    }

    let videos = files_by_base_name(input_dir, video_extension)?;
    let logs = files_by_base_name(input_dir, log_extension)?;

    let missing_video: Vec<String> = logs.keys().filter(|k| !videos.contains_key(*k)).cloned().collect();
    let missing_log: Vec<String> = videos.keys().filter(|k| !logs.contains_key(*k)).cloned().collect();
    if !missing_video.is_empty() || !missing_log.is_empty() {
        return Err(GeotagError::RecordingSetMismatch {
            missing_video,
            missing_log,
        }
        .into());
    }

    let mut recordings = Vec::with_capacity(videos.len());
    for (base, video_path) in videos {
        let name = RecordingName::parse(&base)?;
        let modified = std::fs::metadata(&video_path)
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to read modification time of {:?}", video_path))?;
        let log_path = logs[&base].clone();
        recordings.push(Recording {
            name,
            video_path,
            log_path,
            modified: DateTime::<Local>::from(modified),
        });
    }

    // BTreeMap iteration already sorted by name; stable sort keeps it for ties
    recordings.sort_by_key(|r| r.modified);
    Ok(recordings)
}
