//! Per-recording and whole-run orchestration
//!
//! Recordings are processed one at a time in modification-time order; frames
//! within a recording strictly in decoding order. One distance estimator is
//! shared by the whole run.

use crate::config::ExtractionConfig;
use crate::export::{export_track_gpx, SampleSink};
use crate::geodesy::DistanceEstimator;
use crate::parser::track_builder::read_track;
use crate::recordings::{discover_recordings, Recording};
use crate::sampler::FrameSampler;
use crate::types::NavigationTrack;
use crate::video::{frame_offset_s, FrameSource, FrameWriter};
use crate::Result;
use anyhow::{anyhow, Context};
use chrono::NaiveDateTime;
use log::{debug, info};
use std::path::Path;

/// Outcome of processing one recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingReport {
    pub name: String,
    pub track_entries: usize,
    pub frames_read: u64,
    pub frame_count: Option<u64>,
    pub images_saved: usize,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub recordings: Vec<RecordingReport>,
}

impl RunReport {
    pub fn images_saved(&self) -> usize {
        self.recordings.iter().map(|r| r.images_saved).sum()
    }
}

/// Logs progress every 10 % of the expected frame count, from 0 % on the first frame
#[derive(Debug)]
struct Progress<'a> {
    name: &'a str,
    total: Option<u64>,
    last_reported: Option<u64>,
}

impl<'a> Progress<'a> {
    fn new(name: &'a str, total: Option<u64>) -> Self {
        Self {
            name,
            total,
            last_reported: None,
        }
    }

    /// `frame_index` is zero-based
    fn update(&mut self, frame_index: u64) {
        let Some(total) = self.total.filter(|&n| n > 0) else {
            return;
        };
        let percent = (100 * frame_index / total).min(100);
        if percent % 10 == 0 && self.last_reported.map_or(true, |last| percent > last) {
            info!("{}: {}%", self.name, percent);
            self.last_reported = Some(percent);
        }
    }
}

/// Sample the frames of one recording against its track.
///
/// Every exported frame is written to `output_dir` under its generated name
/// before its sample is handed to the sink.
#[allow(clippy::too_many_arguments)]
pub fn sample_recording<S, W, K>(
    name: &str,
    track: &NavigationTrack,
    wall_clock_start: NaiveDateTime,
    source: &mut S,
    writer: &mut W,
    sink: &mut K,
    estimator: &DistanceEstimator,
    min_distance_m: f64,
    output_dir: &Path,
) -> Result<RecordingReport>
where
    S: FrameSource,
    W: FrameWriter<S::Frame>,
    K: SampleSink + ?Sized,
{
    let frame_rate = source.frame_rate();
    if !frame_rate.is_finite() || frame_rate <= 0.0 {
        return Err(anyhow!("{}: invalid frame rate {}", name, frame_rate));
    }

    let mut sampler = FrameSampler::new(track, estimator, name, wall_clock_start, min_distance_m);
    let mut progress = Progress::new(name, source.frame_count());
    let mut frames_read = 0u64;

    while let Some(frame) = source.next_frame()? {
        let offset = frame_offset_s(frames_read, frame_rate);
        progress.update(frames_read);
        frames_read += 1;

        if let Some(sample) = sampler.offer(offset) {
            let path = output_dir.join(&sample.file_name);
            writer.write_frame(&frame, &path)?;
            sink.accept(&sample)?;
            debug!(
                "{}: frame at {:.3}s -> {} ({:.7}, {:.7})",
                name,
                offset,
                sample.file_name,
                sample.position.latitude,
                sample.position.longitude
            );
        }
    }

    let report = RecordingReport {
        name: name.to_string(),
        track_entries: track.len(),
        frames_read,
        frame_count: source.frame_count(),
        images_saved: sampler.exported_count(),
    };
    info!(
        "{}: read frames {} / {}, saved images {}",
        name,
        report.frames_read,
        report
            .frame_count
            .map_or_else(|| "?".to_string(), |n| n.to_string()),
        report.images_saved
    );
    Ok(report)
}

/// Build the track of a recording and sample its video
pub fn process_recording<S, W, K>(
    recording: &Recording,
    source: &mut S,
    writer: &mut W,
    sink: &mut K,
    estimator: &DistanceEstimator,
    config: &ExtractionConfig,
) -> Result<RecordingReport>
where
    S: FrameSource,
    W: FrameWriter<S::Frame>,
    K: SampleSink + ?Sized,
{
    let wall_clock_start = recording.wall_clock_start(config.timestamp_source)?;
    info!(
        "{} -> {}",
        recording.base_name(),
        crate::export::format_timestamp(&wall_clock_start)
    );

    let track = read_track(&recording.log_path, &recording.name)?;
    if config.export_gpx {
        if let Some(path) = export_track_gpx(
            &track,
            recording.base_name(),
            wall_clock_start,
            &config.output_dir,
        )? {
            info!("Exported track to: {}", path.display());
        }
    }

    sample_recording(
        recording.base_name(),
        &track,
        wall_clock_start,
        source,
        writer,
        sink,
        estimator,
        config.min_distance_m,
        &config.output_dir,
    )
}

fn discover(config: &ExtractionConfig) -> Result<Vec<Recording>> {
    let recordings = discover_recordings(
        &config.input_dir,
        &config.log_extension,
        &config.video_extension,
    )?;
    info!(
        "Found {} recording(s) in {:?}",
        recordings.len(),
        config.input_dir
    );
    Ok(recordings)
}

fn create_output_dir(config: &ExtractionConfig) -> Result<()> {
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", config.output_dir))
}

/// Process every recording of the input directory.
///
/// `open_video` turns a video path into a frame source. The output directory
/// is created if needed; a mismatch between video and positioning files fails
/// before any output is written.
pub fn run_extraction<S, O, W, K>(
    config: &ExtractionConfig,
    open_video: O,
    writer: &mut W,
    sink: &mut K,
) -> Result<RunReport>
where
    S: FrameSource,
    O: FnMut(&Path) -> Result<S>,
    W: FrameWriter<S::Frame>,
    K: SampleSink + ?Sized,
{
    let recordings = discover(config)?;
    create_output_dir(config)?;
    extract_recordings(config, &recordings, open_video, writer, sink)
}

/// Run the extraction with the CSV index at [`ExtractionConfig::csv_path`] as sink.
///
/// The index is only created once the recording set is known to pair up, so
/// a failing run leaves an index from an earlier run untouched.
#[cfg(feature = "csv")]
pub fn extract_to_csv<S, O, W>(
    config: &ExtractionConfig,
    open_video: O,
    writer: &mut W,
) -> Result<RunReport>
where
    S: FrameSource,
    O: FnMut(&Path) -> Result<S>,
    W: FrameWriter<S::Frame>,
{
    let recordings = discover(config)?;
    create_output_dir(config)?;

    let mut csv = crate::export::SampleCsvWriter::create(&config.csv_path())?;
    let report = extract_recordings(config, &recordings, open_video, writer, &mut csv)?;
    csv.flush()?;
    Ok(report)
}

/// Process already discovered recordings in the given order
pub fn extract_recordings<S, O, W, K>(
    config: &ExtractionConfig,
    recordings: &[Recording],
    mut open_video: O,
    writer: &mut W,
    sink: &mut K,
) -> Result<RunReport>
where
    S: FrameSource,
    O: FnMut(&Path) -> Result<S>,
    W: FrameWriter<S::Frame>,
    K: SampleSink + ?Sized,
{
    let estimator = DistanceEstimator::new();
    let mut report = RunReport::default();
    for recording in recordings {
        let mut source = open_video(&recording.video_path)?;
        let recording_report =
            process_recording(recording, &mut source, writer, sink, &estimator, config)
                .with_context(|| format!("Failed to process recording '{}'", recording.base_name()))?;
        report.recordings.push(recording_report);
    }
    Ok(report)
}

/// Export the reconstructed tracks of every recording as GPX without touching video
pub fn export_tracks(config: &ExtractionConfig) -> Result<Vec<std::path::PathBuf>> {
    let recordings = discover(config)?;
    let mut written = Vec::new();
    for recording in &recordings {
        let wall_clock_start = recording.wall_clock_start(config.timestamp_source)?;
        let track = read_track(&recording.log_path, &recording.name)?;
        if let Some(path) =
            export_track_gpx(&track, recording.base_name(), wall_clock_start, &config.output_dir)?
        {
            written.push(path);
        }
    }
    Ok(written)
}
