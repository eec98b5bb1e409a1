//! End-to-end tests of the extraction pipeline
//!
//! Drives `run_extraction` over a synthetic recording set with an in-memory
//! frame source, so no FFmpeg is needed:
//! - distance-spaced selection over a straight 1 m/s track
//! - image naming, CSV rows and wall-clock timestamps
//! - recordings without usable fixes
//! - mismatched video/log sets failing before any output
//! - the CSV index created only after the recording set is validated

use dvr_geotag::{
    checksum, run_extraction, ExportedSample, ExtractionConfig, FrameSource, FrameWriter,
    GeotagError, TimestampSource,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Frame source yielding frame indices at a fixed rate
struct FakeVideo {
    rate: f64,
    total: u64,
    next: u64,
}

impl FakeVideo {
    fn new(rate: f64, total: u64) -> Self {
        Self {
            rate,
            total,
            next: 0,
        }
    }
}

impl FrameSource for FakeVideo {
    type Frame = u64;

    fn frame_rate(&self) -> f64 {
        self.rate
    }

    fn frame_count(&self) -> Option<u64> {
        Some(self.total)
    }

    fn next_frame(&mut self) -> dvr_geotag::Result<Option<u64>> {
        if self.next >= self.total {
            return Ok(None);
        }
        self.next += 1;
        Ok(Some(self.next - 1))
    }
}

/// Writer that touches the target file and remembers what it wrote
#[derive(Default)]
struct RecordingWriter {
    written: Vec<(u64, PathBuf)>,
}

impl FrameWriter<u64> for RecordingWriter {
    fn write_frame(&mut self, frame: &u64, path: &Path) -> dvr_geotag::Result<()> {
        fs::write(path, frame.to_le_bytes())?;
        self.written.push((*frame, path.to_path_buf()));
        Ok(())
    }
}

fn sentence(body: &str) -> String {
    format!("${}*{}", body, checksum(body))
}

/// Straight northbound track starting at 12:MM:00 UTC, one fix per second, about 1 m apart
fn northbound_log(start_minute: u32, fixes: u32) -> String {
    let mut log = String::new();
    for i in 0..fixes {
        let minutes = 10.0 + i as f64 * 0.000_539_60;
        let body = format!(
            "GPRMC,12{:02}{:02}.000,A,52{:011.8},N,02100.000000,E,2.0,0.0,110521,,,A",
            start_minute, i, minutes
        );
        log.push_str(&sentence(&body));
        log.push_str("\r\n");
    }
    log
}

fn write_recording(dir: &Path, base: &str, log: &str) {
    fs::write(dir.join(format!("{base}.mp4")), b"").unwrap();
    fs::write(dir.join(format!("{base}.nmea")), log).unwrap();
}

fn config_for(temp_dir: &TempDir) -> ExtractionConfig {
    let input_dir = temp_dir.path().join("dvr");
    fs::create_dir_all(&input_dir).unwrap();
    ExtractionConfig {
        input_dir,
        output_dir: temp_dir.path().join("out"),
        timestamp_source: TimestampSource::FileName,
        ..ExtractionConfig::default()
    }
}

#[test]
fn test_straight_track_exports_every_four_meters() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = config_for(&temp_dir);
    write_recording(&config.input_dir, "DVR_2021-05-11_14-00-00", &northbound_log(0, 21));

    let mut writer = RecordingWriter::default();
    let mut samples: Vec<ExportedSample> = Vec::new();
    let report = run_extraction(
        &config,
        |_: &Path| Ok(FakeVideo::new(20.0, 400)),
        &mut writer,
        &mut samples,
    )
    .expect("extraction should succeed");

    assert_eq!(report.recordings.len(), 1);
    let recording = &report.recordings[0];
    assert_eq!(recording.name, "DVR_2021-05-11_14-00-00");
    assert_eq!(recording.track_entries, 21);
    assert_eq!(recording.frames_read, 400);
    assert_eq!(recording.frame_count, Some(400));

    // 20 s of travel at ~1 m/s with a 4 m minimum gap
    assert!(
        (4..=6).contains(&samples.len()),
        "unexpected export count {}",
        samples.len()
    );
    assert_eq!(recording.images_saved, samples.len());
    assert_eq!(writer.written.len(), samples.len());

    // First frame with a position is always exported
    assert_eq!(samples[0].frame_offset_s, 0.0);
    assert_eq!(writer.written[0].0, 0);
    assert_eq!(
        dvr_geotag::format_timestamp(&samples[0].timestamp),
        "2021-05-11T14:00:00"
    );

    for pair in samples.windows(2) {
        assert!(pair[1].frame_offset_s > pair[0].frame_offset_s);
        assert!(pair[1].position.latitude > pair[0].position.latitude);
        assert!(pair[1].timestamp >= pair[0].timestamp);
        let gap = pair[1].frame_offset_s - pair[0].frame_offset_s;
        assert!(gap >= 3.9 && gap <= 4.2, "gap {gap} out of range");
    }

    for (i, (sample, (_, path))) in samples.iter().zip(&writer.written).enumerate() {
        let expected = format!("DVR_2021-05-11_14-00-00_{:04}.jpg", i + 1);
        assert_eq!(sample.file_name, expected);
        assert_eq!(path, &config.output_dir.join(&expected));
        assert!(path.exists(), "image {:?} should be written", path);
    }
}

#[test]
fn test_recording_without_fixes_exports_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = config_for(&temp_dir);
    let log = format!(
        "{}\n{}\n",
        sentence("GPRMC,120000.000,V,,,,,,,110521,,,N"),
        sentence("GPGGA,120001.000,,,,,0,0,,,M,,M,,")
    );
    write_recording(&config.input_dir, "DVR_2021-05-11_14-00-00", &log);

    let mut writer = RecordingWriter::default();
    let mut samples: Vec<ExportedSample> = Vec::new();
    let report = run_extraction(
        &config,
        |_: &Path| Ok(FakeVideo::new(30.0, 90)),
        &mut writer,
        &mut samples,
    )
    .expect("a recording without fixes is not an error");

    assert_eq!(report.recordings[0].track_entries, 0);
    assert_eq!(report.recordings[0].frames_read, 90);
    assert_eq!(report.images_saved(), 0);
    assert!(samples.is_empty());
    assert!(writer.written.is_empty());
}

#[test]
fn test_multiple_recordings_keep_separate_counters() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = config_for(&temp_dir);
    write_recording(&config.input_dir, "DVR_2021-05-11_14-00-00", &northbound_log(0, 21));
    write_recording(&config.input_dir, "DVR_2021-05-11_14-05-00", &northbound_log(5, 21));

    let mut writer = RecordingWriter::default();
    let mut samples: Vec<ExportedSample> = Vec::new();
    let report = run_extraction(
        &config,
        |_: &Path| Ok(FakeVideo::new(20.0, 400)),
        &mut writer,
        &mut samples,
    )
    .unwrap();

    assert_eq!(report.recordings.len(), 2);
    assert_eq!(report.images_saved(), samples.len());
    for recording in &report.recordings {
        let first = format!("{}_0001.jpg", recording.name);
        assert!(samples.iter().any(|s| s.file_name == first));
    }
}

#[test]
fn test_invalid_frame_rate_fails_recording() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = config_for(&temp_dir);
    write_recording(&config.input_dir, "DVR_2021-05-11_14-00-00", &northbound_log(0, 3));

    let mut writer = RecordingWriter::default();
    let mut samples: Vec<ExportedSample> = Vec::new();
    let result = run_extraction(
        &config,
        |_: &Path| Ok(FakeVideo::new(0.0, 10)),
        &mut writer,
        &mut samples,
    );
    assert!(result.is_err());
}

#[test]
fn test_mismatched_recording_set_fails_before_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = config_for(&temp_dir);
    fs::write(config.input_dir.join("DVR_2021-05-11_14-00-00.mp4"), b"").unwrap();
    fs::write(config.input_dir.join("DVR_2021-05-11_15-00-00.nmea"), "").unwrap();

    let mut writer = RecordingWriter::default();
    let mut samples: Vec<ExportedSample> = Vec::new();
    let err = run_extraction(
        &config,
        |_: &Path| Ok(FakeVideo::new(20.0, 1)),
        &mut writer,
        &mut samples,
    )
    .expect_err("mismatched sets must fail");

    match err.downcast_ref::<GeotagError>() {
        Some(GeotagError::RecordingSetMismatch {
            missing_video,
            missing_log,
        }) => {
            assert_eq!(missing_video, &vec!["DVR_2021-05-11_15-00-00".to_string()]);
            assert_eq!(missing_log, &vec!["DVR_2021-05-11_14-00-00".to_string()]);
        }
        other => panic!("unexpected error: {:?} ({err})", other),
    }
    assert!(!config.output_dir.exists());
    assert!(writer.written.is_empty());
}

#[cfg(feature = "csv")]
#[test]
fn test_csv_index_matches_written_images() {
    use dvr_geotag::SampleCsvWriter;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = config_for(&temp_dir);
    write_recording(&config.input_dir, "DVR_2021-05-11_14-00-00", &northbound_log(0, 21));

    fs::create_dir_all(&config.output_dir).unwrap();
    let csv_path = config.csv_path();
    let mut csv = SampleCsvWriter::create(&csv_path).unwrap();
    let mut writer = RecordingWriter::default();
    let report = run_extraction(
        &config,
        |_: &Path| Ok(FakeVideo::new(20.0, 400)),
        &mut writer,
        &mut csv,
    )
    .unwrap();
    assert_eq!(csv.rows(), report.images_saved());
    csv.flush().unwrap();

    let content = fs::read_to_string(&csv_path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("lat,lon,time_stamp,file_names"));

    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), writer.written.len());
    for (row, (_, path)) in rows.iter().zip(&writer.written) {
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields.len(), 4);
        let lat: f64 = fields[0].parse().unwrap();
        let lon: f64 = fields[1].parse().unwrap();
        assert!((lat - (52.0 + 10.0 / 60.0)).abs() < 1e-3);
        assert!((lon - 21.0).abs() < 1e-9);
        assert!(fields[2].starts_with("2021-05-11T14:00:"));
        assert_eq!(
            fields[3],
            path.file_name().unwrap().to_str().unwrap()
        );
    }
}

#[cfg(feature = "csv")]
#[test]
fn test_mismatched_recording_set_keeps_previous_csv_index() {
    use dvr_geotag::extract_to_csv;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = config_for(&temp_dir);
    fs::write(config.input_dir.join("DVR_2021-05-11_14-00-00.mp4"), b"").unwrap();

    let previous = "lat,lon,time_stamp,file_names\n52.1,21.0,2021-05-10T09:00:00,DVR_0001.jpg\n";
    fs::create_dir_all(&config.output_dir).unwrap();
    fs::write(config.csv_path(), previous).unwrap();

    let mut writer = RecordingWriter::default();
    let result = extract_to_csv(
        &config,
        |_: &Path| Ok(FakeVideo::new(20.0, 1)),
        &mut writer,
    );
    assert!(result.is_err(), "mismatched sets must fail");
    assert_eq!(fs::read_to_string(config.csv_path()).unwrap(), previous);
    assert!(writer.written.is_empty());
}

#[cfg(feature = "csv")]
#[test]
fn test_mismatched_recording_set_creates_no_output_dir_with_csv_sink() {
    use dvr_geotag::extract_to_csv;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = config_for(&temp_dir);
    fs::write(config.input_dir.join("DVR_2021-05-11_14-00-00.nmea"), "").unwrap();

    let mut writer = RecordingWriter::default();
    let result = extract_to_csv(
        &config,
        |_: &Path| Ok(FakeVideo::new(20.0, 1)),
        &mut writer,
    );
    assert!(result.is_err());
    assert!(!config.output_dir.exists());
}

#[cfg(feature = "csv")]
#[test]
fn test_extract_to_csv_writes_index() {
    use dvr_geotag::extract_to_csv;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = config_for(&temp_dir);
    write_recording(&config.input_dir, "DVR_2021-05-11_14-00-00", &northbound_log(0, 21));

    let mut writer = RecordingWriter::default();
    let report = extract_to_csv(
        &config,
        |_: &Path| Ok(FakeVideo::new(20.0, 400)),
        &mut writer,
    )
    .unwrap();

    let content = fs::read_to_string(config.csv_path()).unwrap();
    assert!(content.starts_with("lat,lon,time_stamp,file_names\n"));
    assert_eq!(content.lines().count(), report.images_saved() + 1);
}

#[test]
fn test_track_modules_resolve_by_path() {
    let name = dvr_geotag::RecordingName::parse("DVR_2021-05-11_14-00-00").unwrap();
    let (track, stats) = dvr_geotag::track_builder::build_track(&northbound_log(0, 3), &name);
    let track: &dvr_geotag::track::NavigationTrack = &track;
    assert_eq!(track.len(), 3);
    assert_eq!(stats.accepted_fixes, 3);
}
