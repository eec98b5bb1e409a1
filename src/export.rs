//! Export of sampling results
//!
//! Contains the CSV sink for exported samples and GPX export of
//! reconstructed navigation tracks.

use crate::types::{ExportedSample, NavigationTrack};
use crate::Result;
use anyhow::Context;
use chrono::{Duration, NaiveDateTime};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header row of the samples CSV
pub const CSV_HEADER: [&str; 4] = ["lat", "lon", "time_stamp", "file_names"];

/// Timestamp layout used in the CSV (second precision, no zone)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Consumer of exported samples
pub trait SampleSink {
    fn accept(&mut self, sample: &ExportedSample) -> Result<()>;
}

impl SampleSink for Vec<ExportedSample> {
    fn accept(&mut self, sample: &ExportedSample) -> Result<()> {
        self.push(sample.clone());
        Ok(())
    }
}

#[cfg(feature = "csv")]
pub use self::csv_sink::SampleCsvWriter;

#[cfg(feature = "csv")]
mod csv_sink {
    use super::{format_timestamp, SampleSink, CSV_HEADER};
    use crate::error::GeotagError;
    use crate::types::ExportedSample;
    use crate::Result;
    use anyhow::Context;
    use serde::Serialize;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;

    #[derive(Serialize)]
    struct SampleRecord<'a> {
        lat: f64,
        lon: f64,
        time_stamp: String,
        file_names: &'a str,
    }

    /// Writes one CSV row per exported sample
    pub struct SampleCsvWriter<W: Write> {
        writer: csv::Writer<W>,
        rows: usize,
    }

    impl SampleCsvWriter<File> {
        /// Create the CSV file and write its header
        pub fn create(path: &Path) -> Result<Self> {
            let file = File::create(path)
                .with_context(|| format!("Failed to create CSV file: {:?}", path))?;
            Self::from_writer(file)
        }
    }

    impl<W: Write> SampleCsvWriter<W> {
        pub fn from_writer(inner: W) -> Result<Self> {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(inner);
            writer.write_record(CSV_HEADER)?;
            Ok(Self { writer, rows: 0 })
        }

        pub fn rows(&self) -> usize {
            self.rows
        }

        pub fn flush(&mut self) -> Result<()> {
            self.writer.flush()?;
            Ok(())
        }

        pub fn into_inner(self) -> Result<W> {
            self.writer
                .into_inner()
                .map_err(|e| GeotagError::Export(format!("Failed to flush CSV writer: {}", e.error())).into())
        }
    }

    impl<W: Write> SampleSink for SampleCsvWriter<W> {
        fn accept(&mut self, sample: &ExportedSample) -> Result<()> {
            self.writer.serialize(SampleRecord {
                lat: sample.position.latitude,
                lon: sample.position.longitude,
                time_stamp: format_timestamp(&sample.timestamp),
                file_names: &sample.file_name,
            })?;
            self.rows += 1;
            Ok(())
        }
    }
}

/// Path of the GPX file for a recording
pub fn gpx_path(output_dir: &Path, recording: &str) -> PathBuf {
    output_dir.join(format!("{recording}.gpx"))
}

/// Export a reconstructed track to GPX.
///
/// Each entry becomes a `trkpt` stamped with the recording's wall-clock start
/// plus its elapsed offset. Times are local and carry no zone designator.
/// Returns `None` for an empty track.
pub fn export_track_gpx(
    track: &NavigationTrack,
    recording: &str,
    wall_clock_start: NaiveDateTime,
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    if track.is_empty() {
        return Ok(None);
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
    let path = gpx_path(output_dir, recording);
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create GPX file: {:?}", path))?;
    let mut gpx_file = std::io::BufWriter::new(file);

    writeln!(gpx_file, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        gpx_file,
        r#"<gpx creator="dvr_geotag" version="1.1" xmlns="http://www.topografix.com/GPX/1/1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd">"#
    )?;
    writeln!(gpx_file, "<metadata><name>{}</name></metadata>", xml_escape(recording))?;
    writeln!(gpx_file, "<trk><name>{}</name><trkseg>", xml_escape(recording))?;

    for (elapsed_s, entry) in track.iter() {
        let time = wall_clock_start + Duration::seconds(elapsed_s);
        writeln!(
            gpx_file,
            r#"  <trkpt lat="{:.7}" lon="{:.7}"><time>{}</time></trkpt>"#,
            entry.position.latitude,
            entry.position.longitude,
            format_timestamp(&time)
        )?;
    }

    writeln!(gpx_file, "</trkseg></trk>")?;
    writeln!(gpx_file, "</gpx>")?;
    gpx_file.flush()?;

    Ok(Some(path))
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
