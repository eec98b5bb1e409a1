//! CLI binary for DVR Geotag
//!
//! Pairs dashboard-camera videos with their NMEA logs and exports one
//! geotagged JPEG every few meters of travel, plus a CSV index of them.

use anyhow::Result;
use clap::{Arg, Command};
use dvr_geotag::{
    normalize_extension, ExtractionConfig, TimestampSource, DEFAULT_CSV_FILE_NAME,
    DEFAULT_INPUT_DIR, DEFAULT_LOG_EXTENSION, DEFAULT_OUTPUT_DIR, DEFAULT_VIDEO_EXTENSION,
};
use std::path::PathBuf;

/// Commit the binary was built from, emitted by the build script
const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

fn build_command() -> Command {
    Command::new("DVR Geotag")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Export distance-spaced, geotagged frames from dashboard-camera videos and their NMEA logs.")
        .arg(
            Arg::new("input-dir")
                .help("Directory holding the video files and the positioning logs with matching base names")
                .default_value(DEFAULT_INPUT_DIR)
                .index(1),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for images, the CSV index and GPX tracks")
                .default_value(DEFAULT_OUTPUT_DIR)
                .value_name("DIR"),
        )
        .arg(
            Arg::new("csv-name")
                .long("csv-name")
                .help("File name of the CSV index inside the output directory")
                .default_value(DEFAULT_CSV_FILE_NAME)
                .value_name("FILE"),
        )
        .arg(
            Arg::new("log-ext")
                .long("log-ext")
                .help("Extension of positioning log files")
                .default_value(DEFAULT_LOG_EXTENSION)
                .value_name("EXT"),
        )
        .arg(
            Arg::new("video-ext")
                .long("video-ext")
                .help("Extension of video files")
                .default_value(DEFAULT_VIDEO_EXTENSION)
                .value_name("EXT"),
        )
        .arg(
            Arg::new("min-distance")
                .long("min-distance")
                .help("Minimum distance in meters between two exported pictures")
                .value_parser(clap::value_parser!(f64))
                .value_name("METERS"),
        )
        .arg(
            Arg::new("timestamp-source")
                .long("timestamp-source")
                .help("Wall-clock base of frame timestamps: video modification time or the date/time in the recording name")
                .value_parser(["mtime", "filename"])
                .default_value("mtime"),
        )
        .arg(
            Arg::new("gpx")
                .long("gpx")
                .help("Also export each reconstructed track to a GPX file")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("gpx-only")
                .long("gpx-only")
                .help("Only export GPX tracks, do not decode any video")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed parsing information")
                .action(clap::ArgAction::SetTrue),
        )
}

fn config_from_matches(matches: &clap::ArgMatches) -> Result<ExtractionConfig> {
    let mut config = ExtractionConfig::default();
    if let Some(dir) = matches.get_one::<String>("input-dir") {
        config.input_dir = PathBuf::from(dir);
    }
    if let Some(dir) = matches.get_one::<String>("output-dir") {
        config.output_dir = PathBuf::from(dir);
    }
    if let Some(name) = matches.get_one::<String>("csv-name") {
        config.csv_file_name = name.clone();
    }
    if let Some(ext) = matches.get_one::<String>("log-ext") {
        config.log_extension = normalize_extension(ext);
    }
    if let Some(ext) = matches.get_one::<String>("video-ext") {
        config.video_extension = normalize_extension(ext);
    }
    if let Some(&meters) = matches.get_one::<f64>("min-distance") {
        if !meters.is_finite() || meters < 0.0 {
            anyhow::bail!("--min-distance must be a non-negative number, got {meters}");
        }
        config.min_distance_m = meters;
    }
    if let Some(source) = matches.get_one::<String>("timestamp-source") {
        config.timestamp_source = source
            .parse::<TimestampSource>()
            .map_err(anyhow::Error::msg)?;
    }
    config.export_gpx = matches.get_flag("gpx") || matches.get_flag("gpx-only");
    Ok(config)
}

#[cfg(feature = "video")]
fn extract_frames(config: &ExtractionConfig) -> Result<()> {
    use dvr_geotag::{extract_to_csv, FfmpegFrameSource, JpegFrameWriter};

    let mut writer = JpegFrameWriter;
    let report = extract_to_csv(config, FfmpegFrameSource::open, &mut writer)?;

    println!(
        "Exported {} image(s) from {} recording(s)",
        report.images_saved(),
        report.recordings.len()
    );
    println!("Exported sample index to: {}", config.csv_path().display());
    Ok(())
}

#[cfg(not(feature = "video"))]
fn extract_frames(_config: &ExtractionConfig) -> Result<()> {
    anyhow::bail!(
        "Frame extraction requires the `video` feature; rebuild with `--features video` or use --gpx-only"
    )
}

fn run(matches: &clap::ArgMatches) -> Result<()> {
    log::debug!("dvr_geotag {} ({})", env!("CARGO_PKG_VERSION"), GIT_SHA);
    let config = config_from_matches(matches)?;
    log::debug!("Configuration: {config:?}");

    if matches.get_flag("gpx-only") {
        for path in dvr_geotag::export_tracks(&config)? {
            println!("Exported track to: {}", path.display());
        }
        return Ok(());
    }

    extract_frames(&config)
}

fn main() {
    let matches = build_command().get_matches();

    let default_level = if matches.get_flag("debug") { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
