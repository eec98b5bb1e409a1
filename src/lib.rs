//! DVR Geotag Library
//!
//! Reconstructs the GPS track of a dashboard-camera recording from its NMEA
//! log and picks a sparse, evenly spaced set of video frames to export as
//! geotagged images: roughly one picture every few meters of travel instead
//! of every frame.
//!
//! # Features
//!
//! - **`csv`** (default): CSV sink for exported samples
//! - **`cli`** (default): Build the command-line interface binary
//! - **`video`**: FFmpeg frame decoding and JPEG output (needs system FFmpeg libraries)
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Build a track and interpolate a position:
//! ```rust
//! use dvr_geotag::{build_track, checksum, interpolate_position, RecordingName};
//!
//! let body = "GPRMC,120000.000,A,5210.0000,N,02100.0000,E,2.0,90.0,110521,,,A";
//! let body2 = "GPRMC,120010.000,A,5211.0000,N,02100.0000,E,2.0,90.0,110521,,,A";
//! let log = format!("${}*{}\n${}*{}\n", body, checksum(body), body2, checksum(body2));
//!
//! let name = RecordingName::parse("DVR_2021-05-11_14-00-00").unwrap();
//! let (track, _stats) = build_track(&log, &name);
//! let position = interpolate_position(&track, 5.0).unwrap();
//! assert!((position.latitude - (52.0 + 10.5 / 60.0)).abs() < 1e-9);
//! ```
//!
//! # Public API
//!
//! ## Parsing
//! - [`checksum`], [`verify_checksum`], [`is_valid_sentence`] - Sentence validation
//! - [`decode_sentence`] - Decode `$GPGGA` / `$GPRMC` sentences
//! - [`RecordingName`] - Recording name convention with the local start time
//! - [`build_track`], [`read_track`], [`TrackBuilder`] - Navigation track reconstruction
//!
//! ## Sampling
//! - [`interpolate_position`] - Position at an elapsed-time offset
//! - [`DistanceEstimator`] - Flat-earth distance between positions
//! - [`FrameSampler`] - Greedy distance-based frame selection
//!
//! ## Running
//! - [`discover_recordings`] - Pair video files with positioning logs
//! - [`run_extraction`], [`extract_recordings`], [`process_recording`], [`sample_recording`] - Pipeline
//! - [`extract_to_csv`] - Pipeline writing the CSV index (`csv` feature)
//! - [`export_tracks`], [`export_track_gpx`] - GPX export of reconstructed tracks

pub mod config;
pub mod error;
pub mod export;
pub mod geodesy;
pub mod interpolation;
pub mod parser;
pub mod pipeline;
pub mod recordings;
pub mod sampler;
pub mod types;
pub mod video;

pub use config::*;
pub use error::*;
pub use export::*;
pub use geodesy::*;
pub use interpolation::*;
pub use parser::*;
pub use pipeline::*;
pub use recordings::*;
pub use sampler::*;
pub use types::*;
pub use video::*;

// Re-export Result type for convenience
pub use anyhow::Result;
