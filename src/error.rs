use std::fmt;

/// Reasons a single positioning sentence is rejected.
///
/// Every variant collapses to "skip this line" inside the track builder; the
/// distinction exists so callers and tests can tell the causes apart.
#[derive(Debug, Clone, PartialEq)]
pub enum SentenceError {
    /// The line did not split into exactly one body and one checksum on `*`
    MissingChecksum,
    /// Transmitted checksum differs from the computed one
    ChecksumMismatch { expected: String, actual: String },
    /// Line does not start with a supported sentence prefix
    UnknownSentence,
    /// Comma-separated field is absent
    MissingField(usize),
    /// Field is too short to hold its fixed-width parts
    ShortField { index: usize },
    /// Field is not a valid number
    MalformedNumber { index: usize, value: String },
    /// UTC time of day is not `HHMMSS[.sss]`
    MalformedTime(String),
    /// Hemisphere letter is not N/S (latitude) or E/W (longitude)
    InvalidHemisphere(String),
}

impl fmt::Display for SentenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentenceError::MissingChecksum => write!(f, "missing or repeated checksum delimiter"),
            SentenceError::ChecksumMismatch { expected, actual } => {
                write!(f, "checksum mismatch: computed {}, transmitted {}", expected, actual)
            }
            SentenceError::UnknownSentence => write!(f, "unsupported sentence type"),
            SentenceError::MissingField(index) => write!(f, "field {} is missing", index),
            SentenceError::ShortField { index } => write!(f, "field {} is too short", index),
            SentenceError::MalformedNumber { index, value } => {
                write!(f, "field {} is not a number: '{}'", index, value)
            }
            SentenceError::MalformedTime(value) => write!(f, "malformed UTC time: '{}'", value),
            SentenceError::InvalidHemisphere(value) => write!(f, "invalid hemisphere: '{}'", value),
        }
    }
}

impl std::error::Error for SentenceError {}

/// Run-level errors
#[derive(Debug)]
pub enum GeotagError {
    /// I/O errors
    Io(std::io::Error),
    /// Recording base name does not follow the `<prefix>_HH-MM-SS` convention
    InvalidRecordingName(String),
    /// Video and positioning files do not pair up one to one
    RecordingSetMismatch {
        missing_video: Vec<String>,
        missing_log: Vec<String>,
    },
    /// Video decoding or frame conversion failed
    Video(String),
    /// Export format error
    Export(String),
}

impl fmt::Display for GeotagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeotagError::Io(err) => write!(f, "I/O error: {}", err),
            GeotagError::InvalidRecordingName(name) => write!(
                f,
                "Invalid recording name '{}': expected <prefix>_YYYY-MM-DD_HH-MM-SS",
                name
            ),
            GeotagError::RecordingSetMismatch {
                missing_video,
                missing_log,
            } => {
                write!(f, "Video and positioning file sets are not identical")?;
                if !missing_video.is_empty() {
                    write!(f, "; no video for: {}", missing_video.join(", "))?;
                }
                if !missing_log.is_empty() {
                    write!(f, "; no positioning log for: {}", missing_log.join(", "))?;
                }
                Ok(())
            }
            GeotagError::Video(msg) => write!(f, "Video error: {}", msg),
            GeotagError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for GeotagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeotagError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GeotagError {
    fn from(err: std::io::Error) -> Self {
        GeotagError::Io(err)
    }
}

pub type GeotagResult<T> = std::result::Result<T, GeotagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_lists_both_sides() {
        let err = GeotagError::RecordingSetMismatch {
            missing_video: vec!["DVR_2021-05-11_17-45-47".to_string()],
            missing_log: vec!["DVR_2021-05-11_17-50-47".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("no video for: DVR_2021-05-11_17-45-47"));
        assert!(msg.contains("no positioning log for: DVR_2021-05-11_17-50-47"));
    }

    #[test]
    fn test_mismatch_message_omits_empty_side() {
        let err = GeotagError::RecordingSetMismatch {
            missing_video: Vec::new(),
            missing_log: vec!["a".to_string()],
        };
        assert!(!err.to_string().contains("no video"));
    }
}
