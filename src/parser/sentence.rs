//! Decoding of the two supported positioning sentences
//!
//! - `$GPGGA` (fix with quality): time, position and a quality-of-measurement field
//! - `$GPRMC` (fix with status): time, status, position and speed over ground in knots

use crate::error::SentenceError;
use crate::types::{DecodedFix, SpeedIndicator, UtcTimeOfDay};

pub const GGA_PREFIX: &str = "$GPGGA";
pub const RMC_PREFIX: &str = "$GPRMC";

/// Field holding the quality of measurement in a GGA sentence
const GGA_QUALITY_FIELD: usize = 6;
/// Field holding the status in an RMC sentence
const RMC_STATUS_FIELD: usize = 2;
/// Field holding the speed over ground in an RMC sentence
const RMC_SPEED_FIELD: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceKind {
    /// Fix with quality, no speed
    Gga,
    /// Fix with status and speed
    Rmc,
}

impl SentenceKind {
    pub fn detect(line: &str) -> Option<Self> {
        if line.starts_with(GGA_PREFIX) {
            Some(SentenceKind::Gga)
        } else if line.starts_with(RMC_PREFIX) {
            Some(SentenceKind::Rmc)
        } else {
            None
        }
    }
}

/// Decode a sentence whose checksum has already been verified.
///
/// Returns `Ok(None)` when the sentence is well-formed but reports no usable
/// fix (GGA quality outside 1..=5, RMC status other than `A`).
pub fn decode_sentence(line: &str) -> Result<Option<DecodedFix>, SentenceError> {
    let kind = SentenceKind::detect(line).ok_or(SentenceError::UnknownSentence)?;
    // Drop the checksum so it does not stick to the last field
    let body = line.split('*').next().unwrap_or(line);
    let fields: Vec<&str> = body.split(',').collect();

    let (position_field, speed) = match kind {
        SentenceKind::Gga => {
            let quality: i32 = parse_number(&fields, GGA_QUALITY_FIELD)?;
            if quality <= 0 || quality >= 6 {
                return Ok(None);
            }
            (2, SpeedIndicator::Absent)
        }
        SentenceKind::Rmc => {
            let speed = parse_speed(&fields)?;
            let status = field(&fields, RMC_STATUS_FIELD)?;
            if !status.eq_ignore_ascii_case("A") {
                return Ok(None);
            }
            (3, speed)
        }
    };

    let utc_time = parse_utc_time(field(&fields, 1)?)?;
    let latitude = parse_latitude(&fields, position_field)?;
    let longitude = parse_longitude(&fields, position_field + 2)?;

    Ok(Some(DecodedFix {
        utc_time,
        latitude,
        longitude,
        speed,
    }))
}

/// Parse `HHMMSS[.sss]`; fractional seconds are discarded.
pub fn parse_utc_time(value: &str) -> Result<UtcTimeOfDay, SentenceError> {
    let malformed = || SentenceError::MalformedTime(value.to_string());
    let part = |range: std::ops::Range<usize>| -> Result<u32, SentenceError> {
        let digits = value.get(range).ok_or_else(malformed)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        digits.parse().map_err(|_| malformed())
    };
    Ok(UtcTimeOfDay::new(part(0..2)?, part(2..4)?, part(4..6)?))
}

/// Latitude: `DDMM.MMMM` followed by an N/S field
fn parse_latitude(fields: &[&str], index: usize) -> Result<f64, SentenceError> {
    let magnitude = parse_degrees_minutes(fields, index, 2)?;
    match field(fields, index + 1)?.to_ascii_uppercase().as_str() {
        "N" => Ok(magnitude),
        "S" => Ok(-magnitude),
        other => Err(SentenceError::InvalidHemisphere(other.to_string())),
    }
}

/// Longitude: `DDDMM.MMMM` followed by an E/W field
fn parse_longitude(fields: &[&str], index: usize) -> Result<f64, SentenceError> {
    let magnitude = parse_degrees_minutes(fields, index, 3)?;
    match field(fields, index + 1)?.to_ascii_uppercase().as_str() {
        "E" => Ok(magnitude),
        "W" => Ok(-magnitude),
        other => Err(SentenceError::InvalidHemisphere(other.to_string())),
    }
}

fn parse_degrees_minutes(
    fields: &[&str],
    index: usize,
    degree_digits: usize,
) -> Result<f64, SentenceError> {
    let value = field(fields, index)?;
    let (degrees, minutes) = match (value.get(..degree_digits), value.get(degree_digits..)) {
        (Some(degrees), Some(minutes)) if !minutes.is_empty() => (degrees, minutes),
        _ => return Err(SentenceError::ShortField { index }),
    };
    let degrees = parse_str::<f64>(degrees, index)?;
    let minutes = parse_str::<f64>(minutes, index)?;
    Ok(degrees + minutes / 60.0)
}

/// Empty speed field means no speed data, anything else must be numeric
fn parse_speed(fields: &[&str]) -> Result<SpeedIndicator, SentenceError> {
    let value = field(fields, RMC_SPEED_FIELD)?;
    if value.trim().is_empty() {
        return Ok(SpeedIndicator::Absent);
    }
    parse_str::<f64>(value, RMC_SPEED_FIELD).map(SpeedIndicator::Knots)
}

fn field<'a>(fields: &[&'a str], index: usize) -> Result<&'a str, SentenceError> {
    fields
        .get(index)
        .copied()
        .ok_or(SentenceError::MissingField(index))
}

fn parse_number<T: std::str::FromStr>(fields: &[&str], index: usize) -> Result<T, SentenceError> {
    parse_str(field(fields, index)?, index)
}

fn parse_str<T: std::str::FromStr>(value: &str, index: usize) -> Result<T, SentenceError> {
    value
        .trim()
        .parse()
        .map_err(|_| SentenceError::MalformedNumber {
            index,
            value: value.to_string(),
        })
}
