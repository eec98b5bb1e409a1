//! Recording base-name convention: `<prefix>_YYYY-MM-DD_HH-MM-SS`
//!
//! The trailing `HH-MM-SS` segment is the local wall-clock time at which the
//! recording started. The date segment is optional for track reconstruction
//! and only needed when frame timestamps are derived from the name.

use crate::error::{GeotagError, GeotagResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:(\d{4})-(\d{2})-(\d{2})_)?(\d{2})-(\d{2})-(\d{2})$")
            .unwrap_or_else(|e| panic!("invalid recording name pattern: {e}"))
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingName {
    pub base_name: String,
    pub date: Option<NaiveDate>,
    pub local_start: NaiveTime,
}

impl RecordingName {
    pub fn parse(base_name: &str) -> GeotagResult<Self> {
        let invalid = || GeotagError::InvalidRecordingName(base_name.to_string());
        let caps = name_pattern().captures(base_name).ok_or_else(invalid)?;

        // The time segment is always preceded by '_' (the date's own separator when present)
        let time_start = caps.get(4).map(|m| m.start()).ok_or_else(invalid)?;
        if !base_name[..time_start].ends_with('_') {
            return Err(invalid());
        }

        let number = |i: usize| -> GeotagResult<u32> {
            caps.get(i)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(invalid)
        };

        let local_start =
            NaiveTime::from_hms_opt(number(4)?, number(5)?, number(6)?).ok_or_else(invalid)?;
        let date = match caps.get(1) {
            Some(_) => Some(
                NaiveDate::from_ymd_opt(number(1)? as i32, number(2)?, number(3)?)
                    .ok_or_else(invalid)?,
            ),
            None => None,
        };

        Ok(Self {
            base_name: base_name.to_string(),
            date,
            local_start,
        })
    }

    /// Local start time including the date, when the name carries one
    pub fn local_start_datetime(&self) -> Option<NaiveDateTime> {
        self.date.map(|date| date.and_time(self.local_start))
    }
}
