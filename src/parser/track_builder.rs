//! Navigation track reconstruction
//!
//! Positioning sentences only carry a UTC time of day while the recording
//! name carries a local start time. The builder anchors the first fix to the
//! recording start and resolves every later fix to elapsed seconds, bridging
//! hour boundaries with a monotonic hour cursor.
//!
//! Day rollover at midnight is not handled.

use crate::parser::checksum::verify_checksum;
use crate::parser::recording::RecordingName;
use crate::parser::sentence::{decode_sentence, SentenceKind};
use crate::types::{DecodedFix, NavigationTrack, TrackEntry, UtcTimeOfDay};
use anyhow::Context;
use chrono::Timelike;
use log::{debug, warn};
use std::path::Path;

/// Counters collected while building a track
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackStats {
    /// Lines with a supported prefix
    pub candidate_lines: usize,
    /// Lines rejected by checksum or decoding
    pub rejected_lines: usize,
    /// Valid lines reporting no usable fix
    pub no_fix_lines: usize,
    /// Fixes that produced or replaced a track entry
    pub accepted_fixes: usize,
}

/// UTC clock anchored to the start of a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AnchoredClock {
    start_s: i64,
    previous_hour: i64,
}

impl AnchoredClock {
    /// Resolve the UTC start of the recording from its local start time and the first fix.
    ///
    /// Minute and second come from the recording name, the hour from the
    /// first fix. If the fix's minute is already below the start minute, UTC
    /// crossed an hour boundary after recording began and the hour is taken
    /// back by one.
    fn anchor(local_minute: u32, local_second: u32, first_fix: UtcTimeOfDay) -> Self {
        let mut hour = first_fix.hour as i64;
        if first_fix.minute < local_minute {
            hour -= 1;
        }
        Self {
            start_s: hour * 3600 + local_minute as i64 * 60 + local_second as i64,
            previous_hour: hour,
        }
    }

    /// Elapsed seconds since the recording start.
    ///
    /// An hour lower than the previous one is taken as a wraparound and
    /// replaced by the previous hour + 1.
    fn elapsed(&mut self, time: UtcTimeOfDay) -> i64 {
        let mut hour = time.hour as i64;
        if hour < self.previous_hour {
            hour = self.previous_hour + 1;
        }
        self.previous_hour = hour;
        hour * 3600 + time.minute as i64 * 60 + time.second as i64 - self.start_s
    }
}

/// Incremental track builder for one recording
#[derive(Debug, Clone)]
pub struct TrackBuilder {
    local_minute: u32,
    local_second: u32,
    clock: Option<AnchoredClock>,
    track: NavigationTrack,
    stats: TrackStats,
}

impl TrackBuilder {
    pub fn new(recording: &RecordingName) -> Self {
        Self {
            local_minute: recording.local_start.minute(),
            local_second: recording.local_start.second(),
            clock: None,
            track: NavigationTrack::new(),
            stats: TrackStats::default(),
        }
    }

    /// Feed one raw line; unsupported, invalid and no-fix lines are skipped.
    pub fn push_line(&mut self, line: &str) {
        if SentenceKind::detect(line).is_none() {
            return;
        }
        self.stats.candidate_lines += 1;

        match verify_checksum(line).and_then(|_| decode_sentence(line)) {
            Ok(Some(fix)) => self.push_fix(&fix),
            Ok(None) => self.stats.no_fix_lines += 1,
            Err(e) => {
                debug!("Skipping sentence '{}': {}", line, e);
                self.stats.rejected_lines += 1;
            }
        }
    }

    pub fn push_fix(&mut self, fix: &DecodedFix) {
        let (local_minute, local_second) = (self.local_minute, self.local_second);
        let clock = self
            .clock
            .get_or_insert_with(|| AnchoredClock::anchor(local_minute, local_second, fix.utc_time));
        let elapsed = clock.elapsed(fix.utc_time);
        if self.track.insert(elapsed, TrackEntry::from(fix)) {
            self.stats.accepted_fixes += 1;
        }
    }

    pub fn stats(&self) -> &TrackStats {
        &self.stats
    }

    pub fn finish(self) -> (NavigationTrack, TrackStats) {
        (self.track, self.stats)
    }
}

/// Build the navigation track of one recording from the full log text
pub fn build_track(text: &str, recording: &RecordingName) -> (NavigationTrack, TrackStats) {
    let mut builder = TrackBuilder::new(recording);
    for line in text.lines() {
        builder.push_line(line);
    }
    builder.finish()
}

/// Read a positioning log from disk and build its track
pub fn read_track(path: &Path, recording: &RecordingName) -> anyhow::Result<NavigationTrack> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read positioning log: {:?}", path))?;
    let text = String::from_utf8_lossy(&data);
    let (track, stats) = build_track(&text, recording);

    debug!(
        "{}: {} candidate lines, {} rejected, {} without fix, {} track entries",
        recording.base_name,
        stats.candidate_lines,
        stats.rejected_lines,
        stats.no_fix_lines,
        track.len()
    );
    if track.is_empty() {
        warn!(
            "{}: no usable fix in positioning log, no frames will be exported",
            recording.base_name
        );
    }
    Ok(track)
}
