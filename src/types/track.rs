use crate::types::{DecodedFix, Position, SpeedIndicator};
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position and speed recorded at one elapsed second
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackEntry {
    pub position: Position,
    pub speed: SpeedIndicator,
}

impl TrackEntry {
    pub fn new(latitude: f64, longitude: f64, speed: SpeedIndicator) -> Self {
        Self {
            position: Position::new(latitude, longitude),
            speed,
        }
    }
}

impl From<&DecodedFix> for TrackEntry {
    fn from(fix: &DecodedFix) -> Self {
        Self::new(fix.latitude, fix.longitude, fix.speed)
    }
}

/// Pair of entries surrounding a target offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket<'a> {
    pub lower_s: i64,
    pub lower: &'a TrackEntry,
    pub upper_s: i64,
    pub upper: &'a TrackEntry,
}

/// Navigation track of one recording, keyed by elapsed seconds since its start
///
/// Keys are kept sorted. Offsets may be negative when the first fix was taken
/// before the time embedded in the recording name.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavigationTrack {
    entries: BTreeMap<i64, TrackEntry>,
}

impl NavigationTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, keeping the richer one on a key collision.
    ///
    /// An existing entry is only replaced when it has no speed data and the
    /// new one does. Returns true if the track changed.
    pub fn insert(&mut self, elapsed_s: i64, entry: TrackEntry) -> bool {
        match self.entries.get_mut(&elapsed_s) {
            None => {
                self.entries.insert(elapsed_s, entry);
                true
            }
            Some(existing) if entry.speed.is_present() && !existing.speed.is_present() => {
                *existing = entry;
                true
            }
            Some(_) => false,
        }
    }

    pub fn get(&self, elapsed_s: i64) -> Option<&TrackEntry> {
        self.entries.get(&elapsed_s)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &TrackEntry)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn first_offset(&self) -> Option<i64> {
        self.entries.keys().next().copied()
    }

    pub fn last_offset(&self) -> Option<i64> {
        self.entries.keys().next_back().copied()
    }

    /// Find the first key strictly greater than `target_s` and the key right before it.
    ///
    /// Returns `None` if the target lies before the first key or at/after the last one.
    pub fn bracket(&self, target_s: f64) -> Option<Bracket<'_>> {
        if !target_s.is_finite() {
            return None;
        }
        // Keys are integers, so `key > target` is the same as `key > floor(target)`
        let floor = target_s.floor();
        let (&upper_s, upper) = if floor < i64::MIN as f64 {
            self.entries.iter().next()?
        } else if floor >= i64::MAX as f64 {
            return None;
        } else {
            self.entries.range((Excluded(floor as i64), Unbounded)).next()?
        };
        let (&lower_s, lower) = self.entries.range(..upper_s).next_back()?;
        Some(Bracket {
            lower_s,
            lower,
            upper_s,
            upper,
        })
    }
}
