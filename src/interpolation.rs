use crate::types::{NavigationTrack, Position};

/// Linearly interpolate the position at `elapsed_s` seconds into the recording.
///
/// Returns `None` outside the covered time range and when either bracketing
/// entry reports a speed of zero or less.
pub fn interpolate_position(track: &NavigationTrack, elapsed_s: f64) -> Option<Position> {
    let bracket = track.bracket(elapsed_s)?;
    if !bracket.lower.speed.is_moving() || !bracket.upper.speed.is_moving() {
        return None;
    }

    let span = (bracket.upper_s - bracket.lower_s) as f64;
    let frac = (elapsed_s - bracket.lower_s as f64) / span;
    let from = bracket.lower.position;
    let to = bracket.upper.position;
    Some(Position::new(
        from.latitude + (to.latitude - from.latitude) * frac,
        from.longitude + (to.longitude - from.longitude) * frac,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SpeedIndicator, TrackEntry};

    fn track(entries: &[(i64, f64, f64, SpeedIndicator)]) -> NavigationTrack {
        let mut track = NavigationTrack::new();
        for &(key, lat, lon, speed) in entries {
            track.insert(key, TrackEntry::new(lat, lon, speed));
        }
        track
    }

    #[test]
    fn test_midpoint() {
        let t = track(&[
            (0, 0.0, 0.0, SpeedIndicator::Absent),
            (10, 1.0, 1.0, SpeedIndicator::Absent),
        ]);
        let p = interpolate_position(&t, 5.0).unwrap();
        assert!((p.latitude - 0.5).abs() < 1e-12);
        assert!((p.longitude - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_outside_range() {
        let t = track(&[
            (0, 0.0, 0.0, SpeedIndicator::Absent),
            (10, 1.0, 1.0, SpeedIndicator::Absent),
        ]);
        assert!(interpolate_position(&t, -1.0).is_none());
        assert!(interpolate_position(&t, 10.0).is_none());
        assert!(interpolate_position(&t, 11.0).is_none());
        assert_eq!(interpolate_position(&t, 0.0), Some(Position::new(0.0, 0.0)));
    }

    #[test]
    fn test_stationary_bracket_is_suppressed() {
        let t = track(&[
            (0, 0.0, 0.0, SpeedIndicator::Knots(0.0)),
            (10, 1.0, 1.0, SpeedIndicator::Absent),
        ]);
        assert!(interpolate_position(&t, 5.0).is_none());

        let t = track(&[
            (0, 0.0, 0.0, SpeedIndicator::Knots(3.0)),
            (10, 1.0, 1.0, SpeedIndicator::Knots(0.0)),
        ]);
        assert!(interpolate_position(&t, 5.0).is_none());
    }

    #[test]
    fn test_moving_brackets_with_speed() {
        let t = track(&[
            (0, 10.0, 20.0, SpeedIndicator::Knots(3.0)),
            (4, 10.4, 19.6, SpeedIndicator::Knots(2.0)),
            (6, 10.6, 19.4, SpeedIndicator::Knots(0.0)),
        ]);
        let p = interpolate_position(&t, 1.0).unwrap();
        assert!((p.latitude - 10.1).abs() < 1e-9);
        assert!((p.longitude - 19.9).abs() < 1e-9);
        // Second segment ends at a stop
        assert!(interpolate_position(&t, 5.0).is_none());
    }

    #[test]
    fn test_uneven_gap() {
        let t = track(&[
            (2, 0.0, 0.0, SpeedIndicator::Absent),
            (7, 5.0, -5.0, SpeedIndicator::Absent),
        ]);
        let p = interpolate_position(&t, 3.5).unwrap();
        assert!((p.latitude - 1.5).abs() < 1e-12);
        assert!((p.longitude + 1.5).abs() < 1e-12);
    }
}
