#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// UTC time of day carried by a sentence, whole seconds only
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UtcTimeOfDay {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl UtcTimeOfDay {
    pub fn new(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }
}

/// Speed data attached to a fix
///
/// Quality-typed sentences carry no speed at all; status-typed sentences carry
/// speed over ground in knots.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpeedIndicator {
    #[default]
    Absent,
    Knots(f64),
}

impl SpeedIndicator {
    pub fn is_present(&self) -> bool {
        matches!(self, SpeedIndicator::Knots(_))
    }

    /// Absent speed is assumed to be movement; a reported speed must be positive.
    pub fn is_moving(&self) -> bool {
        match self {
            SpeedIndicator::Absent => true,
            SpeedIndicator::Knots(knots) => *knots > 0.0,
        }
    }
}

/// Position reading decoded from one valid sentence
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecodedFix {
    pub utc_time: UtcTimeOfDay,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: SpeedIndicator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_indicator_movement() {
        assert!(SpeedIndicator::Absent.is_moving());
        assert!(SpeedIndicator::Knots(0.4).is_moving());
        assert!(!SpeedIndicator::Knots(0.0).is_moving());
        assert!(!SpeedIndicator::Knots(-1.0).is_moving());
    }

    #[test]
    fn test_speed_indicator_presence() {
        assert!(!SpeedIndicator::Absent.is_present());
        assert!(SpeedIndicator::Knots(0.0).is_present());
    }
}
