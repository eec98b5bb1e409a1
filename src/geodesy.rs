//! Planar distance approximation for short hops between track positions
//!
//! Latitude and longitude deltas are scaled to kilometers with a fixed
//! kilometers-per-degree constant; the longitude scale also carries the cosine
//! of a reference latitude. The reference is taken once per run, from the
//! first position the estimator sees, and reused for every later call. Accuracy
//! therefore degrades as the run moves far in latitude from its first fix.

use crate::types::Position;
use std::cell::OnceCell;

/// Length of one degree of latitude on the WGS-84 mean sphere
pub const KM_PER_DEGREE: f64 = 111.197;

#[derive(Debug, Clone, Default)]
pub struct DistanceEstimator {
    cos_reference: OnceCell<f64>,
}

impl DistanceEstimator {
    /// Estimator whose reference latitude is fixed by the first distance query
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimator with an explicit reference latitude in degrees
    pub fn with_reference_latitude(latitude: f64) -> Self {
        let estimator = Self::new();
        let _ = estimator.cos_reference.set(latitude.to_radians().cos());
        estimator
    }

    /// Cosine of the reference latitude, if one has been fixed yet
    pub fn reference_cosine(&self) -> Option<f64> {
        self.cos_reference.get().copied()
    }

    /// Distance in meters between two positions
    pub fn distance_m(&self, from: Position, to: Position) -> f64 {
        let cos_reference = *self
            .cos_reference
            .get_or_init(|| from.latitude.to_radians().cos());
        let d_lat_km = (to.latitude - from.latitude) * KM_PER_DEGREE;
        let d_lon_km = (to.longitude - from.longitude) * KM_PER_DEGREE * cos_reference;
        1000.0 * (d_lat_km * d_lat_km + d_lon_km * d_lon_km).sqrt()
    }
}
