//! Haversine travel-time estimator (fallback when no directions service
//! is reachable).
//!
//! Uses great-circle distance at an assumed driving speed. Less accurate
//! than road-network routing (ignores roads) but always available, so every
//! estimate it produces is marked [`Confidence::StraightLine`].

use crate::error::EstimateError;
use crate::model::LatLng;
use crate::traits::{Confidence, TravelEstimate, TravelTimeEstimator};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Straight-line travel-time estimator.
#[derive(Debug, Clone)]
pub struct HaversineEstimator {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineEstimator {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Great-circle distance between two points in kilometers.
    fn haversine_km(from: LatLng, to: LatLng) -> f64 {
        let lat1_rad = from.lat.to_radians();
        let lat2_rad = to.lat.to_radians();
        let delta_lat = (to.lat - from.lat).to_radians();
        let delta_lng = (to.lng - from.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    fn km_to_seconds(&self, km: f64) -> i32 {
        let hours = km / self.speed_kmh;
        (hours * 3600.0).round() as i32
    }
}

impl TravelTimeEstimator for HaversineEstimator {
    fn estimate(&self, origin: LatLng, destination: LatLng) -> Result<TravelEstimate, EstimateError> {
        let km = Self::haversine_km(origin, destination);
        Ok(TravelEstimate {
            duration_secs: self.km_to_seconds(km),
            distance_km: km,
            confidence: Confidence::StraightLine,
        })
    }
}
