//! Pluggable travel-time estimation seam.
//!
//! The optimizer explores candidate insertions by repeatedly asking for
//! point-to-point travel estimates. Backends range from a real directions
//! service to a straight-line fallback; tests supply deterministic stubs.

use serde::{Deserialize, Serialize};

use crate::error::EstimateError;
use crate::model::LatLng;

/// How an estimate was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Road-network routing from a directions service.
    Road,
    /// Straight-line distance at an assumed speed.
    StraightLine,
}

/// A point-to-point travel estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelEstimate {
    pub duration_secs: i32,
    pub distance_km: f64,
    pub confidence: Confidence,
}

impl TravelEstimate {
    /// Duration rounded to whole minutes.
    pub fn minutes(&self) -> i32 {
        (self.duration_secs + 30) / 60
    }
}

/// Estimates travel between two points.
///
/// Implementations must be deterministic for a given (origin, destination)
/// pair within one optimization run: the optimizer revisits pairs while
/// exploring candidates and must not observe inconsistent values mid-run.
/// Wrap network-backed implementations in
/// [`CachedEstimator`](crate::estimate::CachedEstimator) to pin results for
/// the duration of a run.
pub trait TravelTimeEstimator {
    fn estimate(&self, origin: LatLng, destination: LatLng) -> Result<TravelEstimate, EstimateError>;
}

impl<E: TravelTimeEstimator + ?Sized> TravelTimeEstimator for &E {
    fn estimate(&self, origin: LatLng, destination: LatLng) -> Result<TravelEstimate, EstimateError> {
        (**self).estimate(origin, destination)
    }
}
