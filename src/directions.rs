//! HTTP adapter for an OSRM-style directions service.

use serde::Deserialize;

use crate::error::EstimateError;
use crate::model::LatLng;
use crate::traits::{Confidence, TravelEstimate, TravelTimeEstimator};

#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Directions-service client. The request timeout bounds how long a single
/// estimate can stall an optimization run.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    config: DirectionsConfig,
    client: reqwest::blocking::Client,
}

impl DirectionsClient {
    pub fn new(config: DirectionsConfig) -> Result<Self, EstimateError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl TravelTimeEstimator for DirectionsClient {
    fn estimate(&self, origin: LatLng, destination: LatLng) -> Result<TravelEstimate, EstimateError> {
        let url = format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=false",
            self.config.base_url,
            self.config.profile,
            origin.lng,
            origin.lat,
            destination.lng,
            destination.lat,
        );

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<RouteResponse>())?;

        let route = body.routes.first().ok_or(EstimateError::NoRoute)?;

        Ok(TravelEstimate {
            duration_secs: route.duration.round() as i32,
            distance_km: route.distance / 1000.0,
            confidence: Confidence::Road,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    /// Seconds.
    duration: f64,
    /// Meters.
    distance: f64,
}
