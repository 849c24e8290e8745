//! Estimator combinators: fallback and request-scoped caching.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::warn;

use crate::error::EstimateError;
use crate::haversine::HaversineEstimator;
use crate::model::LatLng;
use crate::traits::{TravelEstimate, TravelTimeEstimator};

/// Degrades to a straight-line estimate when the primary backend fails.
///
/// The fallback result keeps its [`StraightLine`](crate::traits::Confidence)
/// confidence, so callers can tell a degraded schedule from a fully-routed
/// one.
#[derive(Debug, Clone)]
pub struct FallbackEstimator<P> {
    primary: P,
    fallback: HaversineEstimator,
}

impl<P> FallbackEstimator<P> {
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            fallback: HaversineEstimator::default(),
        }
    }

    pub fn with_fallback(primary: P, fallback: HaversineEstimator) -> Self {
        Self { primary, fallback }
    }
}

impl<P: TravelTimeEstimator> TravelTimeEstimator for FallbackEstimator<P> {
    fn estimate(&self, origin: LatLng, destination: LatLng) -> Result<TravelEstimate, EstimateError> {
        match self.primary.estimate(origin, destination) {
            Ok(estimate) => Ok(estimate),
            Err(err) => {
                warn!(error = %err, "primary estimator failed, using straight-line fallback");
                self.fallback.estimate(origin, destination)
            }
        }
    }
}

type PairKey = ((i64, i64), (i64, i64));

/// Request-scoped memoizing wrapper.
///
/// The optimizer asks for the same origin/destination pairs many times
/// while scoring candidate insertions; caching bounds external-call volume
/// and pins each pair to one value for the whole run. Build one per
/// optimization request, not one per process, so estimates never go stale
/// across days. Errors are cached too, keeping a flaky backend from
/// answering differently mid-run.
#[derive(Debug)]
pub struct CachedEstimator<E> {
    inner: E,
    cache: Mutex<HashMap<PairKey, Result<TravelEstimate, String>>>,
}

impl<E> CachedEstimator<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: TravelTimeEstimator> TravelTimeEstimator for CachedEstimator<E> {
    fn estimate(&self, origin: LatLng, destination: LatLng) -> Result<TravelEstimate, EstimateError> {
        let key = (origin.micro(), destination.micro());

        if let Ok(cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&key) {
                return cached
                    .clone()
                    .map_err(EstimateError::Unavailable);
            }
        }

        let result = self.inner.estimate(origin, destination);
        if let Ok(mut cache) = self.cache.lock() {
            let entry = match &result {
                Ok(estimate) => Ok(*estimate),
                Err(err) => Err(err.to_string()),
            };
            cache.insert(key, entry);
        }
        result
    }
}
