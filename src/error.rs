//! Error taxonomy for the planner.
//!
//! Only invalid input rejects a run outright. Estimator failures degrade to
//! the fallback estimator, budget exhaustion yields a partial schedule, and
//! infeasible jobs are reported through the unassignable list. Those three
//! surface as flags on the result, not as errors.

use thiserror::Error;

/// Errors that reject an optimization request before it starts.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors from a travel-time estimator backend.
#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("directions request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("directions service returned no route")]
    NoRoute,

    #[error("estimator unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
