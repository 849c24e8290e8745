//! dispatch-planner core
//!
//! One-day field-service schedule optimization: jobs and technicians in,
//! a slot assignment plus unassignable list and metrics out.

pub mod directions;
pub mod error;
pub mod estimate;
pub mod evaluator;
pub mod haversine;
pub mod model;
pub mod optimizer;
pub mod traits;
