//! Schedule evaluator: aggregate metrics over a produced schedule.
//!
//! Pure function of a schedule plus the technician snapshots it was built
//! from. Used both as response telemetry and as the objective the
//! optimizer minimizes (travel down, utilization up).

use serde::{Deserialize, Serialize};

use crate::model::{Schedule, Technician, TechnicianId};

/// Weights combining normalized travel minimization and utilization into
/// one score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub travel: f64,
    pub utilization: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            travel: 0.5,
            utilization: 0.5,
        }
    }
}

/// Per-technician workload breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicianLoad {
    pub technician_id: TechnicianId,
    pub worked_minutes: i32,
    pub travel_minutes: i32,
    pub idle_minutes: i32,
    pub utilization_pct: f64,
}

/// Aggregate schedule metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    pub total_travel_minutes: i32,
    pub total_idle_minutes: i32,
    pub utilization_pct: f64,
    /// Combined score in [0, 1]; higher is better.
    pub optimization_score: f64,
    pub per_technician: Vec<TechnicianLoad>,
}

/// Computes metrics for a schedule against the technicians' working hours.
///
/// Worked time counts both assigned slots and pre-existing committed slots;
/// travel counts only the assigned slots' arrival legs (committed slots
/// carry no travel record). Technicians with nothing assigned contribute
/// their full window as idle without tripping any division.
pub fn evaluate(
    schedule: &Schedule,
    technicians: &[Technician],
    weights: &ScoreWeights,
) -> ScheduleMetrics {
    let mut per_technician = Vec::with_capacity(technicians.len());
    let mut total_worked = 0i32;
    let mut total_travel = 0i32;
    let mut total_idle = 0i32;
    let mut total_available = 0i32;

    for tech in technicians {
        let available = tech.working_hours.duration_secs() / 60;

        let committed: i32 = tech.committed.iter().map(|c| (c.end - c.start) / 60).sum();
        let (assigned, travel) = schedule
            .slots_for(&tech.id)
            .iter()
            .fold((0i32, 0i32), |(worked, travel), slot| {
                (worked + (slot.end - slot.start) / 60, travel + slot.travel_minutes)
            });

        let worked = committed + assigned;
        let idle = (available - worked - travel).max(0);
        let utilization_pct = if available > 0 {
            f64::from(worked) / f64::from(available) * 100.0
        } else {
            0.0
        };

        total_worked += worked;
        total_travel += travel;
        total_idle += idle;
        total_available += available;

        per_technician.push(TechnicianLoad {
            technician_id: tech.id.clone(),
            worked_minutes: worked,
            travel_minutes: travel,
            idle_minutes: idle,
            utilization_pct,
        });
    }

    let utilization = if total_available > 0 {
        f64::from(total_worked) / f64::from(total_available)
    } else {
        0.0
    };
    let travel_ratio = if total_travel + total_worked > 0 {
        f64::from(total_travel) / f64::from(total_travel + total_worked)
    } else {
        0.0
    };

    let weight_sum = weights.travel + weights.utilization;
    let optimization_score = if weight_sum > 0.0 {
        ((weights.travel * (1.0 - travel_ratio) + weights.utilization * utilization) / weight_sum)
            .clamp(0.0, 1.0)
    } else {
        0.0
    };

    ScheduleMetrics {
        total_travel_minutes: total_travel,
        total_idle_minutes: total_idle,
        utilization_pct: utilization * 100.0,
        optimization_score,
        per_technician,
    }
}
