//! Assignment optimizer: sequential best-insertion over technician gaps.
//!
//! Each round scores every pending job against every free gap in every
//! compatible technician's day, then commits the single cheapest feasible
//! insertion and re-derives feasibility. Jobs that have no feasible
//! insertion in a round are marked unassignable immediately: each job is
//! classified exactly once, even though a later commit can occasionally
//! shift a gap's departure point in a pending job's favor. This is a
//! polynomial-time heuristic, not an exact solver; exact multi-vehicle
//! routing is NP-hard and runs must answer in real time.
//!
//! Ties are broken by weighted cost, then job priority (higher first), then
//! earliest due date, then job id, then technician order, then gap index.
//! The key is a total order, so the per-round candidate scan can fan out
//! across rayon workers without disturbing which insertion wins.

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{PlanError, Result};
use crate::model::{free_gaps, Gap, Job, JobId, LatLng, Schedule, Slot, Technician};
use crate::traits::{Confidence, TravelTimeEstimator};

#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    /// Cost discount per priority level: an insertion's weighted cost is
    /// `marginal_travel / (1 + priority_weight * priority)`.
    pub priority_weight: f64,
    /// Cap on total assigned travel per technician, in minutes.
    pub max_travel_minutes_per_technician: Option<i32>,
    /// Wall-clock budget for one run. On expiry the schedule built so far
    /// is returned with the remaining jobs unassignable and `partial` set.
    pub time_budget: Option<Duration>,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            priority_weight: 0.25,
            max_travel_minutes_per_technician: None,
            time_budget: Some(Duration::from_secs(10)),
        }
    }
}

/// One scheduled or committed interval on a technician's day.
#[derive(Debug, Clone)]
struct Entry {
    start: i32,
    end: i32,
    location: LatLng,
    assignment: Option<Assigned>,
}

#[derive(Debug, Clone)]
struct Assigned {
    job_idx: usize,
    travel_secs: i32,
    travel_minutes: i32,
    skill_score: f64,
}

#[derive(Debug)]
struct RouteState<'a> {
    tech: &'a Technician,
    /// Time-ordered, non-overlapping. Committed slots carry no assignment.
    entries: Vec<Entry>,
    /// Sum of assigned arrival-travel seconds, for the per-technician cap.
    travel_secs: i32,
}

impl<'a> RouteState<'a> {
    fn seed(tech: &'a Technician) -> Self {
        let entries = tech
            .committed
            .iter()
            .map(|c| Entry {
                start: c.start,
                end: c.end,
                location: c.location,
                assignment: None,
            })
            .collect();
        Self {
            tech,
            entries,
            travel_secs: 0,
        }
    }

    fn gaps(&self) -> Vec<Gap> {
        free_gaps(
            self.tech.working_hours,
            self.tech.start_location,
            self.entries.iter().map(|e| (e.start, e.end, e.location)),
        )
    }

    /// Index at which an entry filling this gap would be inserted.
    fn insert_position(&self, gap: &Gap) -> usize {
        self.entries.iter().filter(|e| e.end <= gap.start).count()
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    job_idx: usize,
    tech_idx: usize,
    entry_pos: usize,
    gap_idx: usize,
    start: i32,
    end: i32,
    travel_secs: i32,
    travel_minutes: i32,
    /// Travel onward to the gap's successor, when one exists.
    next_travel: Option<(i32, i32)>,
    marginal_secs: i32,
    weighted_cost: f64,
    skill_score: f64,
    low_confidence: bool,
}

/// Produces a schedule for one team, one day.
///
/// Inputs are read-only snapshots; the result classifies every job as
/// either assigned (a [`Slot`]) or unassignable. Output slots are
/// time-ordered and non-overlapping per technician and respect working
/// hours, committed slots, job windows, and travel times.
pub fn optimize<E>(
    jobs: &[Job],
    technicians: &[Technician],
    estimator: &E,
    options: &OptimizeOptions,
) -> Result<Schedule>
where
    E: TravelTimeEstimator + Sync,
{
    validate(jobs, technicians)?;

    let started = Instant::now();
    let mut routes: Vec<RouteState<'_>> = technicians.iter().map(RouteState::seed).collect();
    let mut pending: Vec<usize> = (0..jobs.len()).collect();
    let mut unassignable: Vec<JobId> = Vec::new();
    let mut partial = false;
    let mut degraded = false;

    while !pending.is_empty() {
        if let Some(budget) = options.time_budget {
            if started.elapsed() >= budget {
                warn!(
                    remaining = pending.len(),
                    "optimization budget exhausted, returning partial schedule"
                );
                partial = true;
                unassignable.extend(pending.drain(..).map(|i| jobs[i].id.clone()));
                break;
            }
        }

        let evaluations: Vec<(usize, Option<Candidate>, bool)> = pending
            .par_iter()
            .map(|&job_idx| {
                let (candidate, saw_error) =
                    best_insertion_for(job_idx, jobs, &routes, estimator, options);
                (job_idx, candidate, saw_error)
            })
            .collect();

        let mut feasible: Vec<Candidate> = Vec::new();
        for (job_idx, candidate, saw_error) in evaluations {
            degraded |= saw_error;
            match candidate {
                Some(c) => feasible.push(c),
                None => {
                    debug!(job = %jobs[job_idx].id, "no feasible insertion");
                    unassignable.push(jobs[job_idx].id.clone());
                }
            }
        }
        pending.retain(|i| feasible.iter().any(|c| c.job_idx == *i));

        let Some(winner) = feasible.into_iter().min_by(|a, b| commit_order(a, b, jobs)) else {
            break;
        };

        degraded |= winner.low_confidence;
        debug!(
            job = %jobs[winner.job_idx].id,
            technician = %technicians[winner.tech_idx].id,
            start = winner.start,
            marginal_secs = winner.marginal_secs,
            "committing insertion"
        );
        commit(&mut routes[winner.tech_idx], &winner, jobs);
        pending.retain(|&i| i != winner.job_idx);
    }

    let mut slots: Vec<Slot> = Vec::new();
    for route in &routes {
        for entry in &route.entries {
            let Some(assigned) = &entry.assignment else {
                continue;
            };
            slots.push(Slot {
                technician_id: route.tech.id.clone(),
                technician_name: route.tech.name.clone(),
                job_id: jobs[assigned.job_idx].id.clone(),
                start: entry.start,
                end: entry.end,
                travel_minutes: assigned.travel_minutes,
                skill_match_score: assigned.skill_score,
            });
        }
    }
    slots.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.technician_id.cmp(&b.technician_id))
            .then_with(|| a.job_id.cmp(&b.job_id))
    });
    unassignable.sort();

    info!(
        assigned = slots.len(),
        unassignable = unassignable.len(),
        partial,
        degraded,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "optimization run complete"
    );

    Ok(Schedule {
        slots,
        unassignable,
        partial,
        degraded,
    })
}

/// Cheapest feasible insertion for one job across all technicians and gaps.
///
/// Deterministic: candidates are scanned in technician order, then gap
/// order, and a strictly-better comparison keeps the first of equals.
fn best_insertion_for<E>(
    job_idx: usize,
    jobs: &[Job],
    routes: &[RouteState<'_>],
    estimator: &E,
    options: &OptimizeOptions,
) -> (Option<Candidate>, bool)
where
    E: TravelTimeEstimator,
{
    let job = &jobs[job_idx];
    let mut best: Option<Candidate> = None;
    let mut saw_error = false;

    for (tech_idx, route) in routes.iter().enumerate() {
        if !route.tech.can_do(job) {
            continue;
        }
        let skill_score = route.tech.skill_match_score(job);

        for (gap_idx, gap) in route.gaps().into_iter().enumerate() {
            // Estimator failure makes this insertion infeasible, never the
            // whole run.
            let arrival_est = match estimator.estimate(gap.depart_from, job.location) {
                Ok(est) => est,
                Err(_) => {
                    saw_error = true;
                    continue;
                }
            };

            let arrival = gap.start + arrival_est.duration_secs;
            let start = match job.window {
                Some(w) => arrival.max(w.earliest_start),
                None => arrival,
            };
            let end = start + job.duration_secs();

            if let Some(w) = job.window {
                if end > w.latest_end {
                    continue;
                }
            }

            let next_est = match gap.next_location {
                Some(next) => match estimator.estimate(job.location, next) {
                    Ok(est) => Some(est),
                    Err(_) => {
                        saw_error = true;
                        continue;
                    }
                },
                None => None,
            };

            let clear_by = end + next_est.map(|e| e.duration_secs).unwrap_or(0);
            if clear_by > gap.end {
                continue;
            }

            let mut marginal = arrival_est.duration_secs;
            let mut low_confidence = arrival_est.confidence == Confidence::StraightLine;
            if let (Some(next_est), Some(next)) = (next_est, gap.next_location) {
                marginal += next_est.duration_secs;
                low_confidence |= next_est.confidence == Confidence::StraightLine;
                match estimator.estimate(gap.depart_from, next) {
                    Ok(replaced) => marginal -= replaced.duration_secs,
                    // Without the replaced leg, charge both new legs in full.
                    Err(_) => saw_error = true,
                }
            }

            if let Some(cap) = options.max_travel_minutes_per_technician {
                if route.travel_secs + marginal > cap * 60 {
                    continue;
                }
            }

            let weighted_cost =
                marginal as f64 / (1.0 + options.priority_weight * f64::from(job.priority));

            let candidate = Candidate {
                job_idx,
                tech_idx,
                entry_pos: route.insert_position(&gap),
                gap_idx,
                start,
                end,
                travel_secs: arrival_est.duration_secs,
                travel_minutes: arrival_est.minutes(),
                next_travel: next_est.map(|e| (e.duration_secs, e.minutes())),
                marginal_secs: marginal,
                weighted_cost,
                skill_score,
                low_confidence,
            };

            let better = match &best {
                None => true,
                Some(current) => {
                    candidate
                        .weighted_cost
                        .total_cmp(&current.weighted_cost)
                        .then_with(|| candidate.tech_idx.cmp(&current.tech_idx))
                        .then_with(|| candidate.gap_idx.cmp(&current.gap_idx))
                        == Ordering::Less
                }
            };
            if better {
                best = Some(candidate);
            }
        }
    }

    (best, saw_error)
}

/// Total order over this round's best-per-job candidates.
fn commit_order(a: &Candidate, b: &Candidate, jobs: &[Job]) -> Ordering {
    let (ja, jb) = (&jobs[a.job_idx], &jobs[b.job_idx]);
    a.weighted_cost
        .total_cmp(&b.weighted_cost)
        .then_with(|| jb.priority.cmp(&ja.priority))
        .then_with(|| ja.due().cmp(&jb.due()))
        .then_with(|| ja.id.cmp(&jb.id))
        .then_with(|| a.tech_idx.cmp(&b.tech_idx))
        .then_with(|| a.gap_idx.cmp(&b.gap_idx))
}

fn commit(route: &mut RouteState<'_>, winner: &Candidate, jobs: &[Job]) {
    route.entries.insert(
        winner.entry_pos,
        Entry {
            start: winner.start,
            end: winner.end,
            location: jobs[winner.job_idx].location,
            assignment: Some(Assigned {
                job_idx: winner.job_idx,
                travel_secs: winner.travel_secs,
                travel_minutes: winner.travel_minutes,
                skill_score: winner.skill_score,
            }),
        },
    );

    // The successor now arrives from the inserted job, not from the gap's
    // old departure point.
    if let Some((next_secs, next_minutes)) = winner.next_travel {
        if let Some(next) = route.entries.get_mut(winner.entry_pos + 1) {
            if let Some(assigned) = &mut next.assignment {
                assigned.travel_secs = next_secs;
                assigned.travel_minutes = next_minutes;
            }
        }
    }

    route.travel_secs = route
        .entries
        .iter()
        .filter_map(|e| e.assignment.as_ref().map(|a| a.travel_secs))
        .sum();
}

fn validate(jobs: &[Job], technicians: &[Technician]) -> Result<()> {
    let mut job_ids = std::collections::HashSet::new();
    for job in jobs {
        if !job_ids.insert(&job.id) {
            return Err(PlanError::InvalidInput(format!("duplicate job id {}", job.id)));
        }
        if !job.location.is_valid() {
            return Err(PlanError::InvalidInput(format!(
                "job {} has invalid coordinates",
                job.id
            )));
        }
        if job.duration_minutes < 0 {
            return Err(PlanError::InvalidInput(format!(
                "job {} has negative duration",
                job.id
            )));
        }
        if let Some(window) = job.window {
            if !window.is_valid() {
                return Err(PlanError::InvalidInput(format!(
                    "job {} has inverted time window",
                    job.id
                )));
            }
        }
    }

    let mut tech_ids = std::collections::HashSet::new();
    for tech in technicians {
        if !tech_ids.insert(&tech.id) {
            return Err(PlanError::InvalidInput(format!(
                "duplicate technician id {}",
                tech.id
            )));
        }
        if !tech.start_location.is_valid() {
            return Err(PlanError::InvalidInput(format!(
                "technician {} has invalid coordinates",
                tech.id
            )));
        }
        if !tech.working_hours.is_valid() {
            return Err(PlanError::InvalidInput(format!(
                "technician {} has inverted working hours",
                tech.id
            )));
        }
        let mut prev_end = i32::MIN;
        for slot in &tech.committed {
            if slot.start > slot.end || !slot.location.is_valid() {
                return Err(PlanError::InvalidInput(format!(
                    "technician {} has a malformed committed slot",
                    tech.id
                )));
            }
            if slot.start < prev_end {
                return Err(PlanError::InvalidInput(format!(
                    "technician {} has overlapping or unordered committed slots",
                    tech.id
                )));
            }
            prev_end = slot.end;
        }
    }

    Ok(())
}
