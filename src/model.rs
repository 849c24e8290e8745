//! Data model for one day of field-service dispatch.
//!
//! Times within the planner are seconds from midnight (`i32`); job durations
//! are minutes. Locations are (lat, lng) in degrees.

use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Microdegree key for hashing/deduplication (6 decimal places,
    /// sub-meter resolution).
    pub(crate) fn micro(self) -> (i64, i64) {
        (
            (self.lat * 1_000_000.0).round() as i64,
            (self.lng * 1_000_000.0).round() as i64,
        )
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat.abs() <= 90.0
            && self.lng.abs() <= 180.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TechnicianId(pub String);

impl TechnicianId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for TechnicianId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive time interval, seconds from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub earliest_start: i32,
    pub latest_end: i32,
}

impl TimeWindow {
    pub fn new(earliest_start: i32, latest_end: i32) -> Self {
        Self {
            earliest_start,
            latest_end,
        }
    }

    pub fn duration_secs(&self) -> i32 {
        (self.latest_end - self.earliest_start).max(0)
    }

    pub fn is_valid(&self) -> bool {
        self.earliest_start <= self.latest_end
    }
}

/// An unscheduled job to be placed into the day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub location: LatLng,
    /// Skill tags a technician must cover to take this job.
    pub required_skills: Vec<String>,
    /// Ordinal priority; higher is more urgent.
    pub priority: u8,
    pub duration_minutes: i32,
    /// Optional completion window: the job must start no earlier than
    /// `earliest_start` and end no later than `latest_end`.
    pub window: Option<TimeWindow>,
}

impl Job {
    pub fn duration_secs(&self) -> i32 {
        self.duration_minutes * 60
    }

    /// Due date used for tie-breaking; unconstrained jobs sort last.
    pub(crate) fn due(&self) -> i32 {
        self.window.map(|w| w.latest_end).unwrap_or(i32::MAX)
    }
}

/// A busy interval already committed on a technician's day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CommittedSlot {
    pub start: i32,
    pub end: i32,
    pub location: LatLng,
}

/// A technician snapshot for one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technician {
    pub id: TechnicianId,
    pub name: String,
    pub start_location: LatLng,
    pub skills: Vec<String>,
    pub working_hours: TimeWindow,
    /// Committed slots, time-ordered and non-overlapping.
    pub committed: Vec<CommittedSlot>,
}

impl Technician {
    /// Whether this technician covers every skill the job requires.
    pub fn can_do(&self, job: &Job) -> bool {
        job.required_skills
            .iter()
            .all(|skill| self.skills.contains(skill))
    }

    /// Fraction of the job's required skills this technician covers.
    /// 1.0 when nothing is required.
    pub fn skill_match_score(&self, job: &Job) -> f64 {
        if job.required_skills.is_empty() {
            return 1.0;
        }
        let covered = job
            .required_skills
            .iter()
            .filter(|skill| self.skills.contains(*skill))
            .count();
        covered as f64 / job.required_skills.len() as f64
    }

    /// Free gaps between working-hours boundaries and committed slots.
    pub fn gaps(&self) -> Vec<Gap> {
        free_gaps(
            self.working_hours,
            self.start_location,
            self.committed.iter().map(|c| (c.start, c.end, c.location)),
        )
    }
}

/// A free interval in a technician's day.
///
/// Departure toward an inserted job happens from `depart_from` no earlier
/// than `start`. Anything inserted must clear the gap (plus travel to
/// `next_location`, when present) by `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub start: i32,
    pub end: i32,
    pub depart_from: LatLng,
    pub next_location: Option<LatLng>,
}

/// Derives free gaps from a working window and time-ordered busy intervals.
pub fn free_gaps(
    window: TimeWindow,
    start_location: LatLng,
    busy: impl Iterator<Item = (i32, i32, LatLng)>,
) -> Vec<Gap> {
    let mut gaps = Vec::new();
    let mut cursor = window.earliest_start;
    let mut from = start_location;

    for (start, end, location) in busy {
        if start > cursor {
            gaps.push(Gap {
                start: cursor,
                end: start,
                depart_from: from,
                next_location: Some(location),
            });
        }
        cursor = cursor.max(end);
        from = location;
    }

    if window.latest_end > cursor {
        gaps.push(Gap {
            start: cursor,
            end: window.latest_end,
            depart_from: from,
            next_location: None,
        });
    }

    gaps
}

/// Assignment of one job to one technician at a concrete time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub technician_id: TechnicianId,
    pub technician_name: String,
    pub job_id: JobId,
    pub start: i32,
    pub end: i32,
    /// Travel consumed arriving at this job from the previous location
    /// (prior slot, or the technician's start location).
    pub travel_minutes: i32,
    pub skill_match_score: f64,
}

/// Classification of an input job after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Unscheduled,
    Assigned,
    Unassignable,
}

/// A complete day's assignment plus the jobs that could not be placed.
///
/// Every input job appears exactly once: either in a slot or in
/// `unassignable`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// Slots ordered by start time, then technician, then job.
    pub slots: Vec<Slot>,
    pub unassignable: Vec<JobId>,
    /// True when the run hit its wall-clock budget and stopped early.
    pub partial: bool,
    /// True when any committed travel estimate came from the straight-line
    /// fallback, or an estimator lookup failed during the search.
    pub degraded: bool,
}

impl Schedule {
    pub fn status_of(&self, job_id: &JobId) -> JobStatus {
        if self.slots.iter().any(|s| &s.job_id == job_id) {
            JobStatus::Assigned
        } else if self.unassignable.contains(job_id) {
            JobStatus::Unassignable
        } else {
            JobStatus::Unscheduled
        }
    }

    pub fn slots_for(&self, technician_id: &TechnicianId) -> Vec<&Slot> {
        self.slots
            .iter()
            .filter(|s| &s.technician_id == technician_id)
            .collect()
    }
}
