//! Deadline urgency, used by clients to color job rows.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Job, JobStatus};

/// Working days left until `deadline`, counting the deadline day itself.
///
/// Returns `None` once the deadline has passed. Weekends before the deadline
/// are not counted; a deadline of today is one working day.
pub fn working_days_until(today: NaiveDate, deadline: NaiveDate) -> Option<u32> {
    let span = deadline.signed_duration_since(today).num_days();
    if span < 0 {
        return None;
    }

    // Every full week holds five weekdays; walk only the leftover days.
    let start = i64::from(today.weekday().num_days_from_monday());
    let leftover = (0..span % 7).filter(|i| (start + i) % 7 < 5).count() as i64;
    let days = span / 7 * 5 + leftover + 1;
    Some(u32::try_from(days).unwrap_or(u32::MAX))
}

/// How pressing a job is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Invoiced, nothing left to do.
    Finished,
    /// Shipped, waiting to be invoiced.
    Shipped,
    /// Still open past its deadline.
    Overdue,
    /// Still open with one working day left.
    Due,
    /// Still open with less than a working week left.
    Soon,
    OnTrack,
}

impl Urgency {
    pub fn of(job: &Job, today: NaiveDate) -> Self {
        match job.status {
            JobStatus::Invoiced => Urgency::Finished,
            JobStatus::CompletedShipped => Urgency::Shipped,
            JobStatus::New => match working_days_until(today, job.deadline_date) {
                None => Urgency::Overdue,
                Some(1) => Urgency::Due,
                Some(days) if days < 5 => Urgency::Soon,
                Some(_) => Urgency::OnTrack,
            },
        }
    }
}

/// A job as the API presents it: the record plus its urgency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRow {
    #[serde(flatten)]
    pub job: Job,
    pub urgency: Urgency,
}

impl JobRow {
    pub fn new(job: Job, today: NaiveDate) -> Self {
        let urgency = Urgency::of(&job, today);
        Self { job, urgency }
    }
}
