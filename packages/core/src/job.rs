//! Job domain types for tracked orders.

use std::cmp::Ordering;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use ulid::Ulid;

use crate::{CustomerId, Record, TrackerError};

/// Wire and file format for order and deadline dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unique identifier for a job, using ULID for chronological sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Ulid);

impl JobId {
    /// Create a new unique job ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse a job ID from a string.
    pub fn parse(s: &str) -> Result<Self, TrackerError> {
        Ulid::from_string(s.trim())
            .map(Self)
            .map_err(|e| TrackerError::InvalidId(format!("{s}: {e}")))
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Where a job is in its lifecycle.
///
/// The decorated labels are what earlier frontends posted and persisted, so
/// they are still accepted on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    #[serde(rename = "New", alias = "New ⭐️")]
    New,
    #[serde(rename = "Completed & Shipped", alias = "Completed & Shipped ✅")]
    CompletedShipped,
    #[serde(rename = "Invoiced", alias = "Invoiced 🧾")]
    Invoiced,
}

impl JobStatus {
    /// All statuses in display order.
    pub const ALL: [JobStatus; 3] = [
        JobStatus::New,
        JobStatus::CompletedShipped,
        JobStatus::Invoiced,
    ];

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::New => "New",
            JobStatus::CompletedShipped => "Completed & Shipped",
            JobStatus::Invoiced => "Invoiced",
        }
    }

    /// Map a free-form label onto a status by its leading word.
    ///
    /// Unknown labels are treated as `New`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.starts_with("Completed") {
            JobStatus::CompletedShipped
        } else if label.starts_with("Invoiced") {
            JobStatus::Invoiced
        } else {
            JobStatus::New
        }
    }

    fn rank(self) -> u8 {
        match self {
            JobStatus::New => 0,
            JobStatus::CompletedShipped => 1,
            JobStatus::Invoiced => 2,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A tracked order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier, assigned by the store.
    pub id: JobId,
    /// When the order was placed.
    pub order_date: NaiveDate,
    /// When the order is due.
    pub deadline_date: NaiveDate,
    pub status: JobStatus,
    /// Customer this order is for, if any.
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub description: String,
}

/// Request body for creating a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewJob {
    pub order_date: Option<NaiveDate>,
    pub deadline_date: Option<NaiveDate>,
    pub status: Option<JobStatus>,
    pub customer_id: Option<CustomerId>,
    pub description: Option<String>,
}

impl NewJob {
    /// Build the job, filling missing dates with `today`.
    pub fn into_job(self, id: JobId, today: NaiveDate) -> Job {
        Job {
            id,
            order_date: self.order_date.unwrap_or(today),
            deadline_date: self.deadline_date.unwrap_or(today),
            status: self.status.unwrap_or_default(),
            customer_id: self.customer_id,
            description: self.description.unwrap_or_default(),
        }
    }
}

/// Request body for updating a job.
///
/// Absent fields are left untouched. For `customer_id` an explicit `null`
/// clears the reference, which is why it is a nested option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_id: Option<Option<CustomerId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Which jobs to list with respect to their customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CustomerFilter {
    #[default]
    Any,
    /// Jobs without a customer.
    Unassigned,
    Customer(CustomerId),
}

impl CustomerFilter {
    /// Parse the `customerID` query value: empty means any, `unknown` means
    /// unassigned, anything else must be a customer id.
    pub fn parse(value: Option<&str>) -> Result<Self, TrackerError> {
        match value.map(str::trim) {
            None | Some("") => Ok(CustomerFilter::Any),
            Some(v) if v.eq_ignore_ascii_case("unknown") => Ok(CustomerFilter::Unassigned),
            Some(v) => CustomerId::parse(v).map(CustomerFilter::Customer),
        }
    }

    pub fn matches(&self, job: &Job) -> bool {
        match self {
            CustomerFilter::Any => true,
            CustomerFilter::Unassigned => job.customer_id.is_none(),
            CustomerFilter::Customer(id) => job.customer_id == Some(*id),
        }
    }
}

/// Marks a field as present even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl Record for Job {
    type Id = JobId;
    type Draft = NewJob;
    type Patch = JobPatch;

    const COLLECTION: &'static str = "jobs";

    fn id(&self) -> JobId {
        self.id
    }

    fn new_id() -> JobId {
        JobId::new()
    }

    fn from_draft(id: JobId, draft: NewJob) -> Result<Self, TrackerError> {
        Ok(draft.into_job(id, Local::now().date_naive()))
    }

    fn apply(&mut self, patch: JobPatch) -> Result<(), TrackerError> {
        if let Some(order_date) = patch.order_date {
            self.order_date = order_date;
        }
        if let Some(deadline_date) = patch.deadline_date {
            self.deadline_date = deadline_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(customer_id) = patch.customer_id {
            self.customer_id = customer_id;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        Ok(())
    }

    fn listing_order(&self, other: &Self) -> Ordering {
        self.status
            .rank()
            .cmp(&other.status.rank())
            .then(self.deadline_date.cmp(&other.deadline_date))
            .then(self.id.cmp(&other.id))
    }

    fn not_found(id: JobId) -> TrackerError {
        TrackerError::JobNotFound(id)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn sample() -> Job {
        NewJob {
            order_date: Some(date("2024-03-01")),
            deadline_date: Some(date("2024-03-15")),
            status: None,
            customer_id: Some(CustomerId::new()),
            description: Some("two crates of tiles".into()),
        }
        .into_job(JobId::new(), date("2024-03-01"))
    }

    #[test]
    fn new_job_defaults_dates_to_today() {
        let today = date("2024-05-06");
        let job = NewJob::default().into_job(JobId::new(), today);
        assert_eq!(job.order_date, today);
        assert_eq!(job.deadline_date, today);
        assert_eq!(job.status, JobStatus::New);
        assert_eq!(job.customer_id, None);
        assert!(job.description.is_empty());
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut job = sample();
        let before = job.clone();

        let patch: JobPatch = serde_json::from_str(r#"{"status":"Invoiced"}"#).unwrap();
        job.apply(patch).unwrap();

        assert_eq!(job.status, JobStatus::Invoiced);
        assert_eq!(job.order_date, before.order_date);
        assert_eq!(job.deadline_date, before.deadline_date);
        assert_eq!(job.customer_id, before.customer_id);
        assert_eq!(job.description, before.description);
    }

    #[test]
    fn patch_distinguishes_null_customer_from_absent() {
        let absent: JobPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.customer_id, None);
        assert_eq!(absent, JobPatch::default());

        let cleared: JobPatch = serde_json::from_str(r#"{"customer_id":null}"#).unwrap();
        assert_eq!(cleared.customer_id, Some(None));

        let mut job = sample();
        job.apply(cleared).unwrap();
        assert_eq!(job.customer_id, None);
    }

    #[test]
    fn patch_can_blank_the_description() {
        let mut job = sample();
        let patch: JobPatch = serde_json::from_str(r#"{"description":""}"#).unwrap();
        job.apply(patch).unwrap();
        assert!(job.description.is_empty());
    }

    #[test]
    fn status_accepts_decorated_labels() {
        let status: JobStatus = serde_json::from_str(r#""Completed & Shipped ✅""#).unwrap();
        assert_eq!(status, JobStatus::CompletedShipped);
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            r#""Completed & Shipped""#
        );
        assert_eq!(JobStatus::from_label("Invoiced 🧾"), JobStatus::Invoiced);
        assert_eq!(JobStatus::from_label("something else"), JobStatus::New);
    }

    #[test]
    fn dates_use_plain_calendar_format() {
        let job = sample();
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["order_date"], "2024-03-01");
        assert_eq!(value["deadline_date"], "2024-03-15");
    }

    #[test]
    fn listing_puts_open_jobs_first_then_earliest_deadline() {
        let mut late = sample();
        late.deadline_date = date("2024-04-01");
        let mut early = sample();
        early.deadline_date = date("2024-03-02");
        let mut invoiced = sample();
        invoiced.status = JobStatus::Invoiced;
        invoiced.deadline_date = date("2024-01-01");

        let mut jobs = vec![invoiced.clone(), late.clone(), early.clone()];
        jobs.sort_by(Job::listing_order);
        assert_eq!(jobs, vec![early, late, invoiced]);
    }

    #[test]
    fn customer_filter_parses_query_values() {
        let customer = CustomerId::new();
        assert_eq!(CustomerFilter::parse(None).unwrap(), CustomerFilter::Any);
        assert_eq!(CustomerFilter::parse(Some(" ")).unwrap(), CustomerFilter::Any);
        assert_eq!(
            CustomerFilter::parse(Some("unknown")).unwrap(),
            CustomerFilter::Unassigned
        );
        assert_eq!(
            CustomerFilter::parse(Some(&customer.to_string())).unwrap(),
            CustomerFilter::Customer(customer)
        );
        assert!(CustomerFilter::parse(Some("Adelina")).is_err());

        let mut job = sample();
        job.customer_id = Some(customer);
        assert!(CustomerFilter::Customer(customer).matches(&job));
        assert!(!CustomerFilter::Unassigned.matches(&job));
        job.customer_id = None;
        assert!(CustomerFilter::Unassigned.matches(&job));
    }

    #[test]
    fn parse_rejects_garbage_ids() {
        assert!(matches!(
            JobId::parse("#12"),
            Err(TrackerError::InvalidId(_))
        ));
        let id = JobId::new();
        assert_eq!(JobId::parse(&id.to_string()).unwrap(), id);
    }
}
