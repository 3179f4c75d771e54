//! The in-memory collection owned by a store actor.

use std::collections::HashMap;

use tracker_core::{Record, TrackerError};

/// All records of one type, keyed by ID.
#[derive(Debug, Clone)]
pub struct Collection<R: Record> {
    records: HashMap<R::Id, R>,
}

impl<R: Record> Default for Collection<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Collection<R> {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Build a collection from persisted rows. A repeated ID keeps the last row.
    pub fn from_records(rows: impl IntoIterator<Item = R>) -> Self {
        let mut records = HashMap::new();
        for row in rows {
            if let Some(previous) = records.insert(row.id(), row) {
                tracing::warn!(
                    "Duplicate {} id {} in stored rows, keeping the later one",
                    R::COLLECTION,
                    previous.id()
                );
            }
        }
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: R::Id) -> Option<&R> {
        self.records.get(&id)
    }

    /// Every record, in listing order.
    pub fn list(&self) -> Vec<R> {
        self.filter(|_| true)
    }

    /// Records matching `pred`, in listing order.
    pub fn filter(&self, pred: impl Fn(&R) -> bool) -> Vec<R> {
        let mut rows: Vec<R> = self.records.values().filter(|r| pred(*r)).cloned().collect();
        rows.sort_by(R::listing_order);
        rows
    }

    /// Insert a new record under an ID not yet in use.
    pub fn add(&mut self, draft: R::Draft) -> Result<R, TrackerError> {
        let mut id = R::new_id();
        while self.records.contains_key(&id) {
            id = R::new_id();
        }
        let record = R::from_draft(id, draft)?;
        self.records.insert(id, record.clone());
        Ok(record)
    }

    /// Apply `patch` to the record with `id`. Nothing changes on error.
    pub fn update(&mut self, id: R::Id, patch: R::Patch) -> Result<R, TrackerError> {
        let record = self.records.get_mut(&id).ok_or_else(|| R::not_found(id))?;
        let mut updated = record.clone();
        updated.apply(patch)?;
        *record = updated.clone();
        Ok(updated)
    }

    /// Remove the record with `id`, if any.
    pub fn delete(&mut self, id: R::Id) -> Option<R> {
        self.records.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use std::collections::HashSet;

    use tracker_core::{
        Customer, CustomerPatch, Job, JobId, JobPatch, JobStatus, NewCustomer, NewJob,
    };

    use super::*;

    #[test]
    fn add_assigns_fresh_unique_ids() {
        let mut jobs = Collection::<Job>::new();
        let added: Vec<Job> = (0..50)
            .map(|_| jobs.add(NewJob::default()).unwrap())
            .collect();

        let ids: HashSet<JobId> = added.iter().map(|j| j.id).collect();
        assert_eq!(ids.len(), 50);

        let listed = jobs.list();
        assert_eq!(listed.len(), 50);
        assert!(added.iter().all(|j| listed.contains(j)));
    }

    #[test]
    fn update_overwrites_only_present_fields() {
        let mut jobs = Collection::<Job>::new();
        let job = jobs
            .add(NewJob {
                description: Some("oak table".into()),
                ..Default::default()
            })
            .unwrap();

        let updated = jobs
            .update(
                job.id,
                JobPatch {
                    status: Some(JobStatus::CompletedShipped),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.status, JobStatus::CompletedShipped);
        assert_eq!(updated.description, "oak table");
        assert_eq!(updated.deadline_date, job.deadline_date);
        assert_eq!(jobs.get(job.id), Some(&updated));
    }

    #[test]
    fn update_of_missing_id_is_not_found_and_changes_nothing() {
        let mut jobs = Collection::<Job>::new();
        jobs.add(NewJob::default()).unwrap();
        let before = jobs.list();

        let missing = JobId::new();
        let err = jobs.update(missing, JobPatch::default()).unwrap_err();
        assert_eq!(err, TrackerError::JobNotFound(missing));
        assert_eq!(jobs.list(), before);
    }

    #[test]
    fn rejected_patch_changes_nothing() {
        let mut customers = Collection::<Customer>::new();
        let customer = customers.add(NewCustomer::new("Adelina")).unwrap();

        let err = customers.update(
            customer.id,
            CustomerPatch {
                name: Some(" ".into()),
                note: Some("x".into()),
            },
        );
        assert!(matches!(err, Err(TrackerError::Invalid(_))));
        assert_eq!(customers.get(customer.id), Some(&customer));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut customers = Collection::<Customer>::new();
        let keep = customers.add(NewCustomer::new("Stuzzlini")).unwrap();
        let gone = customers.add(NewCustomer::new("Adelina")).unwrap();

        assert!(customers.delete(gone.id).is_some());
        let after_first = customers.list();
        assert!(customers.delete(gone.id).is_none());
        assert_eq!(customers.list(), after_first);
        assert_eq!(customers.list(), vec![keep]);
    }

    #[test]
    fn from_records_keeps_last_duplicate() {
        let mut first = Collection::<Customer>::new()
            .add(NewCustomer::new("Old"))
            .unwrap();
        let mut second = first.clone();
        second.name = "New".into();
        first.note = "first".into();

        let customers = Collection::from_records(vec![first, second.clone()]);
        assert_eq!(customers.len(), 1);
        assert_eq!(customers.get(second.id), Some(&second));
    }
}
