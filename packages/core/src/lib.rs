//! Core domain types for the order tracker.
//!
//! This crate contains shared types used across all packages:
//! - Job, JobStatus and the create/patch requests for orders
//! - Customer and its create/patch requests
//! - The `Record` trait that lets one store serve both collections
//! - Deadline urgency used for row coloring
//! - The legacy comma-delimited jobs format

mod customer;
mod error;
mod job;
pub mod legacy;
mod record;
mod schedule;

pub use customer::{Customer, CustomerId, CustomerPatch, NewCustomer};
pub use error::TrackerError;
pub use job::{CustomerFilter, DATE_FORMAT, Job, JobId, JobPatch, JobStatus, NewJob};
pub use record::Record;
pub use schedule::{JobRow, Urgency, working_days_until};
