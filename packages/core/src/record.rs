//! The contract a collection member fulfils so one store can hold it.

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::TrackerError;

/// A record kept in a persisted collection.
pub trait Record: Debug + Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    type Id: Debug + Display + Copy + Eq + Ord + Hash + Send + Sync + 'static;
    /// Caller-supplied fields for a new record.
    type Draft: Send + 'static;
    /// Partial update.
    type Patch: Send + 'static;

    /// Collection name, used for file names and logs.
    const COLLECTION: &'static str;

    fn id(&self) -> Self::Id;

    /// Generate a fresh random identifier.
    fn new_id() -> Self::Id;

    fn from_draft(id: Self::Id, draft: Self::Draft) -> Result<Self, TrackerError>;

    /// Apply a patch. On error the record must be left unchanged.
    fn apply(&mut self, patch: Self::Patch) -> Result<(), TrackerError>;

    /// Order used when the whole collection is listed.
    fn listing_order(&self, other: &Self) -> Ordering;

    fn not_found(id: Self::Id) -> TrackerError;
}
