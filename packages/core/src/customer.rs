//! Customer domain types.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::{Record, TrackerError};

/// Unique identifier for a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub Ulid);

impl CustomerId {
    /// Create a new unique customer ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse a customer ID from a string.
    pub fn parse(s: &str) -> Result<Self, TrackerError> {
        Ulid::from_string(s.trim())
            .map(Self)
            .map_err(|e| TrackerError::InvalidId(format!("{s}: {e}")))
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CustomerId {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A customer that jobs can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// Free-text note.
    #[serde(default)]
    pub note: String,
}

/// Request body for creating a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    #[serde(default)]
    pub note: String,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Request body for updating a customer. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

fn checked_name(name: String) -> Result<String, TrackerError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::Invalid("customer name must not be blank".into()));
    }
    Ok(trimmed.to_string())
}

impl Record for Customer {
    type Id = CustomerId;
    type Draft = NewCustomer;
    type Patch = CustomerPatch;

    const COLLECTION: &'static str = "customers";

    fn id(&self) -> CustomerId {
        self.id
    }

    fn new_id() -> CustomerId {
        CustomerId::new()
    }

    fn from_draft(id: CustomerId, draft: NewCustomer) -> Result<Self, TrackerError> {
        Ok(Customer {
            id,
            name: checked_name(draft.name)?,
            note: draft.note,
        })
    }

    fn apply(&mut self, patch: CustomerPatch) -> Result<(), TrackerError> {
        let name = patch.name.map(checked_name).transpose()?;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(note) = patch.note {
            self.note = note;
        }
        Ok(())
    }

    fn listing_order(&self, other: &Self) -> Ordering {
        self.name
            .to_lowercase()
            .cmp(&other.name.to_lowercase())
            .then(self.id.cmp(&other.id))
    }

    fn not_found(id: CustomerId) -> TrackerError {
        TrackerError::CustomerNotFound(id)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        let err = Customer::from_draft(CustomerId::new(), NewCustomer::new("   "));
        assert!(matches!(err, Err(TrackerError::Invalid(_))));
    }

    #[test]
    fn note_patch_does_not_touch_the_name() {
        let mut customer =
            Customer::from_draft(CustomerId::new(), NewCustomer::new("Adelina")).unwrap();
        customer
            .apply(CustomerPatch {
                name: None,
                note: Some("pays on delivery".into()),
            })
            .unwrap();
        assert_eq!(customer.name, "Adelina");
        assert_eq!(customer.note, "pays on delivery");
    }

    #[test]
    fn failed_patch_leaves_customer_unchanged() {
        let mut customer = Customer::from_draft(
            CustomerId::new(),
            NewCustomer::new("Stuzzlini").with_note("old"),
        )
        .unwrap();
        let before = customer.clone();
        let result = customer.apply(CustomerPatch {
            name: Some(String::new()),
            note: Some("new".into()),
        });
        assert!(result.is_err());
        assert_eq!(customer, before);
    }

    #[test]
    fn listing_is_case_insensitive_by_name() {
        let b = Customer::from_draft(CustomerId::new(), NewCustomer::new("bakery")).unwrap();
        let a = Customer::from_draft(CustomerId::new(), NewCustomer::new("Atelier")).unwrap();
        let mut all = vec![b.clone(), a.clone()];
        all.sort_by(Customer::listing_order);
        assert_eq!(all, vec![a, b]);
    }
}
