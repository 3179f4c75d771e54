//! Domain errors shared by the stores and the HTTP layer.

use crate::{CustomerId, JobId};

/// Errors raised by tracker operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error("job {0} not found")]
    JobNotFound(JobId),

    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),

    #[error("no customer named {0} found")]
    CustomerNameNotFound(String),

    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("invalid request: {0}")]
    Invalid(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl TrackerError {
    /// Whether this error means the addressed record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TrackerError::JobNotFound(_)
                | TrackerError::CustomerNotFound(_)
                | TrackerError::CustomerNameNotFound(_)
        )
    }
}
