//! Message types for store actors.

use ractor::RpcReplyPort;
use tracker_core::{Record, TrackerError};

/// Predicate evaluated inside the actor against every record.
pub type RecordFilter<R> = Box<dyn Fn(&R) -> bool + Send>;

/// Messages for a `StoreActor`.
pub enum StoreMessage<R: Record> {
    /// List the whole collection in listing order.
    List { reply: RpcReplyPort<Vec<R>> },

    /// List the records matching a predicate, in listing order.
    Filter {
        filter: RecordFilter<R>,
        reply: RpcReplyPort<Vec<R>>,
    },

    /// Get a record by ID.
    Get {
        id: R::Id,
        reply: RpcReplyPort<Option<R>>,
    },

    /// Insert a new record under a fresh ID.
    Add {
        draft: R::Draft,
        reply: RpcReplyPort<Result<R, TrackerError>>,
    },

    /// Apply a partial update.
    Update {
        id: R::Id,
        patch: R::Patch,
        reply: RpcReplyPort<Result<R, TrackerError>>,
    },

    /// Remove a record. Replies whether it existed.
    Delete {
        id: R::Id,
        reply: RpcReplyPort<Result<bool, TrackerError>>,
    },
}

impl<R: Record> std::fmt::Debug for StoreMessage<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreMessage::List { .. } => write!(f, "List({})", R::COLLECTION),
            StoreMessage::Filter { .. } => write!(f, "Filter({})", R::COLLECTION),
            StoreMessage::Get { id, .. } => write!(f, "Get({}, {id})", R::COLLECTION),
            StoreMessage::Add { .. } => write!(f, "Add({})", R::COLLECTION),
            StoreMessage::Update { id, .. } => write!(f, "Update({}, {id})", R::COLLECTION),
            StoreMessage::Delete { id, .. } => write!(f, "Delete({}, {id})", R::COLLECTION),
        }
    }
}

/// Error starting a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to start {collection} store: {reason}")]
    Spawn {
        collection: &'static str,
        reason: String,
    },
}
