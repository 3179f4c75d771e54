//! Request/reply handles over the store actors.

use ractor::concurrency::JoinHandle;
use ractor::{Actor, ActorRef, RpcReplyPort};
use storage::Storage;
use tracker_core::{Customer, CustomerFilter, Job, Record, TrackerError};

use crate::messages::{StoreError, StoreMessage};
use crate::store_actor::{StoreActor, StoreArgs};

/// Handle to the jobs store.
pub type JobStore = StoreHandle<Job>;

/// Handle to the customers store.
pub type CustomerStore = StoreHandle<Customer>;

/// Cloneable handle that sends requests to a store actor and awaits replies.
pub struct StoreHandle<R: Record> {
    actor: ActorRef<StoreMessage<R>>,
}

impl<R: Record> Clone for StoreHandle<R> {
    fn clone(&self) -> Self {
        Self {
            actor: self.actor.clone(),
        }
    }
}

/// Start a store actor for `R`, loading its collection from `storage`.
///
/// Fails if the collection file exists but cannot be read or parsed.
pub async fn spawn_store<R: Record>(
    storage: Storage,
) -> Result<(StoreHandle<R>, JoinHandle<()>), StoreError> {
    let (actor, handle) = Actor::spawn(None, StoreActor::<R>::new(), StoreArgs { storage })
        .await
        .map_err(|e| StoreError::Spawn {
            collection: R::COLLECTION,
            reason: e.to_string(),
        })?;
    Ok((StoreHandle { actor }, handle))
}

impl<R: Record> StoreHandle<R> {
    async fn request<T>(
        &self,
        build: impl FnOnce(RpcReplyPort<T>) -> StoreMessage<R>,
    ) -> Result<T, TrackerError> {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.actor.send_message(build(tx.into())).map_err(|e| {
            TrackerError::Unavailable(format!("{} store: {}", R::COLLECTION, e))
        })?;

        rx.await.map_err(|_| {
            TrackerError::Unavailable(format!("{} store dropped the request", R::COLLECTION))
        })
    }

    /// The whole collection in listing order.
    pub async fn list(&self) -> Result<Vec<R>, TrackerError> {
        self.request(|reply| StoreMessage::List { reply }).await
    }

    /// Records matching `filter`, in listing order.
    pub async fn filter(
        &self,
        filter: impl Fn(&R) -> bool + Send + 'static,
    ) -> Result<Vec<R>, TrackerError> {
        self.request(|reply| StoreMessage::Filter {
            filter: Box::new(filter),
            reply,
        })
        .await
    }

    pub async fn get(&self, id: R::Id) -> Result<R, TrackerError> {
        self.request(|reply| StoreMessage::Get { id, reply })
            .await?
            .ok_or_else(|| R::not_found(id))
    }

    /// Insert a new record; the store assigns its ID.
    pub async fn add(&self, draft: R::Draft) -> Result<R, TrackerError> {
        self.request(|reply| StoreMessage::Add { draft, reply }).await?
    }

    /// Apply a partial update and return the updated record.
    pub async fn update(&self, id: R::Id, patch: R::Patch) -> Result<R, TrackerError> {
        self.request(|reply| StoreMessage::Update { id, patch, reply })
            .await?
    }

    /// Remove a record. Returns whether it existed; removing twice is fine.
    pub async fn delete(&self, id: R::Id) -> Result<bool, TrackerError> {
        self.request(|reply| StoreMessage::Delete { id, reply }).await?
    }

    /// Stop the actor once queued requests are handled.
    pub fn shutdown(&self) {
        self.actor.stop(None);
    }
}

impl StoreHandle<Job> {
    /// Jobs for one customer, unassigned jobs, or all of them.
    pub async fn list_for_customer(&self, filter: CustomerFilter) -> Result<Vec<Job>, TrackerError> {
        match filter {
            CustomerFilter::Any => self.list().await,
            filter => self.filter(move |job| filter.matches(job)).await,
        }
    }
}

impl StoreHandle<Customer> {
    /// The customer whose name is exactly `name`.
    pub async fn search(&self, name: &str) -> Result<Customer, TrackerError> {
        let wanted = name.trim().to_string();
        let lookup = wanted.clone();
        self.filter(move |customer| customer.name == lookup)
            .await?
            .into_iter()
            .next()
            .ok_or(TrackerError::CustomerNameNotFound(wanted))
    }
}
