//! Store actor owning one persisted collection.

use std::marker::PhantomData;

use ractor::{Actor, ActorProcessingErr, ActorRef};
use storage::Storage;
use tracker_core::{Record, TrackerError};

use crate::collection::Collection;
use crate::messages::StoreMessage;

/// File name of the JSON array holding a collection.
pub fn collection_file<R: Record>() -> String {
    format!("jobsManager-{}.json", R::COLLECTION)
}

/// Startup arguments for a store actor.
#[derive(Debug, Clone)]
pub struct StoreArgs {
    pub storage: Storage,
}

/// State for the store actor.
pub struct StoreState<R: Record> {
    collection: Collection<R>,
    storage: Storage,
    file: String,
}

impl<R: Record> StoreState<R> {
    /// Rewrite the whole collection file.
    async fn persist(&self) -> Result<(), TrackerError> {
        self.storage
            .put_json(&self.file, &self.collection.list())
            .await
            .map_err(|e| TrackerError::Persistence(format!("writing {}: {}", self.file, e)))
    }

    /// Persist after a mutation, restoring `snapshot` if the write fails.
    async fn commit(&mut self, snapshot: Collection<R>) -> Result<(), TrackerError> {
        if let Err(e) = self.persist().await {
            tracing::warn!("Rolling back {} change: {}", R::COLLECTION, e);
            self.collection = snapshot;
            return Err(e);
        }
        Ok(())
    }
}

/// Actor that exclusively owns one collection.
pub struct StoreActor<R>(PhantomData<fn() -> R>);

impl<R> StoreActor<R> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<R> Default for StoreActor<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Actor for StoreActor<R> {
    type Msg = StoreMessage<R>;
    type State = StoreState<R>;
    type Arguments = StoreArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let file = collection_file::<R>();
        let rows: Option<Vec<R>> = args.storage.get_json(&file).await?;

        let state = match rows {
            Some(rows) => StoreState {
                collection: Collection::from_records(rows),
                storage: args.storage,
                file,
            },
            None => {
                tracing::info!("No {} yet, creating empty collection", file);
                let state = StoreState {
                    collection: Collection::new(),
                    storage: args.storage,
                    file,
                };
                state.persist().await?;
                state
            }
        };

        tracing::info!(
            "Starting {} store with {} records",
            R::COLLECTION,
            state.collection.len()
        );
        Ok(state)
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            StoreMessage::List { reply } => {
                let _ = reply.send(state.collection.list());
            }

            StoreMessage::Filter { filter, reply } => {
                let _ = reply.send(state.collection.filter(filter));
            }

            StoreMessage::Get { id, reply } => {
                let _ = reply.send(state.collection.get(id).cloned());
            }

            StoreMessage::Add { draft, reply } => {
                let snapshot = state.collection.clone();
                let result = match state.collection.add(draft) {
                    Ok(record) => state.commit(snapshot).await.map(|_| record),
                    Err(e) => Err(e),
                };
                if let Ok(record) = &result {
                    tracing::debug!("Added {} {}", R::COLLECTION, record.id());
                }
                let _ = reply.send(result);
            }

            StoreMessage::Update { id, patch, reply } => {
                let snapshot = state.collection.clone();
                let result = match state.collection.update(id, patch) {
                    Ok(record) => state.commit(snapshot).await.map(|_| record),
                    Err(e) => Err(e),
                };
                if let Err(e) = &result {
                    tracing::debug!("Update of {} {} rejected: {}", R::COLLECTION, id, e);
                }
                let _ = reply.send(result);
            }

            StoreMessage::Delete { id, reply } => {
                let snapshot = state.collection.clone();
                let result = match state.collection.delete(id) {
                    Some(_) => state.commit(snapshot).await.map(|_| true),
                    None => Ok(false),
                };
                if let Ok(true) = result {
                    tracing::debug!("Deleted {} {}", R::COLLECTION, id);
                }
                let _ = reply.send(result);
            }
        }

        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        _state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        tracing::info!("Stopped {} store", R::COLLECTION);
        Ok(())
    }
}
