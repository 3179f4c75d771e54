//! Server initialization for the order tracker.

use std::path::{Path, PathBuf};

use actors::{CustomerStore, JobStore, StoreError, spawn_store};
use storage::Storage;
use tracker_core::legacy::{LegacyError, LegacyJob, parse_legacy_jobs};
use tracker_core::{Customer, CustomerId, Job, JobId, NewCustomer, TrackerError};

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub jobs: JobStore,
    pub customers: CustomerStore,
}

impl AppState {
    /// Stop both store actors.
    pub fn shutdown(&self) {
        self.jobs.shutdown();
        self.customers.shutdown();
    }
}

/// Errors during startup.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to read legacy jobs file {path:?}: {source}")]
    LegacyRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    LegacyParse(#[from] LegacyError),

    #[error("legacy import failed: {0}")]
    Import(#[from] TrackerError),
}

/// Initialize the order tracker.
///
/// This should be called once at server startup before handling requests.
/// When `legacy_jobs` is set and no jobs are stored yet, that file is
/// imported first.
pub async fn init_tracker(
    storage: Storage,
    legacy_jobs: Option<&Path>,
) -> Result<AppState, InitError> {
    tracing::info!("Initializing order tracker...");

    let (customers, _) = spawn_store::<Customer>(storage.clone()).await?;
    let (jobs, _) = spawn_store::<Job>(storage).await?;
    let state = AppState { jobs, customers };

    if let Some(path) = legacy_jobs {
        import_legacy_jobs(&state, path).await?;
    }

    tracing::info!("Order tracker initialized");
    Ok(state)
}

/// Import jobs from the legacy comma-delimited file into an empty store.
///
/// Customer names are resolved by exact search; names with no match become
/// new customers. If a write fails partway, the jobs and customers added so
/// far are removed again so the next start retries the whole file. Returns
/// how many jobs were imported.
pub async fn import_legacy_jobs(state: &AppState, path: &Path) -> Result<usize, InitError> {
    if !state.jobs.list().await?.is_empty() {
        tracing::info!("Jobs already stored, skipping legacy import from {:?}", path);
        return Ok(0);
    }

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| InitError::LegacyRead {
            path: path.to_path_buf(),
            source,
        })?;
    let rows = parse_legacy_jobs(&text)?;

    let mut imported = Vec::new();
    let mut created = Vec::new();
    for row in rows {
        match import_row(state, row, &mut created).await {
            Ok(id) => imported.push(id),
            Err(e) => {
                undo_partial_import(state, &imported, &created).await;
                return Err(e.into());
            }
        }
    }

    tracing::info!("Imported {} legacy jobs from {:?}", imported.len(), path);
    Ok(imported.len())
}

async fn import_row(
    state: &AppState,
    row: LegacyJob,
    created: &mut Vec<CustomerId>,
) -> Result<JobId, TrackerError> {
    let customer_id = resolve_customer(&state.customers, &row.customer_name, created).await?;
    let job = state.jobs.add(row.into_new_job(customer_id)).await?;
    Ok(job.id)
}

async fn resolve_customer(
    customers: &CustomerStore,
    name: &str,
    created: &mut Vec<CustomerId>,
) -> Result<Option<CustomerId>, TrackerError> {
    if name.trim().is_empty() {
        return Ok(None);
    }

    match customers.search(name).await {
        Ok(customer) => Ok(Some(customer.id)),
        Err(TrackerError::CustomerNameNotFound(_)) => {
            tracing::debug!("Creating customer {:?} for legacy jobs", name);
            let customer = customers.add(NewCustomer::new(name.trim())).await?;
            created.push(customer.id);
            Ok(Some(customer.id))
        }
        Err(e) => Err(e),
    }
}

async fn undo_partial_import(state: &AppState, jobs: &[JobId], customers: &[CustomerId]) {
    let mut left_behind = 0;
    for id in jobs {
        if state.jobs.delete(*id).await.is_err() {
            left_behind += 1;
        }
    }
    for id in customers {
        if state.customers.delete(*id).await.is_err() {
            left_behind += 1;
        }
    }

    if left_behind > 0 {
        tracing::error!(
            "Legacy import stopped partway and {} imported records could not be removed; \
             the import will not run again while jobs are stored",
            left_behind
        );
    } else {
        tracing::warn!(
            "Legacy import stopped partway, removed {} jobs and {} customers it had added",
            jobs.len(),
            customers.len()
        );
    }
}
